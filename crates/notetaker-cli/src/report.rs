//! Console report for a processed transcript.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use notetaker_core::NotetakerReport;

/// Sentiment samples shown on the console.
const SAMPLE_STATEMENTS: usize = 3;

/// Statement preview length in characters.
const PREVIEW_CHARS: usize = 80;

const RULE_WIDTH: usize = 80;

/// Render the human-readable report printed after a run.
pub fn render(report: &NotetakerReport, output_path: &Path) -> Result<String> {
    let summary = serde_json::to_string_pretty(&report.summary)
        .context("Failed to serialize clinical summary")?;
    let soap = serde_json::to_string_pretty(&report.soap_note)
        .context("Failed to serialize SOAP note")?;

    let mut out = String::new();
    writeln!(out, "RESULTS")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    writeln!(out, "\nMEDICAL NLP SUMMARY\n")?;
    writeln!(out, "{}", summary)?;

    let analyses = &report.sentiment_analysis;
    if !analyses.is_empty() {
        writeln!(out, "\nPATIENT SENTIMENT ANALYSIS (Sample)")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        for (i, analysis) in analyses.iter().take(SAMPLE_STATEMENTS).enumerate() {
            writeln!(out, "\n{}. Statement: \"{}...\"", i + 1, preview(&analysis.statement))?;
            writeln!(out, "   Sentiment: {}", analysis.sentiment)?;
            writeln!(out, "   Intent: {}", analysis.intent)?;
        }
        if analyses.len() > SAMPLE_STATEMENTS {
            writeln!(
                out,
                "\n   ... and {} more statements",
                analyses.len() - SAMPLE_STATEMENTS
            )?;
        }
    }

    writeln!(out, "\nSOAP NOTE")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", soap)?;

    writeln!(out, "\nComplete results saved to: {}", output_path.display())?;
    Ok(out)
}

/// First characters of a statement (char-boundary safe).
fn preview(statement: &str) -> String {
    statement.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetaker_core::models::{Intent, Sentiment, UtteranceAnalysis};
    use notetaker_core::{ClinicalSummary, NoteSynthesizer, Transcript};

    fn report(statements: usize) -> NotetakerReport {
        let transcript = Transcript::parse("Physician: Hello.");
        let summary = ClinicalSummary::default();
        let soap_note = NoteSynthesizer::new().synthesize(&transcript, &summary);
        NotetakerReport {
            summary,
            sentiment_analysis: (0..statements)
                .map(|i| UtteranceAnalysis {
                    statement: format!("Statement number {} {}", i, "é".repeat(100)),
                    sentiment: Sentiment::Neutral,
                    intent: Intent::ReportingSymptoms,
                })
                .collect(),
            soap_note,
        }
    }

    #[test]
    fn test_samples_are_limited() {
        let text = render(&report(5), Path::new("out.json")).unwrap();

        assert!(text.contains("1. Statement: \"Statement number 0"));
        assert!(text.contains("3. Statement: \"Statement number 2"));
        assert!(!text.contains("4. Statement"));
        assert!(text.contains("... and 2 more statements"));
        assert!(text.contains("Complete results saved to: out.json"));
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        let long = "é".repeat(200);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_no_sentiment_section_when_empty() {
        let text = render(&report(0), Path::new("out.json")).unwrap();
        assert!(!text.contains("PATIENT SENTIMENT ANALYSIS"));
        assert!(text.contains("\"Patient_Name\": \"Unknown\""));
        assert!(text.contains("\"Chief_Complaint\": \"\""));
    }
}
