//! SOAP note synthesis from a transcript and its clinical summary.

use crate::models::{
    Assessment, ClinicalSummary, Objective, Plan, SoapNote, Speaker, Subjective, Transcript,
};

/// Fixed Objective observation.
pub const OBSERVATIONS: &str = "Patient appears matching description of recovery.";

/// Physical exam text when no examination finding is found.
pub const GENERAL_OBSERVATION: &str = "General observation conducted.";

/// Separator for list fields.
const LIST_SEPARATOR: &str = ", ";

/// Number of opening patient turns that form the history of present illness.
const HPI_TURNS: usize = 2;

/// Assembles a [`SoapNote`]. Stateless and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteSynthesizer;

impl NoteSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, transcript: &Transcript, summary: &ClinicalSummary) -> SoapNote {
        SoapNote {
            subjective: Subjective {
                chief_complaint: join(summary.symptoms.iter()),
                history_of_present_illness: self.history_of_present_illness(transcript),
            },
            objective: Objective {
                physical_exam: self.physical_exam(transcript),
                observations: OBSERVATIONS.to_string(),
            },
            assessment: Assessment {
                diagnosis: summary.diagnosis.join(LIST_SEPARATOR),
                severity: summary.current_status.to_string(),
            },
            plan: Plan {
                treatment: join(summary.treatment.iter()),
                follow_up: join(summary.prognosis.iter()),
            },
        }
    }

    /// The first two patient statements, space-joined.
    pub fn history_of_present_illness(&self, transcript: &Transcript) -> String {
        transcript
            .patient_turns()
            .take(HPI_TURNS)
            .map(|turn| turn.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The first physician statement after an examination marker line.
    ///
    /// Only looked for when the transcript mentions an exam or check at all.
    pub fn physical_exam(&self, transcript: &Transcript) -> String {
        let lower = transcript.raw().to_lowercase();
        if !(lower.contains("exam") || lower.contains("check")) {
            return GENERAL_OBSERVATION.to_string();
        }

        let mut capturing = false;
        for turn in transcript.turns() {
            if is_exam_marker(&turn.line) {
                capturing = true;
                continue;
            }
            if capturing && turn.speaker == Speaker::Physician {
                return turn.text.clone();
            }
        }

        GENERAL_OBSERVATION.to_string()
    }
}

fn is_exam_marker(line: &str) -> bool {
    line.contains("Physical Examination Conducted") || line.to_lowercase().contains("examination")
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items.map(String::as_str).collect::<Vec<_>>().join(LIST_SEPARATOR)
}
