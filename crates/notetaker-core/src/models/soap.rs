//! SOAP note and final report models.

use serde::{Deserialize, Serialize};

use super::summary::ClinicalSummary;
use super::utterance::UtteranceAnalysis;

/// Four-section clinical note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoapNote {
    #[serde(rename = "Subjective")]
    pub subjective: Subjective,
    #[serde(rename = "Objective")]
    pub objective: Objective,
    #[serde(rename = "Assessment")]
    pub assessment: Assessment,
    #[serde(rename = "Plan")]
    pub plan: Plan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subjective {
    /// Joined symptoms
    #[serde(rename = "Chief_Complaint")]
    pub chief_complaint: String,
    /// Opening patient statements
    #[serde(rename = "History_of_Present_Illness")]
    pub history_of_present_illness: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(rename = "Physical_Exam")]
    pub physical_exam: String,
    #[serde(rename = "Observations")]
    pub observations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
    /// Current status
    #[serde(rename = "Severity")]
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "Treatment")]
    pub treatment: String,
    /// Joined prognosis
    #[serde(rename = "Follow-Up")]
    pub follow_up: String,
}

/// The document written for each processed transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotetakerReport {
    #[serde(rename = "Medical_NLP_Summary")]
    pub summary: ClinicalSummary,
    #[serde(rename = "Patient_Sentiment_Analysis")]
    pub sentiment_analysis: Vec<UtteranceAnalysis>,
    #[serde(rename = "SOAP_Note")]
    pub soap_note: SoapNote,
}

impl NotetakerReport {
    /// Serialize to indented JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> SoapNote {
        SoapNote {
            subjective: Subjective {
                chief_complaint: "Neck pain".into(),
                history_of_present_illness: "I had a car accident.".into(),
            },
            objective: Objective {
                physical_exam: "Full range of motion.".into(),
                observations: "Patient appears matching description of recovery.".into(),
            },
            assessment: Assessment {
                diagnosis: "Whiplash injury".into(),
                severity: "Improving".into(),
            },
            plan: Plan {
                treatment: "Painkillers".into(),
                follow_up: "Full recovery expected".into(),
            },
        }
    }

    #[test]
    fn test_soap_field_names() {
        let value = serde_json::to_value(sample_note()).unwrap();

        assert_eq!(value["Subjective"]["Chief_Complaint"], "Neck pain");
        assert_eq!(
            value["Subjective"]["History_of_Present_Illness"],
            "I had a car accident."
        );
        assert_eq!(value["Objective"]["Physical_Exam"], "Full range of motion.");
        assert!(value["Objective"]["Observations"].is_string());
        assert_eq!(value["Assessment"]["Diagnosis"], "Whiplash injury");
        assert_eq!(value["Assessment"]["Severity"], "Improving");
        assert_eq!(value["Plan"]["Treatment"], "Painkillers");
        assert_eq!(value["Plan"]["Follow-Up"], "Full recovery expected");
    }

    #[test]
    fn test_report_json() {
        let report = NotetakerReport {
            summary: ClinicalSummary::default(),
            sentiment_analysis: vec![],
            soap_note: sample_note(),
        };

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(value["Medical_NLP_Summary"].is_object());
        assert_eq!(value["Patient_Sentiment_Analysis"], serde_json::json!([]));
        assert!(value["SOAP_Note"]["Plan"].is_object());

        let back: NotetakerReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
