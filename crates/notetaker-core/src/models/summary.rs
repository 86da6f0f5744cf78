//! Clinical summary models.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Diagnosis reported when nothing more specific was found.
pub const UNDER_INVESTIGATION: &str = "Under investigation";

/// Patient name reported when no titled name was found.
pub const UNKNOWN_PATIENT: &str = "Unknown";

/// Current patient status. Exactly one applies per transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurrentStatus {
    #[serde(rename = "Occasional backache")]
    OccasionalBackache,
    Improving,
    Recovered,
    #[default]
    Stable,
}

impl CurrentStatus {
    pub const ALL: [CurrentStatus; 4] = [
        CurrentStatus::OccasionalBackache,
        CurrentStatus::Improving,
        CurrentStatus::Recovered,
        CurrentStatus::Stable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentStatus::OccasionalBackache => "Occasional backache",
            CurrentStatus::Improving => "Improving",
            CurrentStatus::Recovered => "Recovered",
            CurrentStatus::Stable => "Stable",
        }
    }
}

impl fmt::Display for CurrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty set of diagnoses.
///
/// Construction from an empty set yields `{"Under investigation"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Diagnosis(BTreeSet<String>);

impl Diagnosis {
    /// Build from findings, falling back to the "Under investigation" sentinel.
    pub fn from_findings<I>(findings: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let set: BTreeSet<String> = findings
            .into_iter()
            .filter(|d| !d.trim().is_empty())
            .collect();
        if set.is_empty() {
            Self::under_investigation()
        } else {
            Self(set)
        }
    }

    pub fn under_investigation() -> Self {
        Self(BTreeSet::from([UNDER_INVESTIGATION.to_string()]))
    }

    pub fn is_under_investigation(&self) -> bool {
        self.0.len() == 1 && self.0.contains(UNDER_INVESTIGATION)
    }

    pub fn contains(&self, diagnosis: &str) -> bool {
        self.0.contains(diagnosis)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Number of diagnoses (always at least 1).
    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.iter().map(String::as_str).collect::<Vec<_>>().join(separator)
    }
}

impl Default for Diagnosis {
    fn default() -> Self {
        Self::under_investigation()
    }
}

impl From<Vec<String>> for Diagnosis {
    fn from(findings: Vec<String>) -> Self {
        Self::from_findings(findings)
    }
}

impl From<Diagnosis> for Vec<String> {
    fn from(diagnosis: Diagnosis) -> Self {
        diagnosis.0.into_iter().collect()
    }
}

/// Structured medical summary of a transcript.
///
/// Field names are serialized exactly as downstream tooling expects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalSummary {
    /// Titled patient name ("Ms. Jones") or "Unknown"
    #[serde(rename = "Patient_Name")]
    pub patient_name: String,
    #[serde(rename = "Symptoms")]
    pub symptoms: BTreeSet<String>,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: Diagnosis,
    /// Ordered by rule
    #[serde(rename = "Treatment")]
    pub treatment: Vec<String>,
    #[serde(rename = "Current_Status")]
    pub current_status: CurrentStatus,
    /// Ordered by rule
    #[serde(rename = "Prognosis")]
    pub prognosis: Vec<String>,
    #[serde(rename = "Detected_Diseases")]
    pub detected_diseases: BTreeSet<String>,
    #[serde(rename = "Detected_Chemicals")]
    pub detected_chemicals: BTreeSet<String>,
    /// Most frequent first
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
    /// Extractive summary sentences
    #[serde(rename = "Summary")]
    pub summary: String,
}

impl Default for ClinicalSummary {
    fn default() -> Self {
        Self {
            patient_name: UNKNOWN_PATIENT.to_string(),
            symptoms: BTreeSet::new(),
            diagnosis: Diagnosis::default(),
            treatment: Vec::new(),
            current_status: CurrentStatus::default(),
            prognosis: Vec::new(),
            detected_diseases: BTreeSet::new(),
            detected_chemicals: BTreeSet::new(),
            keywords: Vec::new(),
            summary: String::new(),
        }
    }
}

impl ClinicalSummary {
    /// Whether a titled patient name was found.
    pub fn has_patient_name(&self) -> bool {
        self.patient_name != UNKNOWN_PATIENT
    }
}
