//! Per-utterance sentiment and intent models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient affect category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Anxious,
    Neutral,
    Reassured,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Anxious => "Anxious",
            Sentiment::Neutral => "Neutral",
            Sentiment::Reassured => "Reassured",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the patient is doing with an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Greeting,
    #[serde(rename = "Seeking reassurance")]
    SeekingReassurance,
    #[serde(rename = "Reporting symptoms")]
    ReportingSymptoms,
    /// Also assigned to expressions of gratitude
    #[serde(rename = "Expressing concern")]
    ExpressingConcern,
    #[serde(rename = "Answering question")]
    AnsweringQuestion,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "Greeting",
            Intent::SeekingReassurance => "Seeking reassurance",
            Intent::ReportingSymptoms => "Reporting symptoms",
            Intent::ExpressingConcern => "Expressing concern",
            Intent::AnsweringQuestion => "Answering question",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one patient statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceAnalysis {
    #[serde(rename = "Statement")]
    pub statement: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
    #[serde(rename = "Intent")]
    pub intent: Intent,
}
