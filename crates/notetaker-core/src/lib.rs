//! Physician Notetaker Core Library
//!
//! Turns a doctor-patient dialogue into structured clinical documentation.
//!
//! # Architecture
//!
//! ```text
//! Raw transcript → Transcript::parse
//!                        │
//!          ┌─────────────┼──────────────────────┐
//!          │             │                      │
//!          ▼             │                      ▼
//!  ClinicalExtractor     │           UtteranceClassifier
//!  (entities + rules)    │           (Patient turns only)
//!          │             │                      │
//!          ▼             ▼                      │
//!   ClinicalSummary → NoteSynthesizer           │
//!          │             │                      │
//!          │             ▼                      ▼
//!          │         SoapNote        Vec<UtteranceAnalysis>
//!          │             │                      │
//!          └─────────────┴──────────┬───────────┘
//!                                   ▼
//!                            NotetakerReport (JSON)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Transcript, ClinicalSummary, SoapNote, etc.)
//! - [`extractor`]: Clinical field extraction (rule tables + entity recognizer)
//! - [`classifier`]: Patient statement sentiment and intent
//! - [`soap`]: SOAP note synthesis
//! - [`pipeline`]: Orchestration and degradation policy

pub mod classifier;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod soap;

// Re-export commonly used types
pub use classifier::{ClassifierRules, UtteranceClassifier};
pub use extractor::{ClinicalExtractor, ExtractError, ExtractResult, ExtractorRules};
pub use models::{
    ClinicalSummary, CurrentStatus, Diagnosis, Intent, NotetakerReport, Sentiment, SoapNote,
    Speaker, Transcript, Turn, UtteranceAnalysis,
};
pub use pipeline::Pipeline;
pub use soap::NoteSynthesizer;

/// Crate-level error. Classifier failures never surface here; the
/// pipeline degrades instead.
#[derive(Debug, thiserror::Error)]
pub enum NotetakerError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NotetakerReport {
    /// Serialize to indented JSON, mapped to the crate error.
    pub fn render(&self) -> Result<String, NotetakerError> {
        Ok(self.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetaker_nlp::ModelError;

    #[test]
    fn test_error_conversions() {
        let err: NotetakerError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("Serialization error"));

        let err: NotetakerError =
            ExtractError::Recognition(ModelError::Inference("boom".into())).into();
        assert!(err.to_string().contains("Entity recognition failed"));
    }
}
