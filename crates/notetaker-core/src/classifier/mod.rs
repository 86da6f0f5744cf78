//! Patient utterance classification.
//!
//! Sentiment is decided by trigger words first; the affect model is only
//! consulted for statements no trigger covers. Intent is purely rule-based.

mod triggers;

pub use triggers::*;

use notetaker_nlp::{AffectClassifier, ModelResult};
use tracing::debug;

use crate::models::{Intent, Sentiment, Transcript, UtteranceAnalysis};

/// Labels patient statements with a sentiment and an intent.
pub struct UtteranceClassifier<A> {
    affect: A,
    rules: ClassifierRules,
}

impl<A: AffectClassifier> UtteranceClassifier<A> {
    /// Create a classifier; fails if the affect classifier is not ready.
    pub fn new(affect: A, rules: ClassifierRules) -> ModelResult<Self> {
        affect.ensure_ready()?;
        Ok(Self {
            affect,
            rules: rules.normalized(),
        })
    }

    /// Create a classifier with the built-in trigger tables.
    pub fn with_default_rules(affect: A) -> ModelResult<Self> {
        Self::new(affect, ClassifierRules::default())
    }

    /// Classify every non-empty patient turn, in transcript order.
    pub fn analyze(&self, transcript: &Transcript) -> ModelResult<Vec<UtteranceAnalysis>> {
        let analyses = transcript
            .patient_turns()
            .filter(|turn| !turn.text.trim().is_empty())
            .map(|turn| self.classify(&turn.text))
            .collect::<ModelResult<Vec<_>>>()?;

        debug!(statements = analyses.len(), "classified patient statements");
        Ok(analyses)
    }

    /// Classify one statement.
    pub fn classify(&self, statement: &str) -> ModelResult<UtteranceAnalysis> {
        Ok(UtteranceAnalysis {
            statement: statement.to_string(),
            sentiment: self.sentiment(statement)?,
            intent: self.intent(statement),
        })
    }

    /// Anxious / Reassured by trigger, otherwise by affect label.
    pub fn sentiment(&self, statement: &str) -> ModelResult<Sentiment> {
        let lower = statement.to_lowercase();

        if contains_any(&lower, &self.rules.negative_triggers) {
            return Ok(Sentiment::Anxious);
        }
        if contains_any(&lower, &self.rules.positive_triggers) {
            return Ok(Sentiment::Reassured);
        }

        let score = self.affect.classify(statement)?;
        let label = score.label.to_uppercase();
        let sentiment = if label.starts_with(&self.rules.negative_prefix) {
            Sentiment::Anxious
        } else if label.starts_with(&self.rules.positive_prefix) {
            Sentiment::Reassured
        } else {
            Sentiment::Neutral
        };

        debug!(label = %score.label, confidence = score.confidence, %sentiment, "affect fallback");
        Ok(sentiment)
    }

    /// First matching intent rule; defaults to Reporting symptoms.
    pub fn intent(&self, statement: &str) -> Intent {
        let lower = statement.trim().to_lowercase();
        let asks = lower.contains('?');

        if contains_any(&lower, &self.rules.greetings) {
            return Intent::Greeting;
        }
        if contains_any(&lower, &self.rules.gratitude) {
            return Intent::ExpressingConcern;
        }
        if asks && contains_any(&lower, &self.rules.reassurance_words) {
            return Intent::SeekingReassurance;
        }
        if !asks && self.starts_with_answer(&lower) {
            return Intent::AnsweringQuestion;
        }
        // Symptom reports and everything unmatched share one label
        Intent::ReportingSymptoms
    }

    /// Get the affect classifier for direct access.
    pub fn affect(&self) -> &A {
        &self.affect
    }

    /// Plain prefix test, so "nothing" and "not" count as "no".
    fn starts_with_answer(&self, lower: &str) -> bool {
        self.rules
            .answer_tokens
            .iter()
            .any(|t| lower.starts_with(t.as_str()))
    }
}
