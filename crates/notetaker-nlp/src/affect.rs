//! Affect (polarity) classification of patient statements.
//!
//! Labels follow the `POSITIVE` / `NEGATIVE` / `NEUTRAL` convention; consumers
//! only rely on the `POS` / `NEG` prefix.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{json_object_slice, CompletionBackend, ModelError, ModelResult};
use crate::prompts::build_affect_prompt;

pub const POSITIVE: &str = "POSITIVE";
pub const NEGATIVE: &str = "NEGATIVE";
pub const NEUTRAL: &str = "NEUTRAL";

/// Polarity label with the classifier's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectScore {
    pub label: String,
    pub confidence: f64,
}

impl AffectScore {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Polarity classification over a text span.
pub trait AffectClassifier {
    fn classify(&self, text: &str) -> ModelResult<AffectScore>;

    /// Fail with [`ModelError::Unavailable`] if the classifier cannot serve requests.
    fn ensure_ready(&self) -> ModelResult<()> {
        Ok(())
    }
}

impl<A: AffectClassifier + ?Sized> AffectClassifier for &A {
    fn classify(&self, text: &str) -> ModelResult<AffectScore> {
        (**self).classify(text)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        (**self).ensure_ready()
    }
}

impl<A: AffectClassifier + ?Sized> AffectClassifier for Box<A> {
    fn classify(&self, text: &str) -> ModelResult<AffectScore> {
        (**self).classify(text)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        (**self).ensure_ready()
    }
}

/// Parse a model reply of the form `{"label": ..., "confidence": ...}`.
pub fn parse_affect_output(response: &str) -> ModelResult<AffectScore> {
    let json_slice = json_object_slice(response)?;
    let score: AffectScore = serde_json::from_str(json_slice)?;
    if score.label.trim().is_empty() {
        return Err(ModelError::InvalidFormat("Empty affect label".into()));
    }
    Ok(score)
}

/// Affect classifier backed by a text-completion model.
pub struct ModelAffectClassifier<B> {
    backend: B,
}

impl<B: CompletionBackend> ModelAffectClassifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: CompletionBackend> AffectClassifier for ModelAffectClassifier<B> {
    fn classify(&self, text: &str) -> ModelResult<AffectScore> {
        let response = self.backend.complete(&build_affect_prompt(text))?;
        parse_affect_output(&response)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        self.backend
            .health_check()
            .map_err(|e| ModelError::Unavailable(e.to_string()))
    }
}

/// Valence word lists for [`LexiconAffectClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectLexicon {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

impl Default for AffectLexicon {
    fn default() -> Self {
        let positive = [
            "good", "great", "fine", "glad", "happy", "thankful", "grateful", "helpful",
            "helped", "easier", "comfortable", "confident", "hopeful", "nice", "positive",
            "well", "wonderful", "excellent",
        ];
        let negative = [
            "bad", "terrible", "awful", "horrible", "worse", "worst", "difficult", "hard",
            "scary", "frightening", "upset", "nervous", "stressed", "tired", "exhausted",
            "struggle", "struggling", "unable", "can't", "couldn't", "shock", "shocked",
        ];
        Self {
            positive: positive.into_iter().map(String::from).collect(),
            negative: negative.into_iter().map(String::from).collect(),
        }
    }
}

impl AffectLexicon {
    /// Load valence lists from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModelError::Unavailable(format!(
                "cannot read affect lexicon {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ModelError::Unavailable(format!("invalid affect lexicon {}: {}", path.display(), e))
        })
    }
}

/// Word-count polarity classifier.
///
/// Confidence is the share of matched words on the winning side; a statement
/// with no matches is `NEUTRAL` with full confidence.
#[derive(Debug, Clone, Default)]
pub struct LexiconAffectClassifier {
    lexicon: AffectLexicon,
}

impl LexiconAffectClassifier {
    pub fn new(lexicon: AffectLexicon) -> Self {
        Self { lexicon }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        Ok(Self::new(AffectLexicon::from_path(path)?))
    }

    fn count(words: &[String], list: &[String]) -> usize {
        words.iter().filter(|w| list.iter().any(|l| l == *w)).count()
    }
}

impl AffectClassifier for LexiconAffectClassifier {
    fn classify(&self, text: &str) -> ModelResult<AffectScore> {
        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let positive = Self::count(&words, &self.lexicon.positive);
        let negative = Self::count(&words, &self.lexicon.negative);
        let total = (positive + negative) as f64;

        let score = if positive > negative {
            AffectScore::new(POSITIVE, positive as f64 / total)
        } else if negative > positive {
            AffectScore::new(NEGATIVE, negative as f64 / total)
        } else if total == 0.0 {
            AffectScore::new(NEUTRAL, 1.0)
        } else {
            AffectScore::new(NEUTRAL, 0.5)
        };

        debug!(label = %score.label, positive, negative, "lexicon affect score");
        Ok(score)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        if self.lexicon.positive.is_empty() && self.lexicon.negative.is_empty() {
            return Err(ModelError::Unavailable("affect lexicon has no words".into()));
        }
        Ok(())
    }
}
