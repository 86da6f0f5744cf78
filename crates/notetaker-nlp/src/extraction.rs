//! Clinical entity recognition: the recognizer contract and model-output parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{json_object_slice, CompletionBackend, ModelError, ModelResult};
use crate::prompts::build_full_prompt;

/// Category assigned to a recognized span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Disease,
    Chemical,
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Disease => "DISEASE",
            EntityLabel::Chemical => "CHEMICAL",
            EntityLabel::Other(label) => label,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        match label.to_uppercase().as_str() {
            "DISEASE" => EntityLabel::Disease,
            "CHEMICAL" => EntityLabel::Chemical,
            _ => EntityLabel::Other(label),
        }
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized span of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Span text as written in the transcript
    pub text: String,
    /// Category label
    pub label: EntityLabel,
    /// Byte offset where the span starts
    pub start: usize,
    /// Byte offset where the span ends
    pub end: usize,
}

impl Entity {
    pub fn is_disease(&self) -> bool {
        self.label == EntityLabel::Disease
    }

    pub fn is_chemical(&self) -> bool {
        self.label == EntityLabel::Chemical
    }
}

/// Named-entity recognition over clinical text.
pub trait EntityRecognizer {
    /// Recognize entities in `text`, in order of appearance.
    fn recognize(&self, text: &str) -> ModelResult<Vec<Entity>>;

    /// Fail with [`ModelError::Unavailable`] if the recognizer cannot serve requests.
    fn ensure_ready(&self) -> ModelResult<()> {
        Ok(())
    }
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for &R {
    fn recognize(&self, text: &str) -> ModelResult<Vec<Entity>> {
        (**self).recognize(text)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        (**self).ensure_ready()
    }
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for Box<R> {
    fn recognize(&self, text: &str) -> ModelResult<Vec<Entity>> {
        (**self).recognize(text)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        (**self).ensure_ready()
    }
}

/// Raw NER output from a language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerOutput {
    pub entities: Vec<RawEntity>,
}

/// An entity as reported by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    pub text: String,
    pub label: String,
    pub start_offset: Option<usize>,
    pub end_offset: Option<usize>,
}

/// Parse model output JSON into raw entities.
pub fn parse_ner_output(response: &str) -> ModelResult<NerOutput> {
    let json_slice = json_object_slice(response)?;
    let output: NerOutput = serde_json::from_str(json_slice)?;
    Ok(output)
}

/// Convert raw model entities to [`Entity`] values.
///
/// Models are unreliable about offsets, so missing or out-of-range offsets are
/// recovered by locating the span text in the source.
pub fn to_entities(output: &NerOutput, source: &str) -> Vec<Entity> {
    output
        .entities
        .iter()
        .filter(|e| !e.text.trim().is_empty())
        .map(|e| {
            let text = e.text.trim().to_string();
            let (start, end) = match (e.start_offset, e.end_offset) {
                (Some(start), Some(end))
                    if start < end && source.get(start..end) == Some(text.as_str()) =>
                {
                    (start, end)
                }
                _ => source
                    .find(&text)
                    .map(|start| (start, start + text.len()))
                    .unwrap_or((0, 0)),
            };
            Entity {
                text,
                label: EntityLabel::from(e.label.clone()),
                start,
                end,
            }
        })
        .collect()
}

/// Entity recognizer backed by a text-completion model.
pub struct ModelRecognizer<B> {
    backend: B,
    include_examples: bool,
}

impl<B: CompletionBackend> ModelRecognizer<B> {
    /// Create a recognizer that sends few-shot prompts to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            include_examples: true,
        }
    }

    /// Toggle few-shot examples in the prompt.
    pub fn with_examples(mut self, include_examples: bool) -> Self {
        self.include_examples = include_examples;
        self
    }
}

impl<B: CompletionBackend> EntityRecognizer for ModelRecognizer<B> {
    fn recognize(&self, text: &str) -> ModelResult<Vec<Entity>> {
        let prompt = build_full_prompt(text, self.include_examples);
        let response = self.backend.complete(&prompt)?;
        let output = parse_ner_output(&response)?;
        let entities = to_entities(&output, text);
        debug!(count = entities.len(), "model recognizer returned entities");
        Ok(entities)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        self.backend
            .health_check()
            .map_err(|e| ModelError::Unavailable(e.to_string()))
    }
}
