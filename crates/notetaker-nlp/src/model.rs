//! Shared error type and the completion-backend seam.

use thiserror::Error;

/// Errors raised by recognizers, classifiers and completion backends.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// A text-completion model (local or hosted).
///
/// Model-backed collaborators build a prompt, hand it to the backend and parse
/// the JSON in its reply.
pub trait CompletionBackend {
    /// Run a single completion.
    fn complete(&self, prompt: &str) -> ModelResult<String>;

    /// Verify the backend can serve requests (model loaded, endpoint reachable).
    fn health_check(&self) -> ModelResult<()> {
        Ok(())
    }
}

impl<B: CompletionBackend + ?Sized> CompletionBackend for &B {
    fn complete(&self, prompt: &str) -> ModelResult<String> {
        (**self).complete(prompt)
    }

    fn health_check(&self) -> ModelResult<()> {
        (**self).health_check()
    }
}

/// Locate the outermost JSON object in a model reply (models often add prose
/// around it).
pub(crate) fn json_object_slice(response: &str) -> ModelResult<&str> {
    let start = response.find('{').ok_or_else(|| {
        ModelError::InvalidFormat("No JSON object found in response".into())
    })?;
    let end = response.rfind('}').ok_or_else(|| {
        ModelError::InvalidFormat("No closing brace found in response".into())
    })?;
    if end < start {
        return Err(ModelError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }
    Ok(&response[start..=end])
}
