//! Entity recognition and affect classification for clinical transcripts.
//!
//! This crate provides the two model collaborators of the notetaker pipeline:
//! - [`EntityRecognizer`]: DISEASE / CHEMICAL spans (lexicon or completion model)
//! - [`AffectClassifier`]: statement polarity (lexicon or completion model)
//!
//! plus the sentence and noun-chunk segmentation used by keyword extraction.

pub mod affect;
pub mod extraction;
pub mod lexicon;
pub mod model;
pub mod prompts;
pub mod text;

pub use affect::*;
pub use extraction::*;
pub use lexicon::*;
pub use model::{CompletionBackend, ModelError, ModelResult};
pub use prompts::*;
