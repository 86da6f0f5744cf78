//! Domain models for the notetaker pipeline.

mod soap;
mod summary;
mod transcript;
mod utterance;

pub use soap::*;
pub use summary::*;
pub use transcript::*;
pub use utterance::*;
