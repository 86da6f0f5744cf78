//! Transcript models: speaker turns parsed from `Role: utterance` lines.

use serde::{Deserialize, Serialize};

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    Patient,
    /// Labelled `Doctor` or `Physician`
    Physician,
    /// No recognized role prefix
    Unknown,
}

impl Speaker {
    /// Map a role label to a speaker (case-sensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Patient" => Some(Speaker::Patient),
            "Doctor" | "Physician" => Some(Speaker::Physician),
            _ => None,
        }
    }

    /// Whether this speaker is one of the recognized roles.
    pub fn is_known(&self) -> bool {
        !matches!(self, Speaker::Unknown)
    }
}

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker role
    pub speaker: Speaker,
    /// Utterance with the role prefix stripped (whole line for unknown speakers)
    pub text: String,
    /// Trimmed raw line
    pub line: String,
}

/// A parsed consultation transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    raw: String,
    turns: Vec<Turn>,
}

impl Transcript {
    /// Parse raw transcript text.
    ///
    /// Blank lines are dropped. Lines whose prefix is not a recognized role
    /// become [`Speaker::Unknown`] turns.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let turns = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(parse_line)
            .collect();
        Self { raw, turns }
    }

    /// The transcript exactly as provided.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// All turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns spoken by `speaker`, in order.
    pub fn turns_by(&self, speaker: Speaker) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.speaker == speaker)
    }

    /// Patient turns, in order.
    pub fn patient_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns_by(Speaker::Patient)
    }

    /// Whether the transcript has any turns at all.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl From<&str> for Transcript {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

fn parse_line(line: &str) -> Turn {
    let role = line
        .split_once(':')
        .and_then(|(label, rest)| Speaker::from_label(label.trim()).map(|s| (s, rest)));

    match role {
        Some((speaker, rest)) => Turn {
            speaker,
            text: rest.trim().to_string(),
            line: line.to_string(),
        },
        None => Turn {
            speaker: Speaker::Unknown,
            text: line.to_string(),
            line: line.to_string(),
        },
    }
}
