//! Dictionary-based entity recognizer.
//!
//! Handles:
//! - Multi-word terms (longest match wins, spans never overlap)
//! - Case-insensitive, whole-word matching
//! - Near-miss spellings of long single-word terms (transcription noise)

use std::path::Path;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::debug;

use crate::extraction::{Entity, EntityLabel, EntityRecognizer};
use crate::model::{ModelError, ModelResult};

/// Minimum term length (chars) eligible for fuzzy matching.
const FUZZY_MIN_LEN: usize = 6;

/// Minimum Jaro-Winkler similarity for a fuzzy match.
const FUZZY_THRESHOLD: f64 = 0.95;

/// Disease and chemical vocabularies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub chemicals: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            diseases: Self::default_diseases(),
            chemicals: Self::default_chemicals(),
        }
    }
}

impl Lexicon {
    /// Load a lexicon from a JSON file.
    ///
    /// A missing, unreadable or malformed file means the recognizer is unavailable.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModelError::Unavailable(format!("cannot read lexicon {}: {}", path.display(), e))
        })?;
        let lexicon: Lexicon = serde_json::from_str(&content).map_err(|e| {
            ModelError::Unavailable(format!("invalid lexicon {}: {}", path.display(), e))
        })?;
        if lexicon.diseases.is_empty() && lexicon.chemicals.is_empty() {
            return Err(ModelError::Unavailable(format!(
                "lexicon {} has no terms",
                path.display()
            )));
        }
        Ok(lexicon)
    }

    fn default_diseases() -> Vec<String> {
        [
            // Injuries
            "whiplash",
            "whiplash injury",
            "concussion",
            "fracture",
            "sprain",
            "strain",
            "bruising",
            "head injury",
            "soft tissue injury",
            // Pain
            "neck pain",
            "back pain",
            "lower back pain",
            "chest pain",
            "backache",
            "headache",
            "migraine",
            "stiffness",
            // Other conditions
            "dizziness",
            "nausea",
            "insomnia",
            "anxiety",
            "depression",
            "arthritis",
            "hypertension",
            "diabetes",
            "asthma",
            "infection",
            "inflammation",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn default_chemicals() -> Vec<String> {
        [
            "ibuprofen",
            "paracetamol",
            "acetaminophen",
            "aspirin",
            "naproxen",
            "diclofenac",
            "codeine",
            "tramadol",
            "morphine",
            "oxycodone",
            "amitriptyline",
            "diazepam",
            "cyclobenzaprine",
            "prednisone",
            "alcohol",
            "caffeine",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

/// A lexicon term split into lower-case words.
struct Term {
    words: Vec<String>,
    label: EntityLabel,
}

/// A word token with its byte span in the source text.
struct Token {
    lower: String,
    start: usize,
    end: usize,
}

/// Entity recognizer over a fixed [`Lexicon`].
pub struct LexiconRecognizer {
    /// Terms ordered longest (in words) first
    terms: Vec<Term>,
}

impl Default for LexiconRecognizer {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

impl LexiconRecognizer {
    /// Create a recognizer over `lexicon`.
    pub fn new(lexicon: Lexicon) -> Self {
        let mut terms: Vec<Term> = lexicon
            .diseases
            .iter()
            .map(|t| (t, EntityLabel::Disease))
            .chain(lexicon.chemicals.iter().map(|t| (t, EntityLabel::Chemical)))
            .filter_map(|(term, label)| {
                let words: Vec<String> = tokenize(term).into_iter().map(|t| t.lower).collect();
                (!words.is_empty()).then_some(Term { words, label })
            })
            .collect();

        // Stable: equal-length terms keep lexicon order
        terms.sort_by(|a, b| b.words.len().cmp(&a.words.len()));

        Self { terms }
    }

    /// Load the lexicon from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        Ok(Self::new(Lexicon::from_path(path)?))
    }

    /// Number of terms known to the recognizer.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Find the term matching at `tokens[index..]`: exact multi-word matches
    /// first (longest wins), then fuzzy single-word matches.
    fn match_at(&self, tokens: &[Token], index: usize) -> Option<(usize, &EntityLabel)> {
        let exact = self.terms.iter().find(|term| {
            let n = term.words.len();
            index + n <= tokens.len()
                && term
                    .words
                    .iter()
                    .zip(&tokens[index..index + n])
                    .all(|(word, token)| *word == token.lower)
        });
        if let Some(term) = exact {
            return Some((term.words.len(), &term.label));
        }

        let token = &tokens[index].lower;
        if token.chars().count() < FUZZY_MIN_LEN {
            return None;
        }
        self.terms
            .iter()
            .filter(|term| term.words.len() == 1 && term.words[0].chars().count() >= FUZZY_MIN_LEN)
            .find(|term| jaro_winkler(&term.words[0], token) >= FUZZY_THRESHOLD)
            .map(|term| (1, &term.label))
    }
}

impl EntityRecognizer for LexiconRecognizer {
    fn recognize(&self, text: &str) -> ModelResult<Vec<Entity>> {
        let tokens = tokenize(text);
        let mut entities = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            match self.match_at(&tokens, index) {
                Some((len, label)) => {
                    let start = tokens[index].start;
                    let end = tokens[index + len - 1].end;
                    entities.push(Entity {
                        text: text[start..end].to_string(),
                        label: label.clone(),
                        start,
                        end,
                    });
                    index += len;
                }
                None => index += 1,
            }
        }

        debug!(count = entities.len(), "lexicon recognizer matched entities");
        Ok(entities)
    }

    fn ensure_ready(&self) -> ModelResult<()> {
        if self.terms.is_empty() {
            return Err(ModelError::Unavailable("lexicon has no terms".into()));
        }
        Ok(())
    }
}

/// Split text into word tokens (alphanumerics and inner hyphens).
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let is_word = c.is_alphanumeric() || (c == '-' && start.is_some());
        match (is_word, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                push_token(&mut tokens, text, s, i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_token(&mut tokens, text, s, text.len());
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
    let word = text[start..end].trim_end_matches('-');
    if word.is_empty() {
        return;
    }
    let end = start + word.len();
    tokens.push(Token {
        lower: word.to_lowercase(),
        start,
        end,
    });
}
