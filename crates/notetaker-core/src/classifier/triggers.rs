//! Trigger tables for sentiment and intent classification.

use serde::{Deserialize, Serialize};

/// Keyword tables consulted before (sentiment) or instead of (intent) the
/// affect model. All matching is substring matching on lower-cased text,
/// except `answer_tokens` which must prefix the trimmed statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Any of these → Anxious
    pub negative_triggers: Vec<String>,
    /// Any of these (and no negative trigger) → Reassured
    pub positive_triggers: Vec<String>,
    pub greetings: Vec<String>,
    pub gratitude: Vec<String>,
    /// Combined with a `?` → Seeking reassurance
    pub reassurance_words: Vec<String>,
    /// Prefix of a statement without `?` → Answering question
    pub answer_tokens: Vec<String>,
    /// Affect labels starting with this (upper-cased) map to Anxious
    pub negative_prefix: String,
    /// Affect labels starting with this (upper-cased) map to Reassured
    pub positive_prefix: String,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            negative_triggers: strings(&[
                "worried",
                "worry",
                "anxious",
                "anxiety",
                "concerned",
                "scared",
                "afraid",
                "pain",
                "hurt",
                "discomfort",
                "stiffness",
                "ache",
                "sore",
            ]),
            positive_triggers: strings(&[
                "relieved",
                "relief",
                "better",
                "improving",
                "improved",
                "fine now",
                "okay now",
                "that's a relief",
                "great to hear",
            ]),
            greetings: strings(&["good morning", "good afternoon", "good evening", "hello", "hi "]),
            gratitude: strings(&["thank you", "thanks", "appreciate it"]),
            reassurance_words: strings(&[
                "worry", "worried", "concerned", "ok", "okay", "future", "problem",
            ]),
            answer_tokens: strings(&["yes", "no", "yeah", "nope"]),
            negative_prefix: "NEG".to_string(),
            positive_prefix: "POS".to_string(),
        }
    }
}

impl ClassifierRules {
    /// Add a word that marks a statement as anxious.
    pub fn add_negative_trigger(&mut self, trigger: &str) {
        self.negative_triggers.push(trigger.to_lowercase());
    }

    /// Add a word that marks a statement as reassured.
    pub fn add_positive_trigger(&mut self, trigger: &str) {
        self.positive_triggers.push(trigger.to_lowercase());
    }

    /// Copy with every table lower-cased and prefixes upper-cased.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            negative_triggers: lowercase_all(&self.negative_triggers),
            positive_triggers: lowercase_all(&self.positive_triggers),
            greetings: lowercase_all(&self.greetings),
            gratitude: lowercase_all(&self.gratitude),
            reassurance_words: lowercase_all(&self.reassurance_words),
            answer_tokens: lowercase_all(&self.answer_tokens),
            negative_prefix: self.negative_prefix.to_uppercase(),
            positive_prefix: self.positive_prefix.to_uppercase(),
        }
    }
}

/// Whether any of `needles` occurs in `haystack`.
pub(crate) fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rules: ClassifierRules =
            serde_json::from_str(r#"{"greetings": ["howdy"], "negative_prefix": "neg"}"#).unwrap();

        assert_eq!(rules.greetings, vec!["howdy"]);
        assert_eq!(rules.gratitude, ClassifierRules::default().gratitude);
        assert_eq!(rules.normalized().negative_prefix, "NEG");
    }

    #[test]
    fn test_legacy_symptom_words_are_ignored() {
        let rules: ClassifierRules =
            serde_json::from_str(r#"{"symptom_words": ["neck"], "answer_tokens": ["sure"]}"#)
                .unwrap();
        assert_eq!(rules.answer_tokens, vec!["sure"]);
        assert_eq!(rules.greetings, ClassifierRules::default().greetings);
    }

    #[test]
    fn test_normalized_lowercases() {
        let mut rules = ClassifierRules::default();
        rules.greetings.push("Howdy".to_string());
        rules.add_negative_trigger("Nervous");

        let normalized = rules.normalized();
        assert!(normalized.greetings.contains(&"howdy".to_string()));
        assert!(normalized.negative_triggers.contains(&"nervous".to_string()));
    }

    #[test]
    fn test_contains_any() {
        let needles = strings(&["hi ", "hello"]);
        assert!(contains_any("hi there", &needles));
        assert!(!contains_any("hi", &needles));
        assert!(!contains_any("nothing", &needles));
    }
}
