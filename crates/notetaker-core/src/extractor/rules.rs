//! Rule tables for clinical field extraction.
//!
//! Every cascade is an ordered list: output order and precedence follow list
//! order. Tables are plain data (serde) so they can be loaded from config and
//! overridden per deployment; [`ExtractorRules::default`] carries the built-in
//! vocabulary.

use notetaker_nlp::text::split_sentences;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::CurrentStatus;

use super::{ExtractError, ExtractResult};

/// Keyword condition in conjunctive form: every group must have at least one
/// keyword present (substring match on lower-cased text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(pub Vec<Vec<String>>);

impl Condition {
    /// All groups must match; within a group any keyword suffices.
    pub fn all_of(groups: &[&[&str]]) -> Self {
        Self(
            groups
                .iter()
                .map(|group| group.iter().map(|k| k.to_string()).collect())
                .collect(),
        )
    }

    /// Any single keyword suffices.
    pub fn any_of(keywords: &[&str]) -> Self {
        Self::all_of(&[keywords])
    }

    /// Evaluate against already lower-cased text. An empty condition never matches.
    pub fn matches(&self, lower: &str) -> bool {
        !self.0.is_empty()
            && self.0.iter().all(|group| {
                group
                    .iter()
                    .any(|keyword| lower.contains(keyword.to_lowercase().as_str()))
            })
    }
}

/// How much text a [`LabelRule`] condition must match within.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    /// Groups may match anywhere in the transcript.
    #[default]
    Text,
    /// All groups must match inside one sentence.
    Sentence,
}

/// Emit `label` when `when` matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRule {
    pub label: String,
    pub when: Condition,
    #[serde(default)]
    pub scope: MatchScope,
}

impl LabelRule {
    pub fn new(label: &str, when: Condition) -> Self {
        Self {
            label: label.to_string(),
            when,
            scope: MatchScope::Text,
        }
    }

    /// A rule whose groups must co-occur in one sentence.
    pub fn within_sentence(label: &str, when: Condition) -> Self {
        Self {
            scope: MatchScope::Sentence,
            ..Self::new(label, when)
        }
    }

    /// Evaluate against already lower-cased text.
    pub fn matches(&self, lower: &str) -> bool {
        match self.scope {
            MatchScope::Text => self.when.matches(lower),
            MatchScope::Sentence => lower
                .lines()
                .flat_map(split_sentences)
                .any(|sentence| self.when.matches(&sentence)),
        }
    }
}

/// Select `status` when `when` matches (first matching rule wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRule {
    pub status: CurrentStatus,
    pub when: Condition,
}

/// One step of a treatment or prognosis cascade. Each rule emits at most one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldRule {
    /// Fixed label.
    Label { when: Condition, label: String },
    /// Capture group 1 of `pattern` (on lower-cased text) substituted for `{}`
    /// in `template`; `fallback` when the pattern does not match.
    Capture {
        when: Condition,
        pattern: String,
        template: String,
        #[serde(default)]
        capitalize: bool,
        fallback: String,
    },
    /// `negated_label` if any negation phrase appears anywhere in the text,
    /// otherwise `label`.
    Negatable {
        when: Condition,
        negations: Vec<String>,
        label: String,
        negated_label: String,
    },
}

/// All extraction tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorRules {
    /// Honorifics that introduce a patient name ("Ms." → "Ms. Jones")
    pub name_titles: Vec<String>,
    /// Independent symptom rules
    pub symptoms: Vec<LabelRule>,
    /// Keyword diagnoses, unioned with recognized diseases
    pub diagnoses: Vec<LabelRule>,
    /// Ordered treatment cascade
    pub treatment: Vec<FieldRule>,
    /// Ordered prognosis cascade
    pub prognosis: Vec<FieldRule>,
    /// Ordered status rules; falls back to Stable
    pub status: Vec<StatusRule>,
    /// Noun chunks containing one of these become keyword candidates
    pub keyword_terms: Vec<String>,
    pub keyword_limit: usize,
    /// Sentences are scored by how many of these they contain
    pub summary_terms: Vec<String>,
    pub summary_limit: usize,
}

impl Default for ExtractorRules {
    fn default() -> Self {
        Self {
            name_titles: strings(&["Ms.", "Mr.", "Mrs.", "Dr."]),
            symptoms: Self::default_symptoms(),
            diagnoses: vec![LabelRule::new(
                "Whiplash injury",
                Condition::any_of(&["whiplash"]),
            )],
            treatment: Self::default_treatment(),
            prognosis: Self::default_prognosis(),
            status: Self::default_status(),
            keyword_terms: strings(&[
                "pain",
                "injury",
                "treatment",
                "therapy",
                "accident",
                "recovery",
                "damage",
                "examination",
                "symptom",
                "condition",
            ]),
            keyword_limit: 15,
            summary_terms: strings(&[
                "diagnosis",
                "treatment",
                "symptoms",
                "pain",
                "injury",
                "recovery",
                "prognosis",
                "examination",
                "accident",
            ]),
            summary_limit: 5,
        }
    }
}

impl ExtractorRules {
    /// Add a symptom rule; `groups` as in [`Condition::all_of`].
    pub fn add_symptom(&mut self, label: &str, groups: &[&[&str]]) {
        self.symptoms.push(LabelRule::new(label, Condition::all_of(groups)));
    }

    /// Add a keyword diagnosis.
    pub fn add_diagnosis(&mut self, keyword: &str, label: &str) {
        self.diagnoses
            .push(LabelRule::new(label, Condition::any_of(&[keyword])));
    }

    /// Add a fixed-label treatment rule at the end of the cascade.
    pub fn add_treatment(&mut self, keyword: &str, label: &str) {
        self.treatment.push(FieldRule::Label {
            when: Condition::any_of(&[keyword]),
            label: label.to_string(),
        });
    }

    /// Add a name title such as "Prof.".
    pub fn add_name_title(&mut self, title: &str) {
        self.name_titles.push(title.to_string());
    }

    fn default_symptoms() -> Vec<LabelRule> {
        vec![
            LabelRule::new("Neck pain", Condition::all_of(&[&["neck"], &["pain"]])),
            // "hurt" is too common to pair across sentences
            LabelRule::within_sentence("Neck pain", Condition::all_of(&[&["neck"], &["hurt"]])),
            LabelRule::new("Back pain", Condition::all_of(&[&["back"], &["pain"]])),
            LabelRule::within_sentence("Back pain", Condition::all_of(&[&["back"], &["hurt"]])),
            LabelRule::new("Head impact", Condition::all_of(&[&["head"], &["impact", "hit"]])),
            LabelRule::new("Discomfort", Condition::any_of(&["discomfort"])),
            LabelRule::new("Stiffness", Condition::any_of(&["stiffness"])),
            LabelRule::new("Trouble sleeping", Condition::any_of(&["trouble sleeping"])),
            LabelRule::new("Occasional backache", Condition::any_of(&["backache"])),
        ]
    }

    fn default_treatment() -> Vec<FieldRule> {
        vec![
            FieldRule::Capture {
                when: Condition::any_of(&["physiotherapy"]),
                pattern: r"(\w+)\s+sessions?\s+of\s+physiotherapy".to_string(),
                template: "{} physiotherapy sessions".to_string(),
                capitalize: true,
                fallback: "Physiotherapy sessions".to_string(),
            },
            FieldRule::Label {
                when: Condition::any_of(&["painkiller"]),
                label: "Painkillers".to_string(),
            },
            FieldRule::Negatable {
                when: Condition::any_of(&["x-ray", "xray"]),
                negations: strings(&["didn't do", "no x-ray"]),
                label: "X-ray examination".to_string(),
                negated_label: "No X-rays performed".to_string(),
            },
        ]
    }

    fn default_prognosis() -> Vec<FieldRule> {
        vec![
            FieldRule::Capture {
                when: Condition::any_of(&["full recovery"]),
                pattern: r"within\s+(\w+\s+\w+)".to_string(),
                template: "Full recovery expected within {}".to_string(),
                capitalize: false,
                fallback: "Full recovery expected".to_string(),
            },
            FieldRule::Label {
                when: Condition::any_of(&["no long-term", "no signs of long-term"]),
                label: "No long-term damage expected".to_string(),
            },
        ]
    }

    fn default_status() -> Vec<StatusRule> {
        vec![
            StatusRule {
                status: CurrentStatus::OccasionalBackache,
                when: Condition::all_of(&[&["occasional"], &["backache"]]),
            },
            StatusRule {
                status: CurrentStatus::Improving,
                when: Condition::any_of(&["doing better"]),
            },
            StatusRule {
                status: CurrentStatus::Recovered,
                when: Condition::any_of(&["recovered"]),
            },
        ]
    }

    /// Compile patterns; fails on the first invalid regex.
    pub(crate) fn compile(&self) -> ExtractResult<CompiledRules> {
        let name_pattern = if self.name_titles.is_empty() {
            None
        } else {
            let titles: Vec<String> = self.name_titles.iter().map(|t| regex::escape(t)).collect();
            let pattern = format!(r"\b({})\s+([A-Z][a-z]+)", titles.join("|"));
            Some(compile_pattern("name", &pattern)?)
        };

        let treatment = self
            .treatment
            .iter()
            .map(|rule| CompiledFieldRule::compile(rule, "treatment"))
            .collect::<ExtractResult<Vec<_>>>()?;
        let prognosis = self
            .prognosis
            .iter()
            .map(|rule| CompiledFieldRule::compile(rule, "prognosis"))
            .collect::<ExtractResult<Vec<_>>>()?;

        Ok(CompiledRules {
            name_pattern,
            symptoms: self.symptoms.clone(),
            diagnoses: self.diagnoses.clone(),
            treatment,
            prognosis,
            status: self.status.clone(),
            keyword_terms: lowercase_all(&self.keyword_terms),
            keyword_limit: self.keyword_limit,
            summary_terms: lowercase_all(&self.summary_terms),
            summary_limit: self.summary_limit,
        })
    }
}

/// Rules with patterns compiled, owned by the extractor.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRules {
    pub name_pattern: Option<Regex>,
    pub symptoms: Vec<LabelRule>,
    pub diagnoses: Vec<LabelRule>,
    pub treatment: Vec<CompiledFieldRule>,
    pub prognosis: Vec<CompiledFieldRule>,
    pub status: Vec<StatusRule>,
    pub keyword_terms: Vec<String>,
    pub keyword_limit: usize,
    pub summary_terms: Vec<String>,
    pub summary_limit: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledFieldRule {
    Label {
        when: Condition,
        label: String,
    },
    Capture {
        when: Condition,
        pattern: Regex,
        template: String,
        capitalize: bool,
        fallback: String,
    },
    Negatable {
        when: Condition,
        negations: Vec<String>,
        label: String,
        negated_label: String,
    },
}

impl CompiledFieldRule {
    fn compile(rule: &FieldRule, cascade: &str) -> ExtractResult<Self> {
        Ok(match rule {
            FieldRule::Label { when, label } => CompiledFieldRule::Label {
                when: when.clone(),
                label: label.clone(),
            },
            FieldRule::Capture {
                when,
                pattern,
                template,
                capitalize,
                fallback,
            } => CompiledFieldRule::Capture {
                when: when.clone(),
                pattern: compile_pattern(cascade, pattern)?,
                template: template.clone(),
                capitalize: *capitalize,
                fallback: fallback.clone(),
            },
            FieldRule::Negatable {
                when,
                negations,
                label,
                negated_label,
            } => CompiledFieldRule::Negatable {
                when: when.clone(),
                negations: lowercase_all(negations),
                label: label.clone(),
                negated_label: negated_label.clone(),
            },
        })
    }

    /// Apply to lower-cased text.
    pub fn apply(&self, lower: &str) -> Option<String> {
        match self {
            CompiledFieldRule::Label { when, label } => when.matches(lower).then(|| label.clone()),
            CompiledFieldRule::Capture {
                when,
                pattern,
                template,
                capitalize,
                fallback,
            } => {
                if !when.matches(lower) {
                    return None;
                }
                let captured = pattern
                    .captures(lower)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string());
                Some(match captured {
                    Some(value) => {
                        let value = if *capitalize { capitalize_first(&value) } else { value };
                        template.replace("{}", &value)
                    }
                    None => fallback.clone(),
                })
            }
            CompiledFieldRule::Negatable {
                when,
                negations,
                label,
                negated_label,
            } => {
                if !when.matches(lower) {
                    return None;
                }
                if negations.iter().any(|n| lower.contains(n.as_str())) {
                    Some(negated_label.clone())
                } else {
                    Some(label.clone())
                }
            }
        }
    }
}

fn compile_pattern(rule: &str, pattern: &str) -> ExtractResult<Regex> {
    Regex::new(pattern).map_err(|source| ExtractError::InvalidPattern {
        rule: rule.to_string(),
        source,
    })
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
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
    fn test_condition_matching() {
        let condition = Condition::all_of(&[&["neck"], &["pain", "hurt"]]);
        assert!(condition.matches("my neck hurts"));
        assert!(condition.matches("neck pain"));
        assert!(!condition.matches("my neck is fine"));
        assert!(!condition.matches("back pain"));

        assert!(!Condition(vec![]).matches("anything"));
    }

    #[test]
    fn test_sentence_scoped_rule() {
        let rule = LabelRule::within_sentence("Neck pain", Condition::all_of(&[&["neck"], &["hurt"]]));
        assert!(rule.matches("patient: my neck and back hurt a lot."));
        assert!(!rule.matches("patient: my neck is fine. i hurt my knee."));
        assert!(!rule.matches("patient: my neck is fine.\npatient: i hurt my knee"));

        let text_wide = LabelRule::new("Neck pain", Condition::all_of(&[&["neck"], &["hurt"]]));
        assert!(text_wide.matches("patient: my neck is fine. i hurt my knee."));
    }

    #[test]
    fn test_scope_defaults_to_text() {
        let rule: LabelRule =
            serde_json::from_str(r#"{"label": "Dizziness", "when": [["dizzy"]]}"#).unwrap();
        assert_eq!(rule.scope, MatchScope::Text);

        let rule: LabelRule = serde_json::from_str(
            r#"{"label": "Knee pain", "when": [["knee"], ["hurt"]], "scope": "sentence"}"#,
        )
        .unwrap();
        assert_eq!(rule.scope, MatchScope::Sentence);
    }

    #[test]
    fn test_condition_keywords_are_case_insensitive() {
        let condition = Condition::any_of(&["Whiplash"]);
        assert!(condition.matches("it was whiplash"));
    }

    #[test]
    fn test_capture_rule() {
        let rules = ExtractorRules::default().compile().unwrap();
        let physio = &rules.treatment[0];

        assert_eq!(
            physio.apply("i had ten sessions of physiotherapy"),
            Some("Ten physiotherapy sessions".to_string())
        );
        assert_eq!(
            physio.apply("a session of physiotherapy"),
            Some("A physiotherapy sessions".to_string())
        );
        assert_eq!(
            physio.apply("physiotherapy helped"),
            Some("Physiotherapy sessions".to_string())
        );
        assert_eq!(physio.apply("no therapy at all"), None);
    }

    #[test]
    fn test_negatable_rule() {
        let rules = ExtractorRules::default().compile().unwrap();
        let xray = &rules.treatment[2];

        assert_eq!(xray.apply("we took an x-ray"), Some("X-ray examination".to_string()));
        assert_eq!(
            xray.apply("they said no x-ray was needed"),
            Some("No X-rays performed".to_string())
        );
        // Negation is searched across the whole text
        assert_eq!(
            xray.apply("i didn't do the exercises. the xray was clear"),
            Some("No X-rays performed".to_string())
        );
        assert_eq!(xray.apply("nothing relevant"), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let mut rules = ExtractorRules::default();
        rules.prognosis.push(FieldRule::Capture {
            when: Condition::any_of(&["recovery"]),
            pattern: "(unclosed".to_string(),
            template: "{}".to_string(),
            capitalize: false,
            fallback: String::new(),
        });

        match rules.compile() {
            Err(ExtractError::InvalidPattern { rule, .. }) => assert_eq!(rule, "prognosis"),
            other => panic!("expected invalid pattern, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_name_pattern_escapes_titles() {
        let rules = ExtractorRules::default().compile().unwrap();
        let pattern = rules.name_pattern.unwrap();
        assert!(pattern.is_match("Good morning, Ms. Jones"));
        // "." must be literal
        assert!(!pattern.is_match("Msx Jones"));
    }

    #[test]
    fn test_rules_from_partial_json() {
        let rules: ExtractorRules = serde_json::from_str(
            r#"{"keyword_limit": 3, "treatment": [{"kind": "label", "when": [["ice"]], "label": "Ice packs"}]}"#,
        )
        .unwrap();

        assert_eq!(rules.keyword_limit, 3);
        assert_eq!(rules.treatment.len(), 1);
        assert_eq!(rules.symptoms, ExtractorRules::default().symptoms);
    }

    #[test]
    fn test_custom_rules() {
        let mut rules = ExtractorRules::default();
        rules.add_symptom("Dizziness", &[&["dizzy", "dizziness"]]);
        rules.add_diagnosis("concussion", "Concussion");
        rules.add_treatment("ice pack", "Ice packs");
        rules.add_name_title("Prof.");

        assert_eq!(rules.symptoms.last().unwrap().label, "Dizziness");
        assert_eq!(rules.diagnoses.len(), 2);
        let compiled = rules.compile().unwrap();
        assert!(compiled.name_pattern.unwrap().is_match("Prof. Smith"));
        assert_eq!(
            compiled.treatment.last().unwrap().apply("use an ice pack"),
            Some("Ice packs".to_string())
        );
    }
}
