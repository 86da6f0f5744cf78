//! Clinical field extraction.
//!
//! Pipeline: Entity recognition → Rule cascades → Keyword ranking → Extractive summary

mod keywords;
mod rules;

pub use keywords::*;
pub use rules::*;

use std::collections::BTreeSet;

use notetaker_nlp::{Entity, EntityRecognizer, ModelError};
use thiserror::Error;
use tracing::debug;

use crate::models::{ClinicalSummary, CurrentStatus, Diagnosis, Transcript, UNKNOWN_PATIENT};

use rules::CompiledRules;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Entity recognizer unavailable: {0}")]
    RecognizerUnavailable(#[source] ModelError),

    #[error("Entity recognition failed: {0}")]
    Recognition(#[from] ModelError),

    #[error("Invalid pattern in {rule} rules: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Derives a [`ClinicalSummary`] from a transcript.
pub struct ClinicalExtractor<R> {
    recognizer: R,
    rules: CompiledRules,
}

impl<R: EntityRecognizer> ClinicalExtractor<R> {
    /// Create an extractor.
    ///
    /// Fails if the recognizer is not ready or a rule pattern does not compile,
    /// so that an unusable extractor is never handed out.
    pub fn new(recognizer: R, rules: ExtractorRules) -> ExtractResult<Self> {
        recognizer
            .ensure_ready()
            .map_err(ExtractError::RecognizerUnavailable)?;
        let rules = rules.compile()?;
        Ok(Self { recognizer, rules })
    }

    /// Create an extractor with the built-in rule tables.
    pub fn with_default_rules(recognizer: R) -> ExtractResult<Self> {
        Self::new(recognizer, ExtractorRules::default())
    }

    /// Extract all clinical fields.
    pub fn extract(&self, transcript: &Transcript) -> ExtractResult<ClinicalSummary> {
        let text = transcript.raw();
        let lower = text.to_lowercase();

        let entities = self.recognizer.recognize(text)?;
        let detected_diseases: BTreeSet<String> = entities
            .iter()
            .filter(|e| e.is_disease())
            .map(|e| e.text.clone())
            .collect();
        let detected_chemicals: BTreeSet<String> = entities
            .iter()
            .filter(|e| e.is_chemical())
            .map(|e| e.text.clone())
            .collect();

        let summary = ClinicalSummary {
            patient_name: self.extract_patient_name(text),
            symptoms: self.extract_symptoms(&lower),
            diagnosis: self.extract_diagnosis(&lower, &entities),
            treatment: self.extract_treatment(&lower),
            current_status: self.extract_current_status(&lower),
            prognosis: self.extract_prognosis(&lower),
            detected_diseases,
            detected_chemicals,
            keywords: self.extract_keywords(&entities, text),
            summary: self.summarize(transcript),
        };

        debug!(
            entities = entities.len(),
            symptoms = summary.symptoms.len(),
            treatment = summary.treatment.len(),
            prognosis = summary.prognosis.len(),
            keywords = summary.keywords.len(),
            status = %summary.current_status,
            "extracted clinical summary"
        );

        Ok(summary)
    }

    /// First titled name ("Ms. Jones"), or "Unknown".
    pub fn extract_patient_name(&self, text: &str) -> String {
        self.rules
            .name_pattern
            .as_ref()
            .and_then(|pattern| pattern.captures(text))
            .map(|caps| format!("{} {}", &caps[1], &caps[2]))
            .unwrap_or_else(|| UNKNOWN_PATIENT.to_string())
    }

    /// Every symptom rule that matches, deduplicated.
    pub fn extract_symptoms(&self, lower: &str) -> BTreeSet<String> {
        self.rules
            .symptoms
            .iter()
            .filter(|rule| rule.matches(lower))
            .map(|rule| rule.label.clone())
            .collect()
    }

    /// Keyword diagnoses unioned with recognized diseases, or "Under
    /// investigation". Findings are distinct by exact spelling only.
    pub fn extract_diagnosis(&self, lower: &str, entities: &[Entity]) -> Diagnosis {
        let labels = self
            .rules
            .diagnoses
            .iter()
            .filter(|rule| rule.matches(lower))
            .map(|rule| rule.label.clone());
        let diseases = entities
            .iter()
            .filter(|e| e.is_disease())
            .map(|e| e.text.clone());
        Diagnosis::from_findings(labels.chain(diseases))
    }

    /// Treatment items in cascade order.
    pub fn extract_treatment(&self, lower: &str) -> Vec<String> {
        self.rules
            .treatment
            .iter()
            .filter_map(|rule| rule.apply(lower))
            .collect()
    }

    /// Prognosis items in cascade order.
    pub fn extract_prognosis(&self, lower: &str) -> Vec<String> {
        self.rules
            .prognosis
            .iter()
            .filter_map(|rule| rule.apply(lower))
            .collect()
    }

    /// First matching status rule, or Stable.
    pub fn extract_current_status(&self, lower: &str) -> CurrentStatus {
        self.rules
            .status
            .iter()
            .find(|rule| rule.when.matches(lower))
            .map(|rule| rule.status)
            .unwrap_or_default()
    }

    /// Ranked keywords from entity spans and relevant noun chunks.
    pub fn extract_keywords(&self, entities: &[Entity], text: &str) -> Vec<String> {
        rank_keywords(
            entities,
            text,
            &self.rules.keyword_terms,
            self.rules.keyword_limit,
        )
    }

    /// Extractive summary of Patient and Physician turns.
    pub fn summarize(&self, transcript: &Transcript) -> String {
        extractive_summary(
            transcript,
            &self.rules.summary_terms,
            self.rules.summary_limit,
        )
    }

    /// Get the recognizer for direct access.
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetaker_nlp::{EntityLabel, LexiconRecognizer, ModelResult};

    /// Recognizer that reports nothing.
    struct SilentRecognizer;

    impl EntityRecognizer for SilentRecognizer {
        fn recognize(&self, _text: &str) -> ModelResult<Vec<Entity>> {
            Ok(vec![])
        }
    }

    /// Recognizer whose model never loaded.
    struct OfflineRecognizer;

    impl EntityRecognizer for OfflineRecognizer {
        fn recognize(&self, _text: &str) -> ModelResult<Vec<Entity>> {
            Err(ModelError::Inference("not loaded".into()))
        }

        fn ensure_ready(&self) -> ModelResult<()> {
            Err(ModelError::Unavailable("model file missing".into()))
        }
    }

    fn extractor() -> ClinicalExtractor<SilentRecognizer> {
        ClinicalExtractor::with_default_rules(SilentRecognizer).unwrap()
    }

    #[test]
    fn test_patient_name() {
        let extractor = extractor();
        assert_eq!(
            extractor.extract_patient_name("Physician: Good morning, Ms. Jones. Dr. Smith is here."),
            "Ms. Jones"
        );
        assert_eq!(extractor.extract_patient_name("Mrs. Patel said hi"), "Mrs. Patel");
        assert_eq!(extractor.extract_patient_name("Ms. jones"), "Unknown");
        assert_eq!(extractor.extract_patient_name("no names here"), "Unknown");
    }

    #[test]
    fn test_symptoms_fire_independently() {
        let extractor = extractor();
        let symptoms = extractor.extract_symptoms(
            "my neck and back hurt. i hit my head on the wheel. some stiffness and trouble sleeping. occasional backache.",
        );

        let expected: BTreeSet<String> = [
            "Neck pain",
            "Back pain",
            "Head impact",
            "Stiffness",
            "Trouble sleeping",
            "Occasional backache",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(symptoms, expected);
    }

    #[test]
    fn test_hurt_pairs_within_one_sentence() {
        let extractor = extractor();
        assert!(extractor
            .extract_symptoms("patient: my neck is fine. i hurt my knee.")
            .is_empty());

        let symptoms = extractor.extract_symptoms("patient: my neck and back hurt a lot.");
        assert!(symptoms.contains("Neck pain"));
        assert!(symptoms.contains("Back pain"));
    }

    #[test]
    fn test_diagnosis_union() {
        let extractor = extractor();
        let entities = vec![
            Entity {
                text: "concussion".into(),
                label: EntityLabel::Disease,
                start: 0,
                end: 10,
            },
            Entity {
                text: "whiplash injury".into(),
                label: EntityLabel::Disease,
                start: 0,
                end: 15,
            },
            Entity {
                text: "ibuprofen".into(),
                label: EntityLabel::Chemical,
                start: 0,
                end: 9,
            },
        ];

        let diagnosis = extractor.extract_diagnosis("a whiplash injury and a concussion", &entities);
        assert_eq!(
            diagnosis.join(", "),
            "Whiplash injury, concussion, whiplash injury"
        );
    }

    /// Recognizer that reports one disease in two spellings.
    struct CasedRecognizer;

    impl EntityRecognizer for CasedRecognizer {
        fn recognize(&self, _text: &str) -> ModelResult<Vec<Entity>> {
            Ok(["Back pain", "back pain"]
                .iter()
                .map(|text| Entity {
                    text: text.to_string(),
                    label: EntityLabel::Disease,
                    start: 0,
                    end: text.len(),
                })
                .collect())
        }
    }

    #[test]
    fn test_spellings_are_distinct_findings() {
        let extractor = ClinicalExtractor::with_default_rules(CasedRecognizer).unwrap();
        let transcript = Transcript::parse("Patient: Back pain, back pain.");

        let summary = extractor.extract(&transcript).unwrap();
        assert_eq!(summary.diagnosis.join(", "), "Back pain, back pain");
        assert_eq!(summary.detected_diseases.len(), 2);
        assert_eq!(summary.keywords, vec!["Back pain", "back pain"]);
    }

    #[test]
    fn test_diagnosis_default() {
        let extractor = extractor();
        let diagnosis = extractor.extract_diagnosis("just a checkup", &[]);
        assert!(diagnosis.is_under_investigation());
    }

    #[test]
    fn test_treatment_order() {
        let extractor = extractor();
        let treatment = extractor.extract_treatment(
            "we didn't do an x-ray. i took painkillers and had ten sessions of physiotherapy.",
        );
        assert_eq!(
            treatment,
            vec![
                "Ten physiotherapy sessions",
                "Painkillers",
                "No X-rays performed"
            ]
        );
    }

    #[test]
    fn test_prognosis() {
        let extractor = extractor();
        assert_eq!(
            extractor.extract_prognosis("expect a full recovery within six months. no signs of long-term damage."),
            vec![
                "Full recovery expected within six months",
                "No long-term damage expected"
            ]
        );
        assert_eq!(
            extractor.extract_prognosis("a full recovery is likely"),
            vec!["Full recovery expected"]
        );
        assert!(extractor.extract_prognosis("see you soon").is_empty());
    }

    #[test]
    fn test_status_priority() {
        let extractor = extractor();
        assert_eq!(
            extractor.extract_current_status("doing better, just an occasional backache. recovered mostly"),
            CurrentStatus::OccasionalBackache
        );
        assert_eq!(
            extractor.extract_current_status("i'm doing better and have recovered"),
            CurrentStatus::Improving
        );
        assert_eq!(
            extractor.extract_current_status("i have recovered"),
            CurrentStatus::Recovered
        );
        assert_eq!(
            extractor.extract_current_status("no change"),
            CurrentStatus::Stable
        );
    }

    #[test]
    fn test_unavailable_recognizer_fails_at_construction() {
        let result = ClinicalExtractor::with_default_rules(OfflineRecognizer);
        assert!(matches!(
            result,
            Err(ExtractError::RecognizerUnavailable(ModelError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_extract_with_lexicon_recognizer() {
        let extractor = ClinicalExtractor::with_default_rules(LexiconRecognizer::default()).unwrap();
        let transcript = Transcript::parse(
            "Physician: Good morning, Ms. Jones.\n\
             Patient: I had a car accident and got whiplash. I took ibuprofen for the neck pain.",
        );

        let summary = extractor.extract(&transcript).unwrap();
        assert_eq!(summary.patient_name, "Ms. Jones");
        assert!(summary.diagnosis.contains("Whiplash injury"));
        assert!(summary.diagnosis.contains("whiplash"));
        assert!(summary.detected_diseases.contains("whiplash"));
        assert!(summary.detected_diseases.contains("neck pain"));
        assert!(summary.detected_chemicals.contains("ibuprofen"));
        // "neck pain" is both an entity and a relevant noun chunk
        assert_eq!(
            summary.keywords,
            vec!["neck pain", "whiplash", "ibuprofen", "car accident"]
        );
        assert!(summary.summary.starts_with("I had a car accident"));
    }
}
