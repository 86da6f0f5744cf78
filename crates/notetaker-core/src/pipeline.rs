//! End-to-end transcript processing.

use notetaker_nlp::{AffectClassifier, EntityRecognizer, ModelError};
use tracing::{info, warn};

use crate::classifier::UtteranceClassifier;
use crate::extractor::ClinicalExtractor;
use crate::models::{NotetakerReport, Transcript, UtteranceAnalysis};
use crate::soap::NoteSynthesizer;
use crate::NotetakerError;

/// Runs extraction, classification and synthesis over one transcript.
///
/// The extractor is mandatory. The classifier is optional: if it could not
/// be built, or fails while classifying, the sentiment analysis is left
/// empty and the rest of the report is still produced.
pub struct Pipeline<R, A> {
    extractor: ClinicalExtractor<R>,
    classifier: Option<UtteranceClassifier<A>>,
    synthesizer: NoteSynthesizer,
}

impl<R: EntityRecognizer, A: AffectClassifier> Pipeline<R, A> {
    /// Build a pipeline from a ready extractor and the outcome of building
    /// the classifier.
    pub fn new(
        extractor: ClinicalExtractor<R>,
        classifier: Result<UtteranceClassifier<A>, ModelError>,
    ) -> Self {
        let classifier = match classifier {
            Ok(classifier) => Some(classifier),
            Err(e) => {
                warn!(error = %e, "affect classifier unavailable, sentiment analysis disabled");
                None
            }
        };

        Self {
            extractor,
            classifier,
            synthesizer: NoteSynthesizer::new(),
        }
    }

    /// Whether sentiment analysis will run.
    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Process a transcript into the full report.
    pub fn run(&self, transcript: &Transcript) -> Result<NotetakerReport, NotetakerError> {
        info!(turns = transcript.turns().len(), "extracting clinical summary");
        let summary = self.extractor.extract(transcript)?;

        info!("classifying patient statements");
        let sentiment_analysis = self.analyze(transcript);

        info!("synthesizing SOAP note");
        let soap_note = self.synthesizer.synthesize(transcript, &summary);

        Ok(NotetakerReport {
            summary,
            sentiment_analysis,
            soap_note,
        })
    }

    fn analyze(&self, transcript: &Transcript) -> Vec<UtteranceAnalysis> {
        let Some(classifier) = &self.classifier else {
            return Vec::new();
        };

        classifier.analyze(transcript).unwrap_or_else(|e| {
            warn!(error = %e, "sentiment analysis failed, continuing without it");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetaker_nlp::{AffectScore, LexiconAffectClassifier, LexiconRecognizer, ModelResult};

    struct BrokenAffect;

    impl AffectClassifier for BrokenAffect {
        fn classify(&self, _text: &str) -> ModelResult<AffectScore> {
            Err(ModelError::Inference("backend crashed".into()))
        }
    }

    fn extractor() -> ClinicalExtractor<LexiconRecognizer> {
        ClinicalExtractor::with_default_rules(LexiconRecognizer::default()).unwrap()
    }

    const TRANSCRIPT: &str = "Physician: Good morning, Ms. Jones.\n\
                              Patient: Good morning. I went to the shops.\n\
                              Patient: My neck hurt after the accident.";

    #[test]
    fn test_run_with_classifier() {
        let pipeline = Pipeline::new(
            extractor(),
            UtteranceClassifier::with_default_rules(LexiconAffectClassifier::default()),
        );
        assert!(pipeline.has_classifier());

        let report = pipeline.run(&Transcript::parse(TRANSCRIPT)).unwrap();
        assert_eq!(report.summary.patient_name, "Ms. Jones");
        assert_eq!(report.sentiment_analysis.len(), 2);
        assert_eq!(
            report.soap_note.subjective.history_of_present_illness,
            "Good morning. I went to the shops. My neck hurt after the accident."
        );
    }

    #[test]
    fn test_missing_classifier_degrades() {
        let pipeline: Pipeline<_, LexiconAffectClassifier> = Pipeline::new(
            extractor(),
            Err(ModelError::Unavailable("no affect model".into())),
        );
        assert!(!pipeline.has_classifier());

        let report = pipeline.run(&Transcript::parse(TRANSCRIPT)).unwrap();
        assert!(report.sentiment_analysis.is_empty());
        assert!(report.summary.symptoms.contains("Neck pain"));
    }

    #[test]
    fn test_classifier_failure_degrades() {
        let pipeline = Pipeline::new(
            extractor(),
            UtteranceClassifier::with_default_rules(BrokenAffect),
        );

        // "I went to the shops" has no trigger word, so the broken model is consulted
        let report = pipeline.run(&Transcript::parse(TRANSCRIPT)).unwrap();
        assert!(report.sentiment_analysis.is_empty());
        assert_eq!(report.summary.patient_name, "Ms. Jones");
    }
}
