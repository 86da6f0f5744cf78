mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use config::NotetakerConfig;
use notetaker_core::{ClinicalExtractor, ExtractError, Pipeline, Transcript, UtteranceClassifier};
use notetaker_nlp::{LexiconAffectClassifier, LexiconRecognizer, ModelResult};

/// Turn a doctor-patient transcript into a clinical summary, sentiment analysis and SOAP note
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transcript file with one "Role: utterance" per line
    #[arg(required_unless_present = "init_config")]
    transcript: Option<PathBuf>,

    /// Where to write the JSON report (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: ~/.notetaker/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disease/chemical lexicon JSON (overrides config)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Affect word-list JSON (overrides config)
    #[arg(long)]
    affect_lexicon: Option<PathBuf>,

    /// Write the effective config (defaults if none exists) and exit
    #[arg(long)]
    init_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the report
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => NotetakerConfig::default_config_path()?,
    };
    let config = NotetakerConfig::load(&config_path)?;
    debug!("Config: {:?}", config_path);

    if args.init_config {
        return init_config(&config, &config_path);
    }
    let transcript_path = args.transcript.context("No transcript given")?;

    let lexicon_path = args.lexicon.clone().or_else(|| config.lexicon_path.clone());
    let affect_path = args
        .affect_lexicon
        .clone()
        .or_else(|| config.affect_lexicon_path.clone());
    let output_path = args.output.clone().unwrap_or_else(|| config.output_path.clone());

    info!("Loading transcript {:?}", transcript_path);
    let raw = std::fs::read_to_string(&transcript_path)
        .with_context(|| format!("Failed to read transcript {}", transcript_path.display()))?;
    let transcript = Transcript::parse(raw);
    if transcript.is_empty() {
        warn!("Transcript has no turns; the report will hold defaults only");
    }
    info!(
        "Loaded transcript ({} characters, {} turns)",
        transcript.raw().len(),
        transcript.turns().len()
    );

    info!("Initializing clinical extractor...");
    let extractor = match build_extractor(lexicon_path.as_deref(), &config) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("Clinical extractor unavailable: {}", e);
            print_lexicon_help(lexicon_path.as_deref());
            return Err(e).context("Clinical extractor unavailable");
        }
    };

    let classifier = load_affect(affect_path.as_deref())
        .and_then(|affect| UtteranceClassifier::new(affect, config.classifier.clone()));

    let pipeline = Pipeline::new(extractor, classifier);
    let report = pipeline.run(&transcript)?;
    info!(
        "Analyzed {} patient statements",
        report.sentiment_analysis.len()
    );

    std::fs::write(&output_path, report.render()?)
        .with_context(|| format!("Failed to write report {}", output_path.display()))?;
    info!("Report written to {:?}", output_path);

    print!("{}", report::render(&report, &output_path)?);
    Ok(())
}

fn init_config(config: &NotetakerConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }
    config.save(path)?;
    info!("Config written to {:?}", path);
    println!("{}", path.display());
    Ok(())
}

fn build_extractor(
    lexicon_path: Option<&Path>,
    config: &NotetakerConfig,
) -> Result<ClinicalExtractor<LexiconRecognizer>> {
    let recognizer = match lexicon_path {
        Some(path) => LexiconRecognizer::from_path(path).map_err(ExtractError::RecognizerUnavailable)?,
        None => LexiconRecognizer::default(),
    };
    debug!("Lexicon terms: {}", recognizer.term_count());
    Ok(ClinicalExtractor::new(recognizer, config.extractor.clone())?)
}

fn load_affect(path: Option<&Path>) -> ModelResult<LexiconAffectClassifier> {
    match path {
        Some(path) => LexiconAffectClassifier::from_path(path),
        None => Ok(LexiconAffectClassifier::default()),
    }
}

fn print_lexicon_help(lexicon_path: Option<&Path>) {
    if let Some(path) = lexicon_path {
        eprintln!("\nEntity lexicon could not be loaded: {:?}", path);
    }
    eprintln!("\nThe lexicon must be a JSON file of the form:");
    eprintln!("  {{\"diseases\": [\"whiplash\", ...], \"chemicals\": [\"ibuprofen\", ...]}}");
    eprintln!("\nFix the file, point to another with: --lexicon /path/to/lexicon.json");
    eprintln!("Or omit --lexicon (and lexicon_path in the config) to use the built-in lexicon.");
}
