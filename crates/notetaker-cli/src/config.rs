use anyhow::{Context, Result};
use notetaker_core::{ClassifierRules, ExtractorRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotetakerConfig {
    pub schema_version: u32,

    // Rule tables
    pub extractor: ExtractorRules,
    pub classifier: ClassifierRules,

    // Collaborator data; built-in lexicons when unset
    pub lexicon_path: Option<PathBuf>,
    pub affect_lexicon_path: Option<PathBuf>,

    /// Where the JSON report is written
    pub output_path: PathBuf,
}

impl Default for NotetakerConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            extractor: ExtractorRules::default(),
            classifier: ClassifierRules::default(),
            lexicon_path: None,
            affect_lexicon_path: None,
            output_path: PathBuf::from("output_results.json"),
        }
    }
}

impl NotetakerConfig {
    /// Load config from file, or use defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".notetaker"))
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.json"))
    }
}
