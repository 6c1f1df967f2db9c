use crate::global;
use crate::summarization::providers::analyze_meeting;
use crate::transcription::providers::assembly_api;
use crate::transcription::providers::TranscriptionFeatures;
use crate::transcription::PollPolicy;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const API_KEY_ENV: &str = "ASSEMBLYAI_API_KEY";
pub const ANALYZER_URL_ENV: &str = "MEETING_NOTES_ANALYZER_URL";
pub const PORT_ENV: &str = "MEETING_NOTES_PORT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub summarization: SummarizationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub speech_model: String,
    pub poll_interval_secs: u64,
    /// 0 disables the elapsed-time bound.
    pub poll_timeout_secs: u64,
    pub max_poll_attempts: Option<u32>,
    pub iab_categories: bool,
    pub auto_highlights: bool,
    pub entity_detection: bool,
    pub speaker_labels: bool,
    pub language_detection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        let features = TranscriptionFeatures::default();
        Self {
            api_key: None,
            base_url: assembly_api::DEFAULT_BASE_URL.to_string(),
            speech_model: features.speech_model,
            poll_interval_secs: 5,
            poll_timeout_secs: 3600,
            max_poll_attempts: None,
            iab_categories: features.iab_categories,
            auto_highlights: features.auto_highlights,
            entity_detection: features.entity_detection,
            speaker_labels: features.speaker_labels,
            language_detection: features.language_detection,
        }
    }
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            endpoint: analyze_meeting::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl TranscriptionConfig {
    pub fn features(&self) -> TranscriptionFeatures {
        TranscriptionFeatures {
            speech_model: self.speech_model.clone(),
            iab_categories: self.iab_categories,
            auto_highlights: self.auto_highlights,
            entity_detection: self.entity_detection,
            speaker_labels: self.speaker_labels,
            language_detection: self.language_detection,
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            max_attempts: self.max_poll_attempts,
            max_elapsed: (self.poll_timeout_secs > 0)
                .then(|| Duration::from_secs(self.poll_timeout_secs)),
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = global::config_file()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::from_toml_str(&content)?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Override file values from the environment. `lookup` is injectable for tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.transcription.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(ANALYZER_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.summarization.endpoint = url.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV) {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {}: {:?}", PORT_ENV, port),
            }
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.transcription
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No transcription API key configured. Set {} or transcription.api_key in {}",
                    API_KEY_ENV,
                    global::config_file()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "config.toml".to_string())
                )
            })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
