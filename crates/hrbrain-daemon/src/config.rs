//! Configuration loading for the HRBrain daemon

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;

/// Configuration for the daemon
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub daemon: DaemonConfig,
    pub data: DataConfig,
    pub learning: LearningConfig,
    pub summarizer: SummarizerConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub bind_address: String,
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9300".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV of candidate_id,skills rows
    pub cvs_path: String,
    /// CSV of jd_id,description rows
    pub jds_path: String,
    /// Append-only feedback audit CSV
    pub feedback_log_path: String,
    /// JSON snapshot of the agent (table + tracker + history); empty
    /// disables persistence
    pub snapshot_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cvs_path: "data/cvs.csv".to_string(),
            jds_path: "data/jds.csv".to_string(),
            feedback_log_path: "data/feedback_log.csv".to_string(),
            snapshot_path: "data/agent_snapshot.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Learning rate for online updates
    pub alpha: f64,
    /// Discount factor for online updates
    pub gamma: f64,
    /// Exploration rate
    pub epsilon: f64,
    /// Run the episodic trainer at startup before serving
    pub pretrain: bool,
    pub pretrain_episodes: usize,
    /// Discount factor used only by the batch pre-trainer
    pub pretrain_gamma: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.6,
            epsilon: 0.1,
            pretrain: false,
            pretrain_episodes: 1000,
            pretrain_gamma: 0.9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub enabled: bool,
    /// LLM summarization endpoint; the daemon POSTs a prompt and expects
    /// {"summary": "..."} back
    pub endpoint: String,
    /// Environment variable holding the API key, read at request time
    pub api_key_env: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key_env: "HRBRAIN_SUMMARIZER_API_KEY".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub enabled: bool,
    /// Downstream automation endpoint (e.g. an n8n workflow)
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file();

        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        // Add config file if it exists
        if let Some(path) = &config_path {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.clone()).required(false));
        } else {
            tracing::info!("No config file found, using defaults");
        }

        // Add environment variables with HRBRAIN_ prefix
        builder = builder.add_source(
            Environment::with_prefix("HRBRAIN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Find the configuration file
    fn find_config_file() -> Option<PathBuf> {
        // Check in order: HRBRAIN_CONFIG env, ./hrbrain.toml,
        // ~/.config/hrbrain/hrbrain.toml
        if let Ok(path) = std::env::var("HRBRAIN_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("hrbrain.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("hrbrain").join("hrbrain.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }
}
