//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Media storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// AI assistant configuration.
    #[serde(default)]
    pub ai: AiConfig,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Default page size for feed queries.
    #[serde(default = "default_feed_page_size")]
    pub feed_page_size: usize,
    /// Default page size for Q&A listings.
    #[serde(default = "default_question_page_size")]
    pub question_page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            feed_page_size: default_feed_page_size(),
            question_page_size: default_question_page_size(),
        }
    }
}

/// Media storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base path for stored media files.
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Base URL for serving media files.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

/// AI assistant configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Whether AI answers are enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Gemini API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default = "default_ai_model")]
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_ai_model(),
        }
    }
}

const fn default_feed_page_size() -> usize {
    5
}

const fn default_question_page_size() -> usize {
    10
}

fn default_storage_path() -> String {
    "./files".to_string()
}

fn default_storage_url() -> String {
    "/files".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `PETBOOK_ENV`)
    /// 3. Environment variables with `PETBOOK_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("PETBOOK_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PETBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("PETBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
