//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use newshound_extractor::ResolverConfig;
use newshound_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use newshound_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration, persisted at `~/.newshound/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database path; defaults to `~/.newshound/newshound.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Generation client settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Resolution tunables
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Field validation thresholds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Generation client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API endpoint base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; the OPENAI_API_KEY environment variable takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Config {
    /// Directory holding the configuration and the default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".newshound"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            config.resolver.validate().map_err(CliError::Config)?;
            config.validation.validate().map_err(CliError::Config)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Resolve the database path: explicit setting or the default
    /// location next to the config file.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::dir()?.join("newshound.db")),
        }
    }

    /// Resolve the API key: an explicit override wins, then the config
    /// file.
    pub fn api_key(&self, override_key: Option<&str>) -> Result<String> {
        override_key
            .map(str::to_string)
            .or_else(|| self.llm.api_key.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "No API key configured. Set llm.api_key in the config file or the \
                     OPENAI_API_KEY environment variable."
                        .into(),
                )
            })
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { color: true }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}
