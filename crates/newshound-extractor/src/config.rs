//! Resolution controller configuration.

use serde::{Deserialize, Serialize};

/// Tunables for one resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Correction rounds allowed after the first validation failure.
    pub max_retries: u32,

    /// Whether exhausted retries fall back to asking the generation
    /// client for the field values themselves.
    pub direct_fallback: bool,

    /// Upper bound, in characters, on the cleaned HTML included in a
    /// generation prompt.
    pub max_html_chars: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            direct_fallback: true,
            max_html_chars: 150_000,
        }
    }
}

impl ResolverConfig {
    /// Preset that never falls back to direct extraction, for deployments
    /// where generation-call volume matters more than recall.
    pub fn frugal() -> Self {
        Self {
            direct_fallback: false,
            ..Self::default()
        }
    }

    /// Check the configuration for nonsensical values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries > 20 {
            return Err(format!(
                "max_retries {} is unreasonably high (limit 20)",
                self.max_retries
            ));
        }
        if self.max_html_chars < 1_000 {
            return Err(format!(
                "max_html_chars {} leaves no room for page markup (minimum 1000)",
                self.max_html_chars
            ));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(text).map_err(|e| format!("invalid TOML: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to TOML text.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_retries, 3);
        assert!(config.direct_fallback);
    }

    #[test]
    fn frugal_disables_direct_fallback() {
        assert!(!ResolverConfig::frugal().direct_fallback);
    }

    #[test]
    fn absurd_values_are_rejected() {
        let mut config = ResolverConfig::default();
        config.max_retries = 100;
        assert!(config.validate().is_err());

        let mut config = ResolverConfig::default();
        config.max_html_chars = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = ResolverConfig::frugal();
        let text = config.to_toml().unwrap();
        let parsed = ResolverConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.max_retries, config.max_retries);
        assert_eq!(parsed.direct_fallback, config.direct_fallback);
        assert_eq!(parsed.max_html_chars, config.max_html_chars);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let parsed = ResolverConfig::from_toml("max_retries = 1\n").unwrap();
        assert_eq!(parsed.max_retries, 1);
        assert!(parsed.direct_fallback);
    }
}
