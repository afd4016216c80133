//! Validator configuration

use serde::{Deserialize, Serialize};

/// Configuration for the per-field and cross-field checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum author length in characters (longer fails)
    pub max_author_chars: usize,

    /// Minimum title length in characters (shorter fails)
    pub min_title_chars: usize,

    /// Minimum content length in characters (shorter fails)
    pub min_content_chars: usize,

    /// Enable the title/content keyword-overlap check
    pub check_title_content_overlap: bool,

    /// Overlap percentage below which content is considered unrelated to
    /// the title (0-100)
    pub overlap_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_author_chars: 25,
            min_title_chars: 10,
            min_content_chars: 100,
            check_title_content_overlap: true,
            overlap_threshold: 50.0,
        }
    }
}

impl ValidationConfig {
    /// A lenient configuration: length checks only, no relatedness guard.
    pub fn lenient() -> Self {
        Self {
            check_title_content_overlap: false,
            ..Self::default()
        }
    }

    /// Sanity-check the thresholds.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_author_chars == 0 {
            return Err("max_author_chars must be greater than 0".to_string());
        }
        if self.min_content_chars < self.min_title_chars {
            return Err("min_content_chars must not be below min_title_chars".to_string());
        }
        if !(0.0..=100.0).contains(&self.overlap_threshold) {
            return Err("overlap_threshold must be within 0-100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ValidationConfig::default().validate().is_ok());
    }

    #[test]
    fn lenient_disables_overlap_check() {
        let config = ValidationConfig::lenient();
        assert!(!config.check_title_content_overlap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config = ValidationConfig {
            overlap_threshold: 150.0,
            ..ValidationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
