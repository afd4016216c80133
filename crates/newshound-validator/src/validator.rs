//! Per-field and cross-field validation logic.

use crate::ValidationConfig;
use newshound_domain::traits::KeywordOracle;
use newshound_domain::{Field, FieldSet, ValidationReport};

/// Reason attached to content that passed its length check but does not
/// lexically relate to the title.
pub const MISMATCH_REASON: &str = "title/content mismatch";

/// Validates extracted field values against the configured rules.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    config: ValidationConfig,
}

impl FieldValidator {
    /// Create a validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a validator with the default configuration.
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Check one field's extracted text in isolation.
    ///
    /// Returns `None` on pass, or the failure reason. Each predicate is a
    /// plain function of the text; a field fails for at most one reason.
    pub fn check(&self, field: Field, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(format!("Empty {field} field"));
        }
        match field {
            Field::Author => {
                if trimmed.chars().count() > self.config.max_author_chars {
                    return Some(format!(
                        "Author longer than {} characters",
                        self.config.max_author_chars
                    ));
                }
            }
            Field::Title => {
                let len = trimmed.chars().count();
                if len < self.config.min_title_chars {
                    return Some(format!("Title too short (only {len} chars)"));
                }
            }
            Field::Content => {
                let len = trimmed.chars().count();
                if len < self.config.min_content_chars {
                    return Some(format!("Content too short (only {len} chars)"));
                }
            }
            Field::Date | Field::Time => {}
        }
        None
    }

    /// Validate all five fields plus the title/content relatedness guard.
    pub fn validate<K: KeywordOracle + ?Sized>(
        &self,
        values: &FieldSet<String>,
        oracle: &K,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (field, text) in values.iter() {
            if let Some(reason) = self.check(field, text) {
                report.fail(field, reason);
            }
        }

        // Consistency guard: a content block can be long enough and still
        // belong to a different article (related-story teaser, live blog
        // sidebar). Length failures keep their own reason.
        if self.config.check_title_content_overlap && !report.failed(Field::Content) {
            let ratio = oracle.overlap_ratio(&values.title, &values.content);
            if ratio < self.config.overlap_threshold {
                report.fail(Field::Content, MISMATCH_REASON);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oracle returning a fixed ratio, for exercising the threshold.
    struct FixedOracle(f64);

    impl KeywordOracle for FixedOracle {
        fn overlap_ratio(&self, _reference: &str, _other: &str) -> f64 {
            self.0
        }
    }

    fn values(author: &str, title: &str, date: &str, time: &str, content: &str) -> FieldSet<String> {
        FieldSet {
            author: author.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            content: content.to_string(),
        }
    }

    fn passing_values() -> FieldSet<String> {
        values(
            "Jane Doe",
            "A headline long enough",
            "November 06, 2025",
            "02:30 PM IST",
            &"word ".repeat(40),
        )
    }

    #[test]
    fn all_passing_values_produce_clean_report() {
        let validator = FieldValidator::default_config();
        let report = validator.validate(&passing_values(), &FixedOracle(100.0));
        assert!(report.passed());
    }

    #[test]
    fn blank_fields_fail_with_empty_reason() {
        let validator = FieldValidator::default_config();
        let report = validator.validate(&FieldSet::default(), &FixedOracle(100.0));
        assert_eq!(report.failure_count(), 5);
        assert_eq!(report.reason(Field::Date), Some("Empty date field"));
        assert_eq!(report.reason(Field::Time), Some("Empty time field"));
    }

    #[test]
    fn author_boundary_is_25_chars() {
        let validator = FieldValidator::default_config();
        assert!(validator.check(Field::Author, &"a".repeat(25)).is_none());
        assert!(validator.check(Field::Author, &"a".repeat(26)).is_some());
    }

    #[test]
    fn title_boundary_is_10_chars() {
        let validator = FieldValidator::default_config();
        assert!(validator.check(Field::Title, &"t".repeat(9)).is_some());
        assert!(validator.check(Field::Title, &"t".repeat(10)).is_none());
    }

    #[test]
    fn content_boundary_is_100_chars() {
        let validator = FieldValidator::default_config();
        assert!(validator.check(Field::Content, &"c".repeat(99)).is_some());
        assert!(validator.check(Field::Content, &"c".repeat(100)).is_none());
    }

    #[test]
    fn low_overlap_marks_content_mismatched() {
        let validator = FieldValidator::default_config();
        let report = validator.validate(&passing_values(), &FixedOracle(10.0));
        assert!(report.failed(Field::Content));
        assert_eq!(report.reason(Field::Content), Some(MISMATCH_REASON));
        // Only content fails; the title itself passed.
        assert_eq!(report.failed_fields(), vec![Field::Content]);
    }

    #[test]
    fn threshold_is_inclusive_at_50() {
        let validator = FieldValidator::default_config();
        let report = validator.validate(&passing_values(), &FixedOracle(50.0));
        assert!(!report.failed(Field::Content));
    }

    #[test]
    fn short_content_keeps_length_reason_over_mismatch() {
        let validator = FieldValidator::default_config();
        let mut vals = passing_values();
        vals.content = "too short".to_string();
        let report = validator.validate(&vals, &FixedOracle(0.0));
        assert_eq!(
            report.reason(Field::Content),
            Some("Content too short (only 9 chars)")
        );
    }

    #[test]
    fn lenient_config_skips_overlap_check() {
        let validator = FieldValidator::new(ValidationConfig::lenient());
        let report = validator.validate(&passing_values(), &FixedOracle(0.0));
        assert!(report.passed());
    }
}
