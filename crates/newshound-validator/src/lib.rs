//! Newshound Field Validator
//!
//! Structural sanity checks for extracted article fields plus the
//! cross-field title/content relatedness guard.
//!
//! The validator provides:
//! - Per-field predicates (blank, length bounds) with one reason per failure
//! - The title/content keyword-overlap consistency check
//! - The default `KeywordOracle` implementation (stopword-filtered word sets)
//!
//! # Examples
//!
//! ```
//! use newshound_validator::{FieldValidator, KeywordOverlap, ValidationConfig};
//! use newshound_domain::{Field, FieldSet};
//!
//! let validator = FieldValidator::new(ValidationConfig::default());
//! let oracle = KeywordOverlap::new();
//!
//! let values: FieldSet<String> = FieldSet::default();
//! let report = validator.validate(&values, &oracle);
//! assert!(report.failed(Field::Title));
//! ```

#![warn(missing_docs)]

mod config;
mod keywords;
mod validator;

pub use config::ValidationConfig;
pub use keywords::KeywordOverlap;
pub use validator::{FieldValidator, MISMATCH_REASON};
