//! Newshound Domain Layer
//!
//! This crate contains the core domain model for newshound. It has zero
//! external dependencies and defines the fundamental concepts, value
//! objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Field**: one of the five article fields (author, title, date, time, content)
//! - **Selector History**: bounded, deduplicated, FIFO list of proven selectors per field
//! - **Source Profile**: everything learned about one news source
//! - **Article Record**: the final extracted values for one page
//! - **Validation Report**: per-field pass/fail verdict with reasons
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod field;
pub mod history;
pub mod profile;
pub mod source;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use article::ArticleRecord;
pub use field::{Field, FieldSet, ParseFieldError};
pub use history::{SelectorHistory, CANDIDATE_CAP};
pub use profile::SourceProfile;
pub use source::normalize_source;
pub use verdict::ValidationReport;
