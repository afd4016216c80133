//! Newshound Extraction Pipeline
//!
//! The Field Extractor and the Resolution Controller: applies selector
//! expressions to parsed news pages, normalizes date/time values, and
//! drives the adaptive selector-resolution state machine
//! (cached selectors → validation → targeted corrections → bounded
//! retries → direct-extraction fallback → commit).
//!
//! # Architecture
//!
//! - [`Page`] wraps the parsed document plus the cleaned HTML handed to
//!   the generation client.
//! - [`fields`] evaluates one selector expression (text or `sel@attr`
//!   attribute form) to a whitespace-normalized string; selector errors
//!   swallow to empty.
//! - [`datetime`] turns matched elements into the fixed date/time output
//!   formats, preferring machine-readable timestamp attributes.
//! - [`Resolver`] orchestrates one page resolution end to end against a
//!   `ProfileStore` and a `SelectorGenerator`.

#![warn(missing_docs)]

pub mod config;
pub mod datetime;
pub mod error;
pub mod fields;
pub mod page;
pub mod resolver;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use page::Page;
pub use resolver::{Resolution, Resolver};
