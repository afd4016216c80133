//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates: the SQLite store
//! in `newshound-store`, the LLM-backed selector generator in
//! `newshound-llm`, the keyword oracle in `newshound-validator`.

use crate::article::ArticleRecord;
use crate::field::{Field, FieldSet};
use crate::profile::SourceProfile;
use std::collections::BTreeMap;

/// Persistence boundary for source profiles, article records, and the
/// process-wide generation-call counter.
pub trait ProfileStore {
    /// Error type for store operations
    type Error;

    /// Fetch the profile for a source, if the source has been seen.
    fn lookup(&self, source: &str) -> Result<Option<SourceProfile>, Self::Error>;

    /// Insert a brand-new profile seeded with the initial expressions and
    /// `total_failures = 0`.
    fn create(&mut self, source: &str, initial: &FieldSet<String>) -> Result<(), Self::Error>;

    /// Append each validated expression to its field's history under the
    /// cap/eviction rule, add `retries_spent` to the failure counter, and
    /// refresh the last-updated timestamp.
    ///
    /// Fields absent from `validated` keep their history unchanged.
    fn record_validated(
        &mut self,
        source: &str,
        validated: &BTreeMap<Field, String>,
        retries_spent: u32,
    ) -> Result<(), Self::Error>;

    /// Insert or fully replace the article record for (source, url).
    fn upsert_article(&mut self, record: &ArticleRecord) -> Result<(), Self::Error>;

    /// Fetch the stored article record for (source, url), if any.
    fn get_article(&self, source: &str, url: &str) -> Result<Option<ArticleRecord>, Self::Error>;

    /// Current value of the persisted generation-call counter.
    fn generation_calls(&self) -> Result<u64, Self::Error>;

    /// Increment the persisted generation-call counter by one and return
    /// the new value. Never reset by the core pipeline.
    fn count_generation_call(&mut self) -> Result<u64, Self::Error>;
}

/// External oracle that proposes, corrects, or bypasses selector
/// expressions. Treated as a pure function by the core; latency and cost
/// live behind this seam.
pub trait SelectorGenerator {
    /// Error type for generation operations
    type Error;

    /// Propose one expression per field from the whole cleaned page.
    /// Individual expressions may be empty strings on partial failure.
    fn propose_initial(&self, cleaned_html: &str) -> Result<FieldSet<String>, Self::Error>;

    /// Propose corrected expressions for the failed fields only, given the
    /// current working set and per-field failure reasons. Returns only the
    /// subset it could improve.
    fn propose_corrections(
        &self,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        current: &FieldSet<String>,
        cleaned_html: &str,
    ) -> Result<BTreeMap<Field, String>, Self::Error>;

    /// Last resort: extract literal field values directly from the cleaned
    /// page, bypassing selectors entirely.
    fn extract_direct(
        &self,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        cleaned_html: &str,
    ) -> Result<BTreeMap<Field, String>, Self::Error>;
}

/// Black-box lexical-relatedness oracle used by the cross-field
/// title/content check.
pub trait KeywordOracle {
    /// Percentage (0–100) of `reference`'s keyword set also present in
    /// `other`'s keyword set.
    fn overlap_ratio(&self, reference: &str, other: &str) -> f64;
}
