//! Per-field validation verdicts.

use crate::field::Field;
use std::collections::BTreeMap;

/// The outcome of validating one extraction attempt: the set of failed
/// fields, each with a human-readable reason.
///
/// Reasons are used verbatim as feedback to the selector generation
/// client, so they should describe the failure, not the fix. The first
/// reason recorded for a field wins; later ones are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    failures: BTreeMap<Field, String>,
}

impl ValidationReport {
    /// An empty (all-passing) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a field as failed. A field already failed keeps its original
    /// reason.
    pub fn fail(&mut self, field: Field, reason: impl Into<String>) {
        self.failures.entry(field).or_insert_with(|| reason.into());
    }

    /// True when every field passed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether one field failed.
    pub fn failed(&self, field: Field) -> bool {
        self.failures.contains_key(&field)
    }

    /// The reason one field failed, if it did.
    pub fn reason(&self, field: Field) -> Option<&str> {
        self.failures.get(&field).map(String::as_str)
    }

    /// Failed field names in canonical order.
    pub fn failed_fields(&self) -> Vec<Field> {
        self.failures.keys().copied().collect()
    }

    /// The full field → reason map, for feedback to the generation client.
    pub fn feedback(&self) -> &BTreeMap<Field, String> {
        &self.failures
    }

    /// Number of failed fields.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
