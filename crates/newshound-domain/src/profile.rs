//! Per-source learned state.

use crate::field::FieldSet;
use crate::history::SelectorHistory;

/// Everything learned about one news source, keyed by its normalized
/// source identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceProfile {
    /// Normalized source identifier (e.g. `bbc.co.uk`).
    pub source: String,

    /// Monotonically increasing count of retry attempts ever spent on
    /// this source.
    pub total_failures: u64,

    /// Ordered selector history per field, oldest first.
    pub selectors: FieldSet<SelectorHistory>,

    /// Timestamp of the last successful write, as recorded by the store.
    pub last_updated: Option<String>,
}

impl SourceProfile {
    /// Create an empty profile for a source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Create a profile seeded with one initial expression per field.
    ///
    /// Blank expressions are skipped, so a failed initial generation for
    /// one field leaves that field's history empty rather than poisoned.
    pub fn seeded(source: impl Into<String>, initial: &FieldSet<String>) -> Self {
        let mut profile = Self::new(source);
        for (field, expression) in initial.iter() {
            profile.selectors.get_mut(field).record(expression);
        }
        profile
    }
}
