//! Bounded history of proven selector expressions for one field.

/// Maximum number of retained selector expressions per field per source.
pub const CANDIDATE_CAP: usize = 5;

/// A fixed-capacity, ordered list of distinct selector expressions.
///
/// Order is insertion order, oldest first. Recording an expression that is
/// already present leaves the list unchanged; recording a new one appends
/// it and, when the list would exceed [`CANDIDATE_CAP`], evicts the oldest
/// entry. The list therefore always holds the most recently validated
/// selectors, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorHistory {
    entries: Vec<String>,
}

impl SelectorHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored entries, re-applying the dedup and
    /// cap invariants in case the stored form predates them.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut history = Self::new();
        for entry in entries {
            history.record(entry.as_ref());
        }
        history
    }

    /// Append a validated expression under the cap/eviction rule.
    ///
    /// Returns `true` if the history changed. Blank expressions and exact
    /// duplicates are ignored.
    pub fn record(&mut self, expression: &str) -> bool {
        let expression = expression.trim();
        if expression.is_empty() || self.entries.iter().any(|e| e == expression) {
            return false;
        }
        self.entries.push(expression.to_string());
        if self.entries.len() > CANDIDATE_CAP {
            self.entries.remove(0);
        }
        true
    }

    /// Iterate over expressions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of retained expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no expression has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the exact expression is already retained.
    pub fn contains(&self, expression: &str) -> bool {
        self.entries.iter().any(|e| e == expression.trim())
    }

    /// The most recently recorded expression, if any.
    pub fn newest(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Borrow the retained expressions, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_in_order() {
        let mut h = SelectorHistory::new();
        assert!(h.record("h1"));
        assert!(h.record("h2.title"));
        let entries: Vec<&str> = h.iter().collect();
        assert_eq!(entries, vec!["h1", "h2.title"]);
        assert_eq!(h.newest(), Some("h2.title"));
    }

    #[test]
    fn record_ignores_duplicates() {
        let mut h = SelectorHistory::new();
        assert!(h.record("h1"));
        assert!(!h.record("h1"));
        assert!(!h.record("  h1  "));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn record_ignores_blank() {
        let mut h = SelectorHistory::new();
        assert!(!h.record(""));
        assert!(!h.record("   "));
        assert!(h.is_empty());
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let mut h = SelectorHistory::new();
        for i in 0..7 {
            h.record(&format!("div.v{i}"));
        }
        assert_eq!(h.len(), CANDIDATE_CAP);
        let entries: Vec<&str> = h.iter().collect();
        assert_eq!(entries, vec!["div.v2", "div.v3", "div.v4", "div.v5", "div.v6"]);
    }

    #[test]
    fn never_exceeds_cap_or_duplicates_under_any_sequence() {
        let mut h = SelectorHistory::new();
        let exprs = ["a", "b", "a", "c", "d", "e", "f", "b", "g", "g", "h"];
        for e in exprs {
            h.record(e);
            assert!(h.len() <= CANDIDATE_CAP);
            let mut seen: Vec<&str> = h.iter().collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), h.len(), "duplicate entry after recording {e}");
        }
    }

    #[test]
    fn from_entries_reapplies_invariants() {
        let h = SelectorHistory::from_entries(["a", "a", "b", "", "c", "d", "e", "f"]);
        assert_eq!(h.len(), CANDIDATE_CAP);
        let entries: Vec<&str> = h.iter().collect();
        assert_eq!(entries, vec!["b", "c", "d", "e", "f"]);
    }
}
