//! Output formatting for the CLI.

use colored::Colorize;
use newshound_domain::{Field, SourceProfile};
use newshound_extractor::resolver::Resolution;
use std::fmt::Write as _;
use std::path::Path;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the outcome of one resolution run.
    pub fn format_resolution(&self, resolution: &Resolution) -> String {
        let mut out = String::new();

        let header = format!(
            "{} resolved ({} retries, {} generation calls)",
            resolution.record.source, resolution.retries_spent, resolution.generation_calls
        );
        if resolution.unvalidated.is_empty() {
            out.push_str(&self.success(&header));
        } else {
            out.push_str(&self.warning(&header));
        }
        out.push('\n');

        for field in Field::ALL {
            let value = resolution.record.get(field);
            let shown = match field {
                Field::Content => format!("{} chars", value.chars().count()),
                _ if value.is_empty() => self.colorize("(empty)", "yellow"),
                _ => value.to_string(),
            };
            let marker = if resolution.direct_fields.contains(&field) {
                " [direct]"
            } else {
                ""
            };
            let _ = writeln!(out, "  {:<8} {}{}", format!("{field}:"), shown, marker);
        }

        if !resolution.unvalidated.is_empty() {
            let failed: Vec<String> = resolution
                .unvalidated
                .iter()
                .map(|f| f.to_string())
                .collect();
            out.push_str(&self.warning(&format!("unvalidated fields: {}", failed.join(", "))));
            out.push('\n');
        }

        out
    }

    /// Format a source profile, including cached selector histories.
    pub fn format_profile(&self, profile: &SourceProfile) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({} retries recorded, last updated: {})",
            self.colorize(&profile.source, "cyan"),
            profile.total_failures,
            profile.last_updated.as_deref().unwrap_or("never")
        );
        for (field, history) in profile.selectors.iter() {
            if history.is_empty() {
                let _ = writeln!(out, "  {:<8} (none cached)", format!("{field}:"));
            } else {
                let entries: Vec<&str> = history.iter().collect();
                let _ = writeln!(
                    out,
                    "  {:<8} [{}] {}",
                    format!("{field}:"),
                    entries.len(),
                    entries.join("  |  ")
                );
            }
        }
        out
    }

    /// Format the stats summary.
    pub fn format_stats(&self, generation_calls: u64, database: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "database:         {}", database.display());
        let _ = writeln!(out, "generation calls: {generation_calls}");
        out
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newshound_domain::{ArticleRecord, FieldSet};
    use std::collections::BTreeSet;

    fn sample_resolution() -> Resolution {
        let mut values: FieldSet<String> = FieldSet::default();
        values.set(Field::Author, "Jane Doe".to_string());
        values.set(Field::Title, "A headline long enough".to_string());
        values.set(Field::Date, "November 06, 2025".to_string());
        values.set(Field::Time, "02:30 PM IST".to_string());
        values.set(Field::Content, "body ".repeat(30));

        Resolution {
            record: ArticleRecord::from_values("example.com", "https://example.com/a", &values),
            validated: Field::ALL.iter().copied().collect(),
            unvalidated: BTreeSet::new(),
            direct_fields: BTreeSet::new(),
            retries_spent: 1,
            generation_calls: 2,
        }
    }

    #[test]
    fn resolution_summary_shows_fields_and_counts() {
        let formatter = Formatter::new(false);
        let output = formatter.format_resolution(&sample_resolution());
        assert!(output.contains("✓ example.com resolved (1 retries, 2 generation calls)"));
        assert!(output.contains("Jane Doe"));
        assert!(output.contains("150 chars"));
        assert!(!output.contains("unvalidated"));
    }

    #[test]
    fn unvalidated_and_direct_fields_are_flagged() {
        let formatter = Formatter::new(false);
        let mut resolution = sample_resolution();
        resolution.validated.remove(&Field::Content);
        resolution.unvalidated.insert(Field::Content);
        resolution.direct_fields.insert(Field::Author);

        let output = formatter.format_resolution(&resolution);
        assert!(output.contains("⚠ example.com resolved"));
        assert!(output.contains("unvalidated fields: content"));
        assert!(output.contains("Jane Doe [direct]"));
    }

    #[test]
    fn profile_listing_shows_histories() {
        let formatter = Formatter::new(false);
        let mut initial: FieldSet<String> = FieldSet::default();
        initial.set(Field::Title, "h1.headline".to_string());
        let profile = SourceProfile::seeded("example.com", &initial);

        let output = formatter.format_profile(&profile);
        assert!(output.contains("example.com (0 retries recorded, last updated: never)"));
        assert!(output.contains("h1.headline"));
        assert!(output.contains("(none cached)"));
    }

    #[test]
    fn colorize_disabled_passes_text_through() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("bad"), "✗ bad");
    }
}
