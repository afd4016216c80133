//! The final extracted record for one page.

use crate::field::{Field, FieldSet};

/// Extracted, normalized field values for one article, keyed by
/// (source identifier, page URL).
///
/// A write with an existing key fully replaces the prior record;
/// extraction is not additive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Normalized source identifier.
    pub source: String,
    /// Full page URL.
    pub url: String,
    /// Author / byline text.
    pub author: String,
    /// Headline text.
    pub title: String,
    /// Formatted publication date.
    pub date: String,
    /// Formatted publication time.
    pub time: String,
    /// Body text (may be large).
    pub content: String,
}

impl ArticleRecord {
    /// Build a record from a set of final field values.
    pub fn from_values(
        source: impl Into<String>,
        url: impl Into<String>,
        values: &FieldSet<String>,
    ) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            author: values.author.clone(),
            title: values.title.clone(),
            date: values.date.clone(),
            time: values.time.clone(),
            content: values.content.clone(),
        }
    }

    /// Borrow the value for one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Author => &self.author,
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Content => &self.content,
        }
    }
}
