//! Selector-expression evaluation.
//!
//! A selector expression is standard CSS, optionally suffixed with
//! `@attr` to target an attribute value instead of element text, e.g.
//! `meta[property='article:published_time']@content`. Comma unions are
//! plain CSS and need no special handling.
//!
//! Evaluation never fails: an invalid or non-matching expression yields
//! an empty string, which the validator then rejects as a blank field.

use crate::page::Page;
use scraper::Selector;
use tracing::debug;

/// A parsed expression: the CSS selector plus an optional attribute target.
struct Target {
    selector: Selector,
    attribute: Option<String>,
}

/// Split a trailing `@attr` suffix off an expression.
///
/// The suffix is only recognized when the part after the last `@` looks
/// like an attribute name; `@` inside quoted attribute values (as in
/// `a[href^='mailto:@']`) stays part of the selector.
fn split_attribute(expression: &str) -> (&str, Option<&str>) {
    if let Some(at) = expression.rfind('@') {
        let (selector, attr) = (expression[..at].trim_end(), &expression[at + 1..]);
        let attr_like = !attr.is_empty()
            && attr
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
        if attr_like && !selector.is_empty() && !attr.contains(|c: char| c.is_whitespace()) {
            return (selector, Some(attr));
        }
    }
    (expression, None)
}

fn parse_target(expression: &str) -> Option<Target> {
    let expression = expression.trim();
    if expression.is_empty() {
        return None;
    }
    let (css, attribute) = split_attribute(expression);
    match Selector::parse(css) {
        Ok(selector) => Some(Target {
            selector,
            attribute: attribute.map(str::to_string),
        }),
        Err(e) => {
            debug!(expression, error = %e, "unparseable selector expression");
            None
        }
    }
}

/// Collapse any whitespace in a text fragment to single spaces.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Evaluate an expression to a single string: all matched fragments,
/// whitespace-normalized and joined with single spaces, in document order.
pub fn extract_text(page: &Page, expression: &str) -> String {
    let fragments = matched_fragments(page, expression);
    fragments.join(" ")
}

/// Evaluate an expression to its individual matched fragments.
///
/// Attribute-form expressions yield one fragment per matched element's
/// attribute value; text-form expressions yield each element's collected
/// text. Blank fragments are dropped.
pub fn matched_fragments(page: &Page, expression: &str) -> Vec<String> {
    let Some(target) = parse_target(expression) else {
        return Vec::new();
    };
    page.document()
        .select(&target.selector)
        .filter_map(|element| {
            let raw = match &target.attribute {
                Some(attr) => element.value().attr(attr).map(str::to_string)?,
                None => element.text().collect::<String>(),
            };
            let normalized = normalize_ws(&raw);
            (!normalized.is_empty()).then_some(normalized)
        })
        .collect()
}

/// Machine-readable timestamp candidates for an expression's matches.
///
/// For attribute-form expressions these are the targeted attribute values
/// themselves; for text-form expressions, each matched element's
/// `datetime` attribute, then its `content` attribute.
pub fn machine_timestamps(page: &Page, expression: &str) -> Vec<String> {
    let Some(target) = parse_target(expression) else {
        return Vec::new();
    };
    let mut candidates = Vec::new();
    for element in page.document().select(&target.selector) {
        match &target.attribute {
            Some(attr) => {
                if let Some(value) = element.value().attr(attr) {
                    candidates.push(value.trim().to_string());
                }
            }
            None => {
                for attr in ["datetime", "content"] {
                    if let Some(value) = element.value().attr(attr) {
                        candidates.push(value.trim().to_string());
                    }
                }
            }
        }
    }
    candidates.retain(|c| !c.is_empty());
    candidates
}
