//! Prompt construction for the three generation operations.

use newshound_domain::{Field, FieldSet};
use std::collections::BTreeMap;

/// System prompt for initial selector generation over a whole page.
pub const INITIAL_PROMPT: &str = r#"Analyze this HTML structure and generate CSS selectors for extracting article fields.

Be as generic as possible, so that each selector keeps working across multiple articles from the same site. Use a trailing "@attribute" suffix when the value lives in an attribute rather than element text.

GOOD SELECTOR EXAMPLES:
- author: a[class*='author'], span[class*='byline']
- date: time[datetime], span[class*='date'], meta[property='article:published_time']@content
- title: h1, h2[class*='title']
- content: article p, div[class*='content'] p, div[class*='story'] p

BAD SELECTOR EXAMPLES (too specific):
- div.author-name-component-2024 (exact generated class - will break)
- a[href*='jane-smith'] (tied to one author)
- span:nth-child(7) (positional - breaks on any layout change)

Return ONLY valid JSON in this exact format, with no additional text or explanation:
{
  "author": "flexible_selector_here",
  "time": "flexible_selector_here",
  "date": "flexible_selector_here",
  "title": "flexible_selector_here",
  "content": "flexible_selector_here"
}

Generate selectors for:
- author: the person who wrote the article (author/byline/writer patterns)
- time: time of day the article was published (time elements, datetime attributes)
- date: date the article was published (date/datetime/published patterns)
- title: main headline of the article (usually h1 or h2)
- content: all paragraph elements containing the article text (target the container, then p)

Return ONLY the JSON object, nothing else."#;

const CORRECTION_TEMPLATE: &str = r#"The current CSS selectors failed to extract some fields correctly.

CURRENT SELECTORS:
{current}

FAILED FIELDS AND FEEDBACK:
{feedback}

Analyze this HTML structure again and generate CORRECTED CSS selectors ONLY for the failed fields.

Guidelines:
- Be flexible with class names: use [class*='...'] instead of exact matches
- Offer alternatives with a comma-separated selector list
- Prefer semantic HTML (time, article, h1) over generated class names
- Consider datetime and meta content attributes for date/time fields, using the "@attribute" suffix
- For content, capture all article paragraphs, not navigation or ads

Return ONLY valid JSON with ONLY the failed fields, for example:
{
  "author": "span[class*='byline'], a[class*='author']",
  "date": "time[datetime], meta[property='article:published_time']@content"
}

Return ONLY the JSON object for the failed fields, nothing else."#;

const DIRECT_TEMPLATE: &str = r#"You are a precise web scraper. Extract the requested fields DIRECTLY from this HTML content.

FAILED FIELDS TO EXTRACT:
{failed}

FEEDBACK ON WHY SELECTORS FAILED:
{feedback}

Your task: read the HTML and extract the actual text content for each failed field.

Guidelines:
- author: the article author's name only, no extra text
- date: the publication date formatted as "Month DD, YYYY" (e.g. "November 06, 2025")
- time: the publication time formatted as "HH:MM AM/PM IST" (e.g. "02:30 PM IST")
- title: the main article headline
- content: the main article text, all paragraphs, no ads or navigation

Return ONLY valid JSON with the failed fields, for example:
{
  "author": "John Smith",
  "date": "November 06, 2025",
  "time": "02:30 PM IST"
}

Return ONLY the JSON object, nothing else."#;

/// Build the system prompt for a targeted correction request.
pub fn correction_prompt(
    current: &FieldSet<String>,
    feedback: &BTreeMap<Field, String>,
) -> String {
    CORRECTION_TEMPLATE
        .replace("{current}", &field_set_json(current))
        .replace("{feedback}", &feedback_json(feedback))
}

/// Build the system prompt for a last-resort direct extraction.
pub fn direct_prompt(failed: &[Field], feedback: &BTreeMap<Field, String>) -> String {
    let failed_list = failed
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    DIRECT_TEMPLATE
        .replace("{failed}", &failed_list)
        .replace("{feedback}", &feedback_json(feedback))
}

fn field_set_json(set: &FieldSet<String>) -> String {
    let map: serde_json::Map<String, serde_json::Value> = set
        .iter()
        .map(|(field, value)| (field.as_str().to_string(), value.clone().into()))
        .collect();
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
}

fn feedback_json(feedback: &BTreeMap<Field, String>) -> String {
    let map: serde_json::Map<String, serde_json::Value> = feedback
        .iter()
        .map(|(field, reason)| (field.as_str().to_string(), reason.clone().into()))
        .collect();
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
}
