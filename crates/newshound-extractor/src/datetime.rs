//! Date and time normalization.
//!
//! Whatever a page exposes, date and time come out in two fixed shapes:
//! dates as `November 06, 2025` and times as `02:30 PM IST`. Machine
//! timestamps (a `datetime` attribute, a meta-tag `content` attribute, or
//! an attribute-form expression) are preferred; failing that the matched
//! text is cleaned of label words and parsed fuzzily. Only the halves a
//! page actually carries are emitted: a date-only byline yields an empty
//! time rather than a fabricated midnight.

use crate::fields;
use crate::page::Page;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Output format for the date half.
pub const DATE_FORMAT: &str = "%B %d, %Y";
/// Output format for the time half, before the timezone label.
pub const TIME_FORMAT: &str = "%I:%M %p";
/// Label appended to every normalized time.
pub const TIMEZONE_LABEL: &str = "IST";

/// A normalized timestamp. Either half may be empty when the page does
/// not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedStamp {
    /// Formatted date, or empty.
    pub date: String,
    /// Formatted time with timezone label, or empty.
    pub time: String,
}

/// What a parse attempt recovered.
#[derive(Debug, Default, Clone, Copy)]
struct ParsedStamp {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl ParsedStamp {
    fn found(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }

    fn render(&self) -> NormalizedStamp {
        NormalizedStamp {
            date: self
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            time: self
                .time
                .map(|t| format!("{} {}", t.format(TIME_FORMAT), TIMEZONE_LABEL))
                .unwrap_or_default(),
        }
    }
}

/// Label words commonly prefixed to bylines ("Updated: Nov 6, 2025").
static LABEL_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(last updated|updated|published|posted|modified)\b[:\s]*")
        .unwrap_or_else(|e| panic!("invalid label pattern: {e}"))
});

/// Month-name dates: "November 6, 2025", "6 Nov 2025", "Nov. 6th, 2025".
static NAMED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:
            (?P<month_a>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+
            (?P<day_a>\d{1,2})(?:st|nd|rd|th)?,?\s+(?P<year_a>\d{4})
          |
            (?P<day_b>\d{1,2})(?:st|nd|rd|th)?\s+
            (?P<month_b>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+
            (?P<year_b>\d{4})
        )\b",
    )
    .unwrap_or_else(|e| panic!("invalid named-date pattern: {e}"))
});

/// Numeric dates: ISO "2025-11-06" or slashed "11/6/2025".
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?P<iso_y>\d{4})-(?P<iso_m>\d{2})-(?P<iso_d>\d{2})|(?P<sl_a>\d{1,2})/(?P<sl_b>\d{1,2})/(?P<sl_y>\d{4}))\b")
        .unwrap_or_else(|e| panic!("invalid numeric-date pattern: {e}"))
});

/// Clock times: "14:30", "2:30 pm", "2:30:15 P.M.".
static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<h>\d{1,2}):(?P<m>\d{2})(?::(?P<s>\d{2}))?\s*(?P<ampm>am|pm|a\.m\.|p\.m\.)?",
    )
    .unwrap_or_else(|e| panic!("invalid clock pattern: {e}"))
});

const MONTH_PREFIXES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_number(prefix: &str) -> Option<u32> {
    let lower = prefix.to_lowercase();
    MONTH_PREFIXES
        .iter()
        .position(|p| lower.starts_with(p))
        .map(|i| i as u32 + 1)
}

/// Normalize whatever an expression matches on a page.
pub fn normalize(page: &Page, expression: &str) -> NormalizedStamp {
    for candidate in fields::machine_timestamps(page, expression) {
        let parsed = parse_machine(&candidate);
        if parsed.found() {
            return parsed.render();
        }
    }

    let fragments = fields::matched_fragments(page, expression);
    if fragments.is_empty() {
        return NormalizedStamp::default();
    }
    let text = fragments.join(" ");
    let cleaned = LABEL_WORDS.replace_all(&text, "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let parsed = parse_fuzzy(&cleaned);
    if parsed.found() {
        return parsed.render();
    }
    debug!(expression, text = %cleaned, "timestamp text did not parse");
    // Unparseable but present: surface the cleaned text as the date so the
    // value is not silently lost, and leave the time blank.
    NormalizedStamp {
        date: cleaned,
        time: String::new(),
    }
}

/// Combined date/time extraction for a pair of expressions.
///
/// Identical expressions are evaluated once. With distinct expressions,
/// the date comes from the date expression; the time comes from the time
/// expression, falling back to any time half the date expression carried.
pub fn extract_pair(page: &Page, date_expression: &str, time_expression: &str) -> (String, String) {
    if date_expression.trim() == time_expression.trim() {
        let stamp = normalize(page, date_expression);
        return (stamp.date, stamp.time);
    }
    let date_stamp = normalize(page, date_expression);
    let time_stamp = normalize(page, time_expression);
    let time = if time_stamp.time.trim().is_empty() {
        date_stamp.time
    } else {
        time_stamp.time
    };
    (date_stamp.date, time)
}

/// Parse a machine-readable timestamp string.
fn parse_machine(value: &str) -> ParsedStamp {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let naive = dt.naive_local();
        return ParsedStamp {
            date: Some(naive.date()),
            time: Some(naive.time()),
        };
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        let naive = dt.naive_local();
        return ParsedStamp {
            date: Some(naive.date()),
            time: Some(naive.time()),
        };
    }
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return ParsedStamp {
                date: Some(naive.date()),
                time: Some(naive.time()),
            };
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        // Date-only attribute: no time half to report.
        return ParsedStamp {
            date: Some(date),
            time: None,
        };
    }
    ParsedStamp::default()
}

/// Parse human-facing byline text: machine formats first (some sites put
/// raw ISO strings in visible text), then independent regex passes for
/// the date and time halves.
fn parse_fuzzy(text: &str) -> ParsedStamp {
    let machine = parse_machine(text);
    if machine.found() {
        return machine;
    }
    ParsedStamp {
        date: find_date(text),
        time: find_time(text),
    }
}

fn find_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = NAMED_DATE.captures(text) {
        let (month, day, year) = if caps.name("month_a").is_some() {
            (
                caps.name("month_a")?.as_str(),
                caps.name("day_a")?.as_str(),
                caps.name("year_a")?.as_str(),
            )
        } else {
            (
                caps.name("month_b")?.as_str(),
                caps.name("day_b")?.as_str(),
                caps.name("year_b")?.as_str(),
            )
        };
        let month = month_number(month)?;
        let day: u32 = day.parse().ok()?;
        let year: i32 = year.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Some(caps) = NUMERIC_DATE.captures(text) {
        if caps.name("iso_y").is_some() {
            let year: i32 = caps.name("iso_y")?.as_str().parse().ok()?;
            let month: u32 = caps.name("iso_m")?.as_str().parse().ok()?;
            let day: u32 = caps.name("iso_d")?.as_str().parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }
        let first: u32 = caps.name("sl_a")?.as_str().parse().ok()?;
        let second: u32 = caps.name("sl_b")?.as_str().parse().ok()?;
        let year: i32 = caps.name("sl_y")?.as_str().parse().ok()?;
        // Month-first by convention; flip when that cannot be a month.
        return if first <= 12 {
            NaiveDate::from_ymd_opt(year, first, second)
        } else {
            NaiveDate::from_ymd_opt(year, second, first)
        };
    }
    None
}

fn find_time(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.captures(text)?;
    let mut hour: u32 = caps.name("h")?.as_str().parse().ok()?;
    let minute: u32 = caps.name("m")?.as_str().parse().ok()?;
    let second: u32 = caps
        .name("s")
        .and_then(|s| s.as_str().parse().ok())
        .unwrap_or(0);
    if let Some(ampm) = caps.name("ampm") {
        let pm = ampm.as_str().to_lowercase().starts_with('p');
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Page {
        Page::parse(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn datetime_attribute_wins_over_text() {
        let p = page(r#"<time class="stamp" datetime="2025-11-06T14:30:00+05:30">yesterday</time>"#);
        let stamp = normalize(&p, "time.stamp");
        assert_eq!(stamp.date, "November 06, 2025");
        assert_eq!(stamp.time, "02:30 PM IST");
    }

    #[test]
    fn meta_content_attribute_parses() {
        let p = page(r#"<meta property="article:published_time" content="2025-01-09T08:05:00Z">"#);
        let stamp = normalize(&p, "meta[property='article:published_time']@content");
        assert_eq!(stamp.date, "January 09, 2025");
        assert_eq!(stamp.time, "08:05 AM IST");
    }

    #[test]
    fn labeled_text_parses_both_halves() {
        let p = page(r#"<span class="stamp">Updated: November 6, 2025 2:30 PM</span>"#);
        let stamp = normalize(&p, "span.stamp");
        assert_eq!(stamp.date, "November 06, 2025");
        assert_eq!(stamp.time, "02:30 PM IST");
    }

    #[test]
    fn date_only_text_leaves_time_blank() {
        let p = page(r#"<span class="stamp">Published 6 Nov 2025</span>"#);
        let stamp = normalize(&p, "span.stamp");
        assert_eq!(stamp.date, "November 06, 2025");
        assert_eq!(stamp.time, "");
    }

    #[test]
    fn date_only_machine_attribute_leaves_time_blank() {
        let p = page(r#"<time class="stamp" datetime="2025-11-06">Nov 6</time>"#);
        let stamp = normalize(&p, "time.stamp");
        assert_eq!(stamp.date, "November 06, 2025");
        assert_eq!(stamp.time, "");
    }

    #[test]
    fn twenty_four_hour_clock_renders_twelve_hour() {
        let p = page(r#"<span class="stamp">06/11/2025 at 18:45</span>"#);
        let stamp = normalize(&p, "span.stamp");
        // 06/11 reads month-first.
        assert_eq!(stamp.date, "June 11, 2025");
        assert_eq!(stamp.time, "06:45 PM IST");
    }

    #[test]
    fn day_first_slash_date_when_month_impossible() {
        let p = page(r#"<span class="stamp">23/11/2025</span>"#);
        let stamp = normalize(&p, "span.stamp");
        assert_eq!(stamp.date, "November 23, 2025");
    }

    #[test]
    fn midnight_and_noon_edge_cases() {
        let p = page(r#"<span class="a">12:05 AM</span><span class="b">12:05 PM</span>"#);
        assert_eq!(normalize(&p, "span.a").time, "12:05 AM IST");
        assert_eq!(normalize(&p, "span.b").time, "12:05 PM IST");
    }

    #[test]
    fn unparseable_text_surfaces_as_date() {
        let p = page(r#"<span class="stamp">Updated moments ago</span>"#);
        let stamp = normalize(&p, "span.stamp");
        assert_eq!(stamp.date, "moments ago");
        assert_eq!(stamp.time, "");
    }

    #[test]
    fn no_match_yields_empty_halves() {
        let p = page("<p>no stamps here</p>");
        assert_eq!(normalize(&p, "span.stamp"), NormalizedStamp::default());
        assert_eq!(normalize(&p, ""), NormalizedStamp::default());
    }

    #[test]
    fn pair_with_identical_expressions_splits_one_evaluation() {
        let p = page(r#"<time class="stamp" datetime="2025-11-06T14:30:00+05:30">x</time>"#);
        let (date, time) = extract_pair(&p, "time.stamp", "time.stamp");
        assert_eq!(date, "November 06, 2025");
        assert_eq!(time, "02:30 PM IST");
    }

    #[test]
    fn pair_falls_back_to_date_expression_time_half() {
        let p = page(r#"<time class="stamp" datetime="2025-11-06T14:30:00+05:30">x</time>"#);
        let (date, time) = extract_pair(&p, "time.stamp", ".no-such-time");
        assert_eq!(date, "November 06, 2025");
        assert_eq!(time, "02:30 PM IST");
    }

    #[test]
    fn rfc2822_machine_value_parses() {
        let stamp = parse_machine("Thu, 06 Nov 2025 14:30:00 +0530");
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2025, 11, 6));
        assert!(stamp.time.is_some());
    }
}
