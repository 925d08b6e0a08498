//! Expiry date extraction from OCR text.
//!
//! Patterns are tried in a fixed order and the first one that matches
//! decides the result:
//!
//! 1. Textual month: `Exp. Date : 4 MAR 2030`
//! 2. Day-first numeric: `04/03/2030` (always D/M/Y, never M/D/Y)
//! 3. Year-first numeric: `2030-03-04`

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::models::DATE_FORMAT;

static TEXTUAL_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(?:exp|expiry|expires)[:\s.]*(?:date)?[:\s.]*)?(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+(\d{4})",
    )
    .unwrap()
});
static DAY_FIRST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})").unwrap());
static YEAR_FIRST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})").unwrap());

/// Month abbreviations, index + 1 is the month number.
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// The date layouts recognised on medicine labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    TextualMonth,
    DayFirst,
    YearFirst,
}

impl DatePattern {
    /// Patterns in the order they are attempted.
    pub const PRIORITY: [DatePattern; 3] = [
        DatePattern::TextualMonth,
        DatePattern::DayFirst,
        DatePattern::YearFirst,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            DatePattern::TextualMonth => &TEXTUAL_MONTH_RE,
            DatePattern::DayFirst => &DAY_FIRST_RE,
            DatePattern::YearFirst => &YEAR_FIRST_RE,
        }
    }

    /// (year, month, day) from this pattern's capture groups.
    fn fields(&self, caps: &Captures<'_>) -> Option<(i32, u32, u32)> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str());
        match self {
            DatePattern::TextualMonth => {
                let day = group(1)?.parse().ok()?;
                let month = month_number(group(2)?)?;
                let year = group(3)?.parse().ok()?;
                Some((year, month, day))
            }
            DatePattern::DayFirst => {
                let day = group(1)?.parse().ok()?;
                let month = group(2)?.parse().ok()?;
                let year = group(3)?.parse().ok()?;
                Some((year, month, day))
            }
            DatePattern::YearFirst => {
                let year = group(1)?.parse().ok()?;
                let month = group(2)?.parse().ok()?;
                let day = group(3)?.parse().ok()?;
                Some((year, month, day))
            }
        }
    }
}

/// The first pattern hit in a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct DateMatch {
    pub pattern: DatePattern,
    /// The exact text the pattern matched
    pub matched_text: String,
    /// `None` when the matched fields are not a real calendar date
    pub date: Option<NaiveDate>,
}

/// Look up a month by its first three letters (case-insensitive).
pub fn month_number(word: &str) -> Option<u32> {
    let prefix: String = word.chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

/// Find the first date-shaped match, by pattern priority.
///
/// Once a pattern matches, later patterns are not tried, even if the
/// matched fields turn out not to form a valid date.
pub fn find_date_match(text: &str) -> Option<DateMatch> {
    DatePattern::PRIORITY.iter().find_map(|pattern| {
        let caps = pattern.regex().captures(text)?;
        let date = pattern
            .fields(&caps)
            .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        Some(DateMatch {
            pattern: *pattern,
            matched_text: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
            date,
        })
    })
}

/// Extract an expiry date from raw OCR text.
///
/// `None` means the caller should ask for manual entry.
pub fn extract_expiry_date(text: &str) -> Option<NaiveDate> {
    let found = find_date_match(text)?;
    if found.date.is_none() {
        tracing::warn!(
            pattern = ?found.pattern,
            matched = %found.matched_text,
            "Label date match is not a valid calendar date"
        );
    }
    found.date
}

/// Same as [`extract_expiry_date`], formatted as zero-padded `YYYY-MM-DD`.
pub fn extract_expiry_date_string(text: &str) -> Option<String> {
    extract_expiry_date(text).map(|d| d.format(DATE_FORMAT).to_string())
}
