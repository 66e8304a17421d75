//! Text helpers shared by the card renderer and the page affordances.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{Error, Result};

pub const ELLIPSIS: &str = "...";
pub const INVALID_DATE: &str = "Invalid Date";

/// Long month/day/year formatting for one locale.
///
/// Month names come from chrono's locale data. The order and punctuation
/// around them are known for English, German and the Nordic languages,
/// Spanish and Portuguese, Japanese, Chinese and Korean; every other locale
/// gets day-month-year (`5 janvier 2024`).
#[derive(Debug, Clone, Copy)]
pub struct DateFormat {
    locale: Locale,
    pattern: &'static str,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            locale: Locale::en_US,
            pattern: long_date_pattern("en_US"),
        }
    }
}

impl DateFormat {
    pub fn new(locale: &str) -> Result<Self> {
        let parsed = Locale::try_from(locale)
            .map_err(|_| Error::Config(format!("unknown locale: {}", locale)))?;
        Ok(Self {
            locale: parsed,
            pattern: long_date_pattern(locale),
        })
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn format(&self, date: DateTime<Utc>) -> String {
        date.format_localized(self.pattern, self.locale).to_string()
    }
}

fn long_date_pattern(locale: &str) -> &'static str {
    let language = locale.split(['_', '@']).next().unwrap_or(locale);
    match (language, locale) {
        (_, "en_US" | "en_CA" | "en_PH") => "%B %-d, %Y",
        ("de" | "da" | "nb" | "nn", _) => "%-d. %B %Y",
        ("es" | "pt" | "gl", _) => "%-d de %B de %Y",
        ("ja" | "zh", _) => "%Y年%-m月%-d日",
        ("ko", _) => "%Y년 %-m월 %-d일",
        _ => "%-d %B %Y",
    }
}

/// Parses the date shapes the backend emits. Offsets are kept, so the
/// calendar day is the one the server wrote.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(Utc.from_utc_datetime(&date.naive_local()));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Renders `raw` as e.g. `January 5, 2024`, or `Invalid Date` if it does not parse.
pub fn format_date(raw: &str, format: &DateFormat) -> String {
    match parse_date(raw) {
        Some(date) => format.format(date),
        None => INVALID_DATE.to_string(),
    }
}

/// First `max` characters plus an ellipsis when `text` is longer, else `text` unchanged.
pub fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// First `len` characters with the ellipsis always appended. May cut mid-word.
pub fn prefix_with_ellipsis(text: &str, len: usize) -> String {
    let cut = text.char_indices().nth(len).map_or(text.len(), |(i, _)| i);
    format!("{}{}", &text[..cut], ELLIPSIS)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes needed to read `text`, rounded up. Never less than one.
pub fn reading_time_minutes(text: &str, words_per_minute: usize) -> usize {
    word_count(text).div_ceil(words_per_minute.max(1)).max(1)
}

pub fn reading_time_label(minutes: usize) -> String {
    format!("{} min read", minutes)
}
