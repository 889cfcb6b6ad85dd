//! Date parsing and long-form localized formatting

use crate::error::EmbedFailure;
use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How date fields are rendered.
///
/// The default ("17 Januari 2025") always spells out the month; numeric-only
/// patterns are possible but must be configured explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormatPolicy {
    /// POSIX locale name, e.g. `id_ID` or `en_US`
    pub locale: String,
    /// strftime-style pattern
    pub pattern: String,
}

impl Default for DateFormatPolicy {
    fn default() -> Self {
        Self {
            locale: "id_ID".to_string(),
            pattern: "%-d %B %Y".to_string(),
        }
    }
}

impl DateFormatPolicy {
    pub fn format(&self, date: NaiveDate) -> Result<String, EmbedFailure> {
        let locale = Locale::try_from(self.locale.as_str())
            .map_err(|_| EmbedFailure::DateFormat(format!("Unknown locale: {}", self.locale)))?;

        let mut out = String::new();
        write!(out, "{}", date.format_localized(&self.pattern, locale)).map_err(|_| {
            EmbedFailure::DateFormat(format!("Invalid date pattern: {}", self.pattern))
        })?;
        Ok(out)
    }
}

/// Parse a stored date value.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the calendar date in their
/// own offset) and offset-less `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub fn parse_date_value(raw: &str) -> Result<NaiveDate, EmbedFailure> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }
    Err(EmbedFailure::InvalidDate(raw.to_string()))
}
