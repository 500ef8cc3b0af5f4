//! Conversions between form inputs, the stored timestamp string and the
//! strings shown in the list view.
//!
//! Stored timestamps are local wall-clock strings (`YYYY-MM-DDTHH:MM:SS`)
//! with no offset. Edit paths never lose the user's value: when a stored
//! string cannot be parsed it is handed back unchanged. Display paths never
//! fail either, they degrade to a localized "unknown" sentinel.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::locale::Locale;

pub const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Value format of an HTML `datetime-local` input.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("unrecognized timestamp '{0}'")]
    InvalidTimestamp(String),
}

impl NormalizeError {
    pub fn input(&self) -> &str {
        match self {
            NormalizeError::InvalidDate(v)
            | NormalizeError::InvalidTime(v)
            | NormalizeError::InvalidTimestamp(v) => v,
        }
    }
}

/// Date and time halves of a timestamp, as held by split form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeParts {
    pub date: String,
    pub time: String,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, NormalizeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| NormalizeError::InvalidDate(value.to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, NormalizeError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| NormalizeError::InvalidTime(value.to_string()))
}

/// Parses any of the timestamp shapes found in stored records.
///
/// Offset-carrying RFC 3339 values are converted to local wall time; a bare
/// date means midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, NormalizeError> {
    let trimmed = value.trim();

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Local).naive_local());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| NormalizeError::InvalidTimestamp(value.to_string()))
}

/// `("2024-03-04", "09:00")` becomes `"2024-03-04T09:00:00"`.
pub fn combine(date: &str, time: &str) -> Result<String, NormalizeError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(date.and_time(time).format(STORAGE_FORMAT).to_string())
}

/// Brings a combined input value (`YYYY-MM-DDTHH:MM` or longer) to storage form.
pub fn to_storage(value: &str) -> Result<String, NormalizeError> {
    parse_timestamp(value).map(|ts| ts.format(STORAGE_FORMAT).to_string())
}

pub fn split(stored: &str) -> Result<DateTimeParts, NormalizeError> {
    let ts = parse_timestamp(stored)?;
    Ok(DateTimeParts {
        date: ts.format(DATE_FORMAT).to_string(),
        time: ts.format(TIME_FORMAT).to_string(),
    })
}

/// Value for a `datetime-local` edit field; unparseable input is returned as-is.
pub fn edit_value(stored: &str) -> String {
    match parse_timestamp(stored) {
        Ok(ts) => ts.format(INPUT_FORMAT).to_string(),
        Err(err) => {
            tracing::debug!(error = %err, "keeping raw timestamp for edit field");
            stored.to_string()
        }
    }
}

/// Split edit fields; unparseable input lands in `date` untouched.
pub fn edit_parts(stored: &str) -> DateTimeParts {
    split(stored).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "keeping raw timestamp for edit fields");
        DateTimeParts {
            date: stored.to_string(),
            time: String::new(),
        }
    })
}

/// Long date such as "4 березня 2024".
pub fn format_long_date(stored: &str, locale: Locale) -> String {
    match parse_timestamp(stored) {
        Ok(ts) => format!(
            "{} {} {}",
            ts.day(),
            locale.month_name(ts.month()),
            ts.year()
        ),
        Err(_) => locale.unknown_date().to_string(),
    }
}

pub fn format_time(stored: &str, locale: Locale) -> String {
    match parse_timestamp(stored) {
        Ok(ts) => ts.format(TIME_FORMAT).to_string(),
        Err(_) => locale.unknown_time().to_string(),
    }
}

/// Human-readable length of an event. No end means an all-day entry.
pub fn format_duration(start: &str, end: Option<&str>, locale: Locale) -> String {
    let end = match end {
        Some(end) if !end.trim().is_empty() => end,
        _ => return locale.all_day().to_string(),
    };

    let minutes = match (parse_timestamp(start), parse_timestamp(end)) {
        (Ok(start), Ok(end)) => (end - start).num_minutes(),
        _ => return locale.unknown_duration().to_string(),
    };

    if minutes < 60 {
        locale.minutes(minutes)
    } else {
        locale.hours(minutes / 60, minutes % 60)
    }
}
