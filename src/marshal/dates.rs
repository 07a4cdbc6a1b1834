//! Date normalization across the native boundary.
//!
//! Outbound, temporal fields are reduced to epoch milliseconds. Inbound, epoch
//! values are turned back into structured dates. Neither direction ever fails:
//! values that cannot be coerced outbound become absent, and values that cannot
//! be parsed inbound are left as they were and logged.

use crate::models::date_value::{date_from_epoch_millis, epoch_millis_from_date};
use crate::models::{Contact, ContactFindOptions, DateValue};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

/// Coerce a date-like value to a structured date.
///
/// Accepts structured dates, epoch milliseconds (as numbers or numeric text),
/// RFC 3339 timestamps and `YYYY-MM-DD` dates, which are read as midnight UTC.
pub fn coerce_to_date(value: &DateValue) -> Option<DateTime<Utc>> {
    match value {
        DateValue::Absent => None,
        DateValue::Date(date) => Some(*date),
        DateValue::Epoch(ms) => date_from_epoch_millis(*ms),
        DateValue::Text(text) => {
            let text = text.trim();
            if let Ok(ms) = text.parse::<f64>() {
                return date_from_epoch_millis(ms);
            }
            if let Ok(date) = DateTime::parse_from_rfc3339(text) {
                return Some(date.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc())
        }
    }
}

/// Wire form of a date-like value: epoch milliseconds, or absent when it
/// cannot be coerced.
fn to_wire(value: &DateValue) -> DateValue {
    match coerce_to_date(value) {
        Some(date) => DateValue::Epoch(epoch_millis_from_date(&date)),
        None => DateValue::Absent,
    }
}

/// Replace every non-empty temporal field with its epoch-millisecond form.
///
/// Covers `published`, `updated`, `birthday` and `anniversary`.
pub fn convert_dates_out(contact: &mut Contact) {
    for field in [
        &mut contact.published,
        &mut contact.updated,
        &mut contact.birthday,
        &mut contact.anniversary,
    ] {
        if field.is_present() {
            *field = to_wire(field);
        }
    }
}

/// Replace every non-empty epoch field with a structured date.
///
/// Covers `published`, `updated` and `birthday`. `anniversary` is left in its
/// wire form. A value that does not parse stays unchanged.
pub fn convert_dates_in(contact: &mut Contact) {
    for (name, field) in [
        ("published", &mut contact.published),
        ("updated", &mut contact.updated),
        ("birthday", &mut contact.birthday),
    ] {
        if !field.is_present() || field.as_date().is_some() {
            continue;
        }

        let parsed = match &*field {
            DateValue::Epoch(ms) => Some(*ms),
            DateValue::Text(text) => parse_float_prefix(text),
            _ => None,
        };

        match parsed.and_then(date_from_epoch_millis) {
            Some(date) => *field = DateValue::Date(date),
            None => warn!(field = name, value = ?field, "Could not convert field to a date"),
        }
    }
}

/// Normalize `updated_since` to epoch milliseconds before a search is sent.
///
/// The empty-string default is left alone. Values that cannot be coerced
/// become absent.
pub fn normalize_updated_since(options: &mut ContactFindOptions) {
    if options.updated_since.is_present() {
        options.updated_since = to_wire(&options.updated_since);
    }
}

/// Parse the longest leading decimal literal of `text`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12.5ms"`
/// parses as `12.5`. Returns `None` when no digits lead the text.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let rest = &s[end..];
    if rest.starts_with("Infinity") {
        let value = if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(value);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
