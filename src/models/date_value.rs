//! Temporal contact field values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A temporal field as it moves across the native boundary.
///
/// On the wire a date is either `null`, a number of milliseconds since the
/// Unix epoch, or a string. In memory application code usually works with
/// the structured `Date` variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DateValue {
    #[default]
    Absent,

    /// Milliseconds since 1970-01-01T00:00:00Z
    Epoch(f64),

    /// Unparsed text, either from application code or the native side
    Text(String),

    /// Structured date
    Date(DateTime<Utc>),
}

impl DateValue {
    /// Whether the field carries a value worth converting.
    ///
    /// Mirrors the truthiness rules of the scripted API this layer serves:
    /// absent, empty text, zero and NaN all count as empty.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Epoch(ms) => *ms != 0.0 && !ms.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Date(_) => true,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Structured date, if this value holds one.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Wire-numeric value, if this value holds one.
    pub fn as_epoch(&self) -> Option<f64> {
        match self {
            Self::Epoch(ms) => Some(*ms),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(date: DateTime<Utc>) -> Self {
        Self::Date(date)
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Convert epoch milliseconds to a structured date.
///
/// Fractional milliseconds are truncated toward zero. Returns `None` for
/// non-finite input or values outside the representable range.
pub fn date_from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    let truncated = ms.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(truncated as i64)
}

/// Convert a structured date to epoch milliseconds.
pub fn epoch_millis_from_date(date: &DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64
}

impl Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Epoch(ms) => {
                // Whole milliseconds go out as integers
                if ms.fract() == 0.0 && ms.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*ms as i64)
                } else {
                    serializer.serialize_f64(*ms)
                }
            }
            Self::Text(s) => serializer.serialize_str(s),
            Self::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

struct DateValueVisitor;

impl<'de> Visitor<'de> for DateValueVisitor {
    type Value = DateValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, a number of epoch milliseconds, or a date string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<DateValue, E> {
        Ok(DateValue::Absent)
    }

    fn visit_none<E: de::Error>(self) -> Result<DateValue, E> {
        Ok(DateValue::Absent)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<DateValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DateValueVisitor)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DateValue, E> {
        Ok(DateValue::Epoch(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DateValue, E> {
        Ok(DateValue::Epoch(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<DateValue, E> {
        Ok(DateValue::Epoch(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DateValue, E> {
        Ok(DateValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<DateValue, E> {
        Ok(DateValue::Text(v))
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DateValueVisitor)
    }
}
