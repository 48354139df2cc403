//! Record types for the analysis pipeline.
//!
//! Log rows arrive from the table store as schemaless field maps. Rather than
//! an open dictionary of arbitrary objects, each value is a tagged
//! [`FieldValue`] so classification logic stays exhaustive and type-safe.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Field name carrying the row timestamp.
pub const TIMESTAMP_FIELD: &str = "Timestamp";

/// Field name carrying the row identity used for deduplication.
pub const ROW_KEY_FIELD: &str = "RowKey";

/// Field name carrying the exception text of error-bearing records.
pub const EXCEPTION_FIELD: &str = "Exception";

/// Field name carrying the elapsed service time (`HH:MM:SS.fff` form).
pub const TIME_SERVICE_FIELD: &str = "TimeService";

/// Field name carrying the invoked method/service name.
pub const NAME_METHOD_FIELD: &str = "NameMethod";

/// Field name carrying the record type label.
pub const TYPE_FIELD: &str = "Type";

/// A scalar value stored in a log record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free-form text.
    Text(String),
    /// Numeric value (integers and floats collapse to f64 on the wire).
    Number(f64),
    /// An absolute UTC instant.
    Timestamp(DateTime<Utc>),
    /// Explicit null.
    Null,
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the text content if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a `Timestamp` value.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Returns true for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Renders the value as display text (the shape classification sees).
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Timestamp(ts) => Some(canonical_timestamp(*ts)),
            FieldValue::Null => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "null"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Timestamp(ts) => serializer.serialize_str(&canonical_timestamp(*ts)),
            FieldValue::Null => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Text(b.to_string()),
            serde_json::Value::Number(n) => {
                FieldValue::Number(n.as_f64().ok_or_else(|| de::Error::custom("non-finite number"))?)
            }
            serde_json::Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(ts) => FieldValue::Timestamp(ts.with_timezone(&Utc)),
                Err(_) => FieldValue::Text(s),
            },
            other => return Err(de::Error::custom(format!("unsupported field value: {}", other))),
        })
    }
}

/// Canonical textual form for timestamps: ISO-8601 UTC with a `Z` suffix.
pub fn canonical_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A raw row as returned by the table store: an unordered field map.
///
/// Ephemeral; owned by the query call that produced it and discarded after
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Looks up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Iterates fields in deterministic (name) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Row identity used for deduplication, when present and non-empty.
    pub fn row_key(&self) -> Option<&str> {
        self.get(ROW_KEY_FIELD)
            .and_then(FieldValue::as_text)
            .filter(|key| !key.is_empty())
    }

    /// The record type label, when present.
    pub fn record_type(&self) -> Option<&str> {
        self.get(TYPE_FIELD).and_then(FieldValue::as_text)
    }

    /// Elapsed service time in milliseconds, when present and parsable.
    ///
    /// Unparsable or absent values yield `None`: no performance signal,
    /// never zero.
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.get(TIME_SERVICE_FIELD)
            .and_then(FieldValue::to_text)
            .and_then(|text| parse_elapsed_ms(&text))
    }
}

impl FromIterator<(String, FieldValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A log row reshaped into a fixed, analysis-ready field set.
///
/// Invariant: at most one `Timestamp` field, canonicalized to ISO-8601 UTC
/// text during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Looks up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Number of retained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no fields were retained.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in deterministic (name) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Row identity, when present and non-empty.
    pub fn row_key(&self) -> Option<&str> {
        self.get(ROW_KEY_FIELD)
            .and_then(FieldValue::as_text)
            .filter(|key| !key.is_empty())
    }

    /// Exception text, when the field is present and non-null.
    pub fn exception_text(&self) -> Option<String> {
        self.get(EXCEPTION_FIELD).and_then(FieldValue::to_text)
    }

    /// Returns true when the record carries a non-null exception field.
    pub fn has_exception(&self) -> bool {
        self.get(EXCEPTION_FIELD)
            .map(|value| !value.is_null())
            .unwrap_or(false)
    }

    /// Elapsed service time in milliseconds, when present and parsable.
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.get(TIME_SERVICE_FIELD)
            .and_then(FieldValue::to_text)
            .and_then(|text| parse_elapsed_ms(&text))
    }

    /// Returns true when the record carries a non-null elapsed-time field.
    pub fn has_time_service(&self) -> bool {
        self.get(TIME_SERVICE_FIELD)
            .map(|value| !value.is_null())
            .unwrap_or(false)
    }

    /// The invoked method/service name, when present.
    pub fn method_name(&self) -> Option<&str> {
        self.get(NAME_METHOD_FIELD).and_then(FieldValue::as_text)
    }
}

/// Parses an elapsed duration in the `[d.]HH:MM:SS[.fraction]` form the log
/// rows use, returning whole milliseconds.
///
/// Accepts `HH:MM` and `HH:MM:SS` with an optional day prefix (`1.02:03:04`)
/// and an optional fractional-seconds suffix. Anything else yields `None`.
pub fn parse_elapsed_ms(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts: Vec<&str> = text.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    // Optional day prefix on the hours component.
    let mut days: i64 = 0;
    if let Some((day_part, hour_part)) = parts[0].split_once('.') {
        days = day_part.parse().ok()?;
        parts[0] = hour_part;
    }

    let hours: i64 = parts[0].parse().ok()?;
    let minutes: i64 = parts[1].parse().ok()?;

    let (seconds, fraction_ms) = if parts.len() == 3 {
        let (sec_part, frac_part) = match parts[2].split_once('.') {
            Some((s, f)) => (s, Some(f)),
            None => (parts[2], None),
        };
        let seconds: i64 = sec_part.parse().ok()?;
        let fraction_ms = match frac_part {
            Some(frac) if !frac.is_empty() => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let scaled: f64 = format!("0.{}", frac).parse().ok()?;
                (scaled * 1000.0) as i64
            }
            Some(_) => return None,
            None => 0,
        };
        (seconds, fraction_ms)
    } else {
        (0, 0)
    };

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    // Checked arithmetic: an absurd hours or days component is unparsable,
    // not a panic or a wrapped value.
    let total_seconds = days
        .checked_mul(24)?
        .checked_add(hours)?
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    let total = total_seconds.checked_mul(1000)?.checked_add(fraction_ms)?;
    Some(if negative { -total } else { total })
}
