//! Field values carried by records.
//!
//! Records are opaque to the engine: every field is read through
//! [`Fields::field`] and comes back as a [`FieldValue`]. The value type knows
//! how to stringify itself for search and facets, and how to coerce itself
//! into a number or a date for range filters.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text, e.g. a product name.
    Text(String),

    /// A numeric value, e.g. a price or stock count.
    Number(f64),

    /// A calendar date, e.g. an invoice due date.
    Date(NaiveDate),

    /// An enumerated tag, e.g. a status like "low-stock".
    Tag(String),
}

impl FieldValue {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create a tag value.
    pub fn tag(s: impl Into<String>) -> Self {
        Self::Tag(s.into())
    }

    /// The kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Tag(_) => FieldKind::Tag,
        }
    }

    /// Coerce to a finite number.
    ///
    /// Text and tags are parsed; dates never coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) | FieldValue::Tag(s) => parse_number(s),
            FieldValue::Date(_) => None,
        }
    }

    /// Coerce to a date.
    ///
    /// Text and tags are parsed as ISO dates; numbers never coerce.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) | FieldValue::Tag(s) => parse_date(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) | FieldValue::Tag(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// Declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Tag,
}

/// Read access to a record's fields.
///
/// The engine never assumes a schema; it only asks records for values by key.
pub trait Fields {
    /// Get the value of a field, or None if the record has no such field.
    fn field(&self, key: &str) -> Option<FieldValue>;
}

impl<T: Fields + ?Sized> Fields for &T {
    fn field(&self, key: &str) -> Option<FieldValue> {
        (**self).field(key)
    }
}

/// Parse a finite number from form or record text.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse an ISO date (`2024-01-15`) or an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers_without_trailing_zero() {
        assert_eq!(FieldValue::Number(10.0).to_string(), "10");
        assert_eq!(FieldValue::Number(199.99).to_string(), "199.99");
    }

    #[test]
    fn test_display_date_is_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(FieldValue::Date(d).to_string(), "2024-01-05");
    }

    #[test]
    fn test_as_number_coercion() {
        assert_eq!(FieldValue::text(" 42.5 ").as_number(), Some(42.5));
        assert_eq!(FieldValue::text("abc").as_number(), None);
        assert_eq!(FieldValue::text("NaN").as_number(), None);
        assert_eq!(FieldValue::Number(f64::INFINITY).as_number(), None);
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(FieldValue::Date(d).as_number(), None);
    }

    #[test]
    fn test_as_date_coercion() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(FieldValue::text("2024-01-15").as_date(), Some(d));
        assert_eq!(FieldValue::text("2024-01-15T10:00:00Z").as_date(), Some(d));
        assert_eq!(FieldValue::text("yesterday").as_date(), None);
        assert_eq!(FieldValue::Number(20240115.0).as_date(), None);
    }

    #[test]
    fn test_serialize_untagged() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let json = serde_json::to_string(&vec![
            FieldValue::text("Yoga Mat"),
            FieldValue::Number(29.99),
            FieldValue::Date(d),
            FieldValue::tag("active"),
        ])
        .unwrap();
        assert_eq!(json, r#"["Yoga Mat",29.99,"2024-01-15","active"]"#);
    }
}
