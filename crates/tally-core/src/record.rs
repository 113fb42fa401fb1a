//! Record and RecordId types.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::value::{parse_date, parse_number, FieldKind, FieldValue, Fields};

/// Stable record identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row identity accessor used by selection tracking.
pub trait Identify {
    /// Get the record's identifier.
    fn record_id(&self) -> RecordId;
}

impl<T: Identify + ?Sized> Identify for &T {
    fn record_id(&self) -> RecordId {
        (**self).record_id()
    }
}

/// A record is the atomic unit of data shown in a list view.
///
/// Products, orders, invoices and suppliers are all records: an identifier
/// plus a flat mapping from field name to value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Unique identifier within the collection.
    pub id: RecordId,

    /// Field values by name.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create a record with no fields.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set a field value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Convert one JSON object into a record.
    ///
    /// The identifier is read from `id_field` (string or number). Every field,
    /// the identifier included, is kept so it stays searchable.
    pub fn from_json(
        object: &serde_json::Map<String, serde_json::Value>,
        id_field: &str,
        schema: &RecordSchema,
    ) -> Result<Self, RecordError> {
        let id = match object.get(id_field) {
            Some(serde_json::Value::String(s)) => RecordId(s.clone()),
            Some(serde_json::Value::Number(n)) => RecordId(n.to_string()),
            _ => return Err(RecordError::MissingId(id_field.to_string())),
        };

        let mut record = Record::new(id);
        for (key, value) in object {
            if let Some(v) = schema.convert(key, value) {
                record.fields.insert(key.clone(), v);
            }
        }
        Ok(record)
    }
}

impl Fields for Record {
    fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.get(key).cloned()
    }
}

impl Identify for Record {
    fn record_id(&self) -> RecordId {
        self.id.clone()
    }
}

/// Per-field kind declarations used when importing untyped JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Declared kinds by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldKind>,
}

impl RecordSchema {
    /// Declare the kind of a field.
    pub fn with_field(mut self, key: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(key.into(), kind);
        self
    }

    /// Convert a JSON value according to the declared kind of `key`.
    ///
    /// Returns None for nulls, arrays and objects, which have no field value.
    pub fn convert(&self, key: &str, value: &serde_json::Value) -> Option<FieldValue> {
        use serde_json::Value;

        let raw = match value {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Number(n.as_f64()?),
            Value::Bool(b) => FieldValue::Tag(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };

        let Some(kind) = self.fields.get(key) else {
            return Some(raw);
        };

        let converted = match (kind, raw) {
            (FieldKind::Text, number @ FieldValue::Number(_)) => {
                FieldValue::Text(number.to_string())
            }
            (FieldKind::Tag, other) => FieldValue::Tag(other.to_string()),
            (FieldKind::Number, FieldValue::Text(s)) => match parse_number(&s) {
                Some(n) => FieldValue::Number(n),
                None => FieldValue::Text(s),
            },
            (FieldKind::Date, FieldValue::Text(s)) => match parse_date(&s) {
                Some(d) => FieldValue::Date(d),
                None => FieldValue::Text(s),
            },
            (_, other) => other,
        };
        Some(converted)
    }
}

/// Convert a JSON array of objects into records.
pub fn records_from_json(
    value: &serde_json::Value,
    id_field: &str,
    schema: &RecordSchema,
) -> Result<Vec<Record>, RecordError> {
    let array = value.as_array().ok_or(RecordError::NotAnArray)?;
    array
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry
                .as_object()
                .ok_or(RecordError::NotAnObject { index })?;
            Record::from_json(object, id_field, schema)
        })
        .collect()
}
