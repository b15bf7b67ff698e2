//! Name-addressed, typed access to decoded records.
//!
//! Callbacks are written before the table's columns are known to this crate,
//! so a decoded row is not a Rust struct. It is a [`Record`]: a map of
//! [`FieldValue`]s bound to the [`RecordShape`] it was decoded against. Values
//! are looked up by name and projected to a concrete type through a
//! [`FieldHandle`]; every projection returns a result instead of coercing.

use crate::error::{WebhookError, WebhookResult};
use crate::schema::{FIELD_ID, FIELD_ORDER, RecordShape};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

static NULL: FieldValue = FieldValue::Null;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// JSON `null`, or a non-required field absent from the payload.
    Null,
    Text(String),
    Integer(i64),
    Number(serde_json::Number),
    Bool(bool),
    Timestamp(DateTime<FixedOffset>),
    Record(Record),
    Array(Vec<FieldValue>),
    Json(Value),
}

impl FieldValue {
    /// Short name of the stored variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "bool",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Record(_) => "object",
            FieldValue::Array(_) => "array",
            FieldValue::Json(_) => "json",
        }
    }

    /// Converts the value back into JSON.
    ///
    /// Timestamps are rendered in RFC 3339 with as many fractional digits as
    /// needed, `Z` for UTC.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Timestamp(t) => {
                Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Record(r) => r.to_json(),
            FieldValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            FieldValue::Json(v) => v.clone(),
        }
    }
}

/// Capability interface for reading fields by name.
pub trait FieldReader {
    /// The shape this reader was decoded against.
    fn shape(&self) -> &RecordShape;

    /// Looks up a declared field.
    ///
    /// Fails with [`WebhookError::UnknownField`] if the shape does not declare
    /// `name`. A declared field missing from the payload reads as null.
    fn field(&self, name: &str) -> WebhookResult<FieldHandle<'_>>;

    fn get_str(&self, name: &str) -> WebhookResult<&str> {
        self.field(name)?.as_str()
    }

    fn get_int(&self, name: &str) -> WebhookResult<i64> {
        self.field(name)?.as_int()
    }

    fn get_time(&self, name: &str) -> WebhookResult<DateTime<Utc>> {
        self.field(name)?.as_time()
    }
}

/// A decoded instance of a [`RecordShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: Arc<RecordShape>,
    values: IndexMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(shape: Arc<RecordShape>, values: IndexMap<String, FieldValue>) -> Self {
        Self { shape, values }
    }

    /// The shared shape handle. Every record decoded by one handler points at
    /// the same allocation.
    pub fn shape_handle(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    /// Row identifier (`id` base field).
    pub fn id(&self) -> WebhookResult<i64> {
        self.get_int(FIELD_ID)
    }

    /// Display sort key (`order` base field), returned verbatim.
    pub fn order(&self) -> WebhookResult<&str> {
        self.get_str(FIELD_ORDER)
    }

    /// Iterates declared fields and their values in shape order.
    pub fn iter(&self) -> impl Iterator<Item = FieldHandle<'_>> {
        self.shape.field_names().map(move |name| FieldHandle {
            name,
            value: self.values.get(name).unwrap_or(&NULL),
        })
    }

    /// Serializes the declared fields as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|f| (f.name.to_string(), f.value.to_json()))
                .collect(),
        )
    }

    /// Moves a list of nested records out of this record, leaving null behind.
    pub(crate) fn take_records(&mut self, name: &str) -> WebhookResult<Vec<Record>> {
        if !self.shape.contains(name) {
            return Err(WebhookError::UnknownField {
                field: name.to_string(),
            });
        }
        let value = self
            .values
            .get_mut(name)
            .map(|v| std::mem::replace(v, FieldValue::Null))
            .unwrap_or(FieldValue::Null);

        match value {
            FieldValue::Null => Ok(Vec::new()),
            FieldValue::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    FieldValue::Record(r) => Ok(r),
                    other => Err(mismatch(name, "records", other.kind())),
                })
                .collect(),
            other => Err(mismatch(name, "records", other.kind())),
        }
    }
}

impl FieldReader for Record {
    fn shape(&self) -> &RecordShape {
        &self.shape
    }

    fn field(&self, name: &str) -> WebhookResult<FieldHandle<'_>> {
        let (name, _) = self
            .shape
            .get_key_value(name)
            .ok_or_else(|| WebhookError::UnknownField {
                field: name.to_string(),
            })?;
        Ok(FieldHandle {
            name,
            value: self.values.get(name).unwrap_or(&NULL),
        })
    }
}

/// A borrowed view of one field of a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct FieldHandle<'a> {
    name: &'a str,
    value: &'a FieldValue,
}

fn mismatch(field: &str, expected: &'static str, found: &'static str) -> WebhookError {
    WebhookError::TypeMismatch {
        field: field.to_string(),
        expected,
        found,
    }
}

impl<'a> FieldHandle<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn value(&self) -> &'a FieldValue {
        self.value
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, FieldValue::Null)
    }

    fn mismatch(&self, expected: &'static str) -> WebhookError {
        mismatch(self.name, expected, self.value.kind())
    }

    pub fn as_str(&self) -> WebhookResult<&'a str> {
        match self.value {
            FieldValue::Text(s) => Ok(s.as_str()),
            _ => Err(self.mismatch("text")),
        }
    }

    pub fn as_string(&self) -> WebhookResult<String> {
        self.as_str().map(str::to_string)
    }

    /// Integer projection. Numbers that fit in an `i64` are accepted too.
    pub fn as_int(&self) -> WebhookResult<i64> {
        match self.value {
            FieldValue::Integer(i) => Ok(*i),
            FieldValue::Number(n) => n.as_i64().ok_or_else(|| self.mismatch("integer")),
            _ => Err(self.mismatch("integer")),
        }
    }

    pub fn as_f64(&self) -> WebhookResult<f64> {
        match self.value {
            FieldValue::Integer(i) => Ok(*i as f64),
            FieldValue::Number(n) => n.as_f64().ok_or_else(|| self.mismatch("number")),
            _ => Err(self.mismatch("number")),
        }
    }

    pub fn as_bool(&self) -> WebhookResult<bool> {
        match self.value {
            FieldValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("bool")),
        }
    }

    /// Time projection, normalized to UTC. Text holding an RFC 3339 string is
    /// accepted as well.
    pub fn as_time(&self) -> WebhookResult<DateTime<Utc>> {
        match self.value {
            FieldValue::Timestamp(t) => Ok(t.with_timezone(&Utc)),
            FieldValue::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| self.mismatch("timestamp")),
            _ => Err(self.mismatch("timestamp")),
        }
    }

    /// The value as JSON, whatever its declared type. Never fails.
    pub fn as_raw(&self) -> Value {
        self.value.to_json()
    }

    /// Nested object projection.
    pub fn as_record(&self) -> WebhookResult<&'a Record> {
        match self.value {
            FieldValue::Record(r) => Ok(r),
            _ => Err(self.mismatch("object")),
        }
    }

    /// Sequence of nested records. A null field reads as an empty sequence.
    pub fn as_records(&self) -> WebhookResult<Records<'a>> {
        match self.value {
            FieldValue::Null => Ok(Records { items: &[] }),
            FieldValue::Array(items)
                if items.iter().all(|v| matches!(v, FieldValue::Record(_))) =>
            {
                Ok(Records {
                    items: items.as_slice(),
                })
            }
            _ => Err(self.mismatch("records")),
        }
    }

    /// Sequence of integers. A null field reads as an empty sequence.
    pub fn as_ints(&self) -> WebhookResult<Vec<i64>> {
        match self.value {
            FieldValue::Null => Ok(Vec::new()),
            FieldValue::Array(items) => items
                .iter()
                .map(|v| match v {
                    FieldValue::Integer(i) => Ok(*i),
                    other => Err(mismatch(self.name, "integers", other.kind())),
                })
                .collect(),
            _ => Err(self.mismatch("integers")),
        }
    }

    /// Raw element slice of an array field.
    pub fn as_array(&self) -> WebhookResult<&'a [FieldValue]> {
        match self.value {
            FieldValue::Array(items) => Ok(items.as_slice()),
            _ => Err(self.mismatch("array")),
        }
    }
}

/// A lazy, restartable view over a list of nested records.
///
/// `Records` is `Copy`; each call to [`Records::iter`] starts from the first
/// element again.
#[derive(Debug, Clone, Copy)]
pub struct Records<'a> {
    items: &'a [FieldValue],
}

impl<'a> Records<'a> {
    pub fn iter(&self) -> RecordsIter<'a> {
        RecordsIter {
            inner: self.items.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Record> {
        match self.items.get(index) {
            Some(FieldValue::Record(r)) => Some(r),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for Records<'a> {
    type Item = &'a Record;
    type IntoIter = RecordsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Records::iter`].
#[derive(Debug, Clone)]
pub struct RecordsIter<'a> {
    inner: std::slice::Iter<'a, FieldValue>,
}

impl<'a> Iterator for RecordsIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        // `as_records` only builds a view when every element is a record.
        self.inner.find_map(|v| match v {
            FieldValue::Record(r) => Some(r),
            _ => None,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}
