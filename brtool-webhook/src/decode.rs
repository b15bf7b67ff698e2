//! Structural JSON decoding against a runtime shape.

use crate::error::{WebhookError, WebhookResult};
use crate::reader::{FieldValue, Record};
use crate::schema::{EnvelopeShape, FieldType, RecordShape};
use chrono::DateTime;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Decodes one webhook payload into a [`Record`] of the envelope shape.
///
/// Keys the shape does not declare are ignored. Optional fields that are
/// absent decode to [`FieldValue::Null`]. The `event_type` value is not
/// interpreted here.
pub fn decode(data: &[u8], shape: &EnvelopeShape) -> WebhookResult<Record> {
    let value: Value =
        serde_json::from_slice(data).map_err(|e| WebhookError::decode("$", e.to_string()))?;

    match value {
        Value::Object(map) => decode_object(map, shape.shape(), "", EnvelopeShape::is_required),
        other => Err(WebhookError::decode(
            "$",
            format!("expected object, found {}", json_kind(&other)),
        )),
    }
}

/// Decodes a nested object against a record shape. No field is required.
pub fn decode_record(value: Value, shape: &Arc<RecordShape>) -> WebhookResult<Record> {
    match value {
        Value::Object(map) => decode_object(map, shape, "", |_| false),
        other => Err(WebhookError::decode(
            "$",
            format!("expected object, found {}", json_kind(&other)),
        )),
    }
}

fn decode_object(
    mut map: Map<String, Value>,
    shape: &Arc<RecordShape>,
    path: &str,
    required: fn(&str) -> bool,
) -> WebhookResult<Record> {
    let mut values = IndexMap::with_capacity(shape.len());

    for (name, ty) in shape.fields() {
        let field_path = join(path, name);
        let value = match map.remove(name) {
            Some(Value::Null) | None if required(name) => {
                return Err(WebhookError::decode(field_path, "missing required field"));
            }
            Some(v) => decode_value(v, ty, &field_path)?,
            None => FieldValue::Null,
        };
        values.insert(name.to_string(), value);
    }

    Ok(Record::new(Arc::clone(shape), values))
}

fn decode_value(value: Value, ty: &FieldType, path: &str) -> WebhookResult<FieldValue> {
    match (ty, value) {
        (_, Value::Null) => Ok(FieldValue::Null),
        (FieldType::Json, v) => Ok(FieldValue::Json(v)),
        (FieldType::Text, Value::String(s)) => Ok(FieldValue::Text(s)),
        (FieldType::Integer, Value::Number(n)) => n
            .as_i64()
            .map(FieldValue::Integer)
            .ok_or_else(|| WebhookError::decode(path, format!("expected integer, found {n}"))),
        (FieldType::Number, Value::Number(n)) => Ok(FieldValue::Number(n)),
        (FieldType::Bool, Value::Bool(b)) => Ok(FieldValue::Bool(b)),
        (FieldType::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(FieldValue::Timestamp)
            .map_err(|e| WebhookError::decode(path, format!("invalid timestamp {s:?}: {e}"))),
        (FieldType::Object(shape), Value::Object(map)) => {
            decode_object(map, shape, path, |_| false).map(FieldValue::Record)
        }
        (FieldType::Array(element), Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = format!("{path}[{i}]");
                if item.is_null() {
                    return Err(WebhookError::decode(item_path, "null array element"));
                }
                decode_value(item, element, &item_path)
            })
            .collect::<WebhookResult<Vec<_>>>()
            .map(FieldValue::Array),
        (ty, other) => Err(WebhookError::decode(
            path,
            format!("expected {}, found {}", ty.name(), json_kind(&other)),
        )),
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
