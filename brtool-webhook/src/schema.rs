//! Record shapes composed at runtime.
//!
//! A Baserow table's columns are only known to the embedding application, so
//! the shape a webhook row is decoded against is assembled when the handler is
//! built: the fixed identity fields every row carries, followed by whatever
//! custom fields the caller declares. The composed shape is then wrapped into
//! an [`EnvelopeShape`] describing the whole notification.

use crate::error::{WebhookError, WebhookResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Row identifier assigned by Baserow.
pub const FIELD_ID: &str = "id";
/// String-encoded fractional sort key.
pub const FIELD_ORDER: &str = "order";

/// Names reserved by the base record shape.
pub const BASE_FIELDS: [&str; 2] = [FIELD_ID, FIELD_ORDER];

pub const FIELD_TABLE_ID: &str = "table_id";
pub const FIELD_DATABASE_ID: &str = "database_id";
pub const FIELD_WORKSPACE_ID: &str = "workspace_id";
pub const FIELD_EVENT_ID: &str = "event_id";
pub const FIELD_EVENT_TYPE: &str = "event_type";
pub const FIELD_ITEMS: &str = "items";
pub const FIELD_OLD_ITEMS: &str = "old_items";
pub const FIELD_ROW_IDS: &str = "row_ids";

/// Envelope fields that must be present in every notification. Everything
/// else may be absent.
pub(crate) const ENVELOPE_REQUIRED: [&str; 1] = [FIELD_EVENT_TYPE];

/// The declared type of a record field.
///
/// Serialized in snake case so a shape can be loaded from configuration:
/// `"text"`, `{"array": "integer"}`, `{"object": {"url": "text"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    Number,
    Bool,
    /// RFC 3339 date-time string.
    Timestamp,
    /// Nested object with its own shape.
    Object(Arc<RecordShape>),
    /// Homogeneous list.
    Array(Box<FieldType>),
    /// Any JSON value, kept as-is.
    Json,
}

impl FieldType {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
            FieldType::Object(_) => "object",
            FieldType::Array(_) => "array",
            FieldType::Json => "json",
        }
    }

    /// Shorthand for a list of nested records sharing one shape.
    pub fn records(shape: Arc<RecordShape>) -> Self {
        FieldType::Array(Box::new(FieldType::Object(shape)))
    }
}

/// An ordered set of named, typed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordShape {
    fields: IndexMap<String, FieldType>,
}

impl RecordShape {
    /// Creates an empty shape.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity fields every Baserow row carries.
    #[must_use]
    pub fn base() -> Self {
        Self::new().integer(FIELD_ID).text(FIELD_ORDER)
    }

    /// Adds (or replaces) a field, keeping its first insertion position.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn text(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldType::Text)
    }

    pub fn integer(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldType::Integer)
    }

    pub fn number(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldType::Number)
    }

    pub fn bool(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldType::Bool)
    }

    pub fn timestamp(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldType::Timestamp)
    }

    pub fn object(self, name: impl Into<String>, shape: RecordShape) -> Self {
        self.with_field(name, FieldType::Object(Arc::new(shape)))
    }

    pub fn array(self, name: impl Into<String>, element: FieldType) -> Self {
        self.with_field(name, FieldType::Array(Box::new(element)))
    }

    pub fn json(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldType::Json)
    }

    /// Returns the declared type of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    pub(crate) fn get_key_value(&self, name: &str) -> Option<(&str, &FieldType)> {
        self.fields
            .get_key_value(name)
            .map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Merges the base record shape with a caller-supplied custom shape.
///
/// Base fields come first, custom fields follow in their declared order.
/// Fails with [`WebhookError::SchemaConflict`] if a custom field is named
/// `id` or `order`.
pub fn compose(custom: &RecordShape) -> WebhookResult<Arc<RecordShape>> {
    if let Some(field) = custom.field_names().find(|name| BASE_FIELDS.contains(name)) {
        return Err(WebhookError::SchemaConflict {
            field: field.to_string(),
        });
    }

    let mut composed = RecordShape::base();
    for (name, ty) in custom.fields() {
        composed = composed.with_field(name, ty.clone());
    }
    Ok(Arc::new(composed))
}

/// Wraps a composed record shape into the shape of a whole notification.
pub fn wrap(item: Arc<RecordShape>) -> EnvelopeShape {
    let shape = RecordShape::new()
        .integer(FIELD_TABLE_ID)
        .integer(FIELD_DATABASE_ID)
        .integer(FIELD_WORKSPACE_ID)
        .text(FIELD_EVENT_ID)
        .text(FIELD_EVENT_TYPE)
        .with_field(FIELD_ITEMS, FieldType::records(Arc::clone(&item)))
        .with_field(FIELD_OLD_ITEMS, FieldType::records(Arc::clone(&item)))
        .array(FIELD_ROW_IDS, FieldType::Integer);

    EnvelopeShape {
        shape: Arc::new(shape),
        item,
    }
}

/// The shape of one webhook notification.
///
/// `items` and `old_items` hold records of the composed item shape; `row_ids`
/// holds integers. All three are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeShape {
    shape: Arc<RecordShape>,
    item: Arc<RecordShape>,
}

impl EnvelopeShape {
    /// The envelope's own field set.
    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    /// The composed row shape used for `items` and `old_items`.
    pub fn item_shape(&self) -> &Arc<RecordShape> {
        &self.item
    }

    pub(crate) fn is_required(name: &str) -> bool {
        ENVELOPE_REQUIRED.contains(&name)
    }
}
