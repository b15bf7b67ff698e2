//! Row events carried by a webhook envelope.
//!
//! Decoding is two-phase: the payload is first decoded structurally into an
//! envelope [`Record`], then the `event_type` discriminator selects which of
//! the three payload shapes applies and the envelope is converted into a
//! [`WebhookEvent`].

use crate::error::{WebhookError, WebhookResult};
use crate::reader::{FieldReader, Record};
use crate::schema::{
    FIELD_DATABASE_ID, FIELD_EVENT_ID, FIELD_EVENT_TYPE, FIELD_ITEMS, FIELD_OLD_ITEMS,
    FIELD_ROW_IDS, FIELD_TABLE_ID, FIELD_WORKSPACE_ID,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The `event_type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "rows.created")]
    RowsCreated,
    #[serde(rename = "rows.updated")]
    RowsUpdated,
    #[serde(rename = "rows.deleted")]
    RowsDeleted,
}

impl EventType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventType::RowsCreated => "rows.created",
            EventType::RowsUpdated => "rows.updated",
            EventType::RowsDeleted => "rows.deleted",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows.created" => Ok(EventType::RowsCreated),
            "rows.updated" => Ok(EventType::RowsUpdated),
            "rows.deleted" => Ok(EventType::RowsDeleted),
            other => Err(WebhookError::UnknownEventType(other.to_string())),
        }
    }
}

/// Identification fields common to every envelope.
///
/// Only `event_type` is guaranteed by the decoder; the rest are `None` when the
/// payload omits them. `event_id` is informational and never deduplicated on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMeta {
    pub table_id: Option<i64>,
    pub database_id: Option<i64>,
    pub workspace_id: Option<i64>,
    pub event_id: Option<String>,
    /// The discriminator exactly as received.
    pub event_type: String,
}

impl EventMeta {
    /// Reads the common fields from a decoded envelope.
    pub fn read(envelope: &Record) -> WebhookResult<Self> {
        Ok(Self {
            table_id: optional_int(envelope, FIELD_TABLE_ID)?,
            database_id: optional_int(envelope, FIELD_DATABASE_ID)?,
            workspace_id: optional_int(envelope, FIELD_WORKSPACE_ID)?,
            event_id: optional_str(envelope, FIELD_EVENT_ID)?,
            event_type: envelope.get_str(FIELD_EVENT_TYPE)?.to_string(),
        })
    }
}

fn optional_int(envelope: &Record, name: &str) -> WebhookResult<Option<i64>> {
    let field = envelope.field(name)?;
    if field.is_null() {
        return Ok(None);
    }
    field.as_int().map(Some)
}

fn optional_str(envelope: &Record, name: &str) -> WebhookResult<Option<String>> {
    let field = envelope.field(name)?;
    if field.is_null() {
        return Ok(None);
    }
    field.as_string().map(Some)
}

/// A row event, one variant per payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    Created {
        table_id: i64,
        items: Vec<Record>,
    },
    /// `items` and `old_items` correspond positionally.
    Updated {
        table_id: i64,
        items: Vec<Record>,
        old_items: Vec<Record>,
    },
    Deleted {
        table_id: i64,
        row_ids: Vec<i64>,
    },
}

impl WebhookEvent {
    /// Converts a decoded envelope into the variant its discriminator names.
    ///
    /// The discriminator is checked first, so an unknown event type is
    /// reported as such whatever else the payload lacks. Routed events need a
    /// `table_id`. Absent `items`, `old_items` or `row_ids` become empty
    /// sequences.
    pub fn from_envelope(mut envelope: Record) -> WebhookResult<Self> {
        let event_type: EventType = envelope.get_str(FIELD_EVENT_TYPE)?.parse()?;
        let table_id = optional_int(&envelope, FIELD_TABLE_ID)?
            .ok_or_else(|| WebhookError::decode(FIELD_TABLE_ID, "missing required field"))?;

        match event_type {
            EventType::RowsCreated => Ok(WebhookEvent::Created {
                table_id,
                items: envelope.take_records(FIELD_ITEMS)?,
            }),
            EventType::RowsUpdated => Ok(WebhookEvent::Updated {
                table_id,
                items: envelope.take_records(FIELD_ITEMS)?,
                old_items: envelope.take_records(FIELD_OLD_ITEMS)?,
            }),
            EventType::RowsDeleted => Ok(WebhookEvent::Deleted {
                table_id,
                row_ids: envelope.field(FIELD_ROW_IDS)?.as_ints()?,
            }),
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            WebhookEvent::Created { .. } => EventType::RowsCreated,
            WebhookEvent::Updated { .. } => EventType::RowsUpdated,
            WebhookEvent::Deleted { .. } => EventType::RowsDeleted,
        }
    }

    pub fn table_id(&self) -> i64 {
        match self {
            WebhookEvent::Created { table_id, .. }
            | WebhookEvent::Updated { table_id, .. }
            | WebhookEvent::Deleted { table_id, .. } => *table_id,
        }
    }
}
