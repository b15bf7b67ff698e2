//! Baserow row webhooks, decoded against table schemas known only at runtime.
//!
//! The pieces, leaf first:
//! - [`RecordShape`] / [`compose`] / [`wrap`]: the row shape is the base
//!   identity fields (`id`, `order`) merged with caller-declared custom fields,
//!   then wrapped into the [`EnvelopeShape`] of a whole notification
//! - [`decode`]: structural JSON decoding against that shape
//! - [`Record`] / [`FieldReader`] / [`FieldHandle`]: name-addressed, typed
//!   projection of decoded values
//! - [`WebhookEvent`] / [`EventHandler`]: discriminator-based routing to the
//!   `on_create`, `on_update` and `on_delete` callbacks
//!
//! ```no_run
//! use brtool_webhook::{EventHandler, FieldReader, RecordShape};
//!
//! let fields = RecordShape::new().text("Number").timestamp("Updated");
//! let mut handler = EventHandler::new(&fields)?;
//! handler.on_create(|table_id, items| {
//!     for item in &items {
//!         println!("{table_id}: {}", item.get_time("Updated")?);
//!     }
//!     Ok(())
//! });
//! handler.handle(br#"{"table_id": 1, "database_id": 2, "workspace_id": 3,
//!     "event_id": "e", "event_type": "rows.created", "items": []}"#)?;
//! # Ok::<(), brtool_webhook::WebhookError>(())
//! ```

mod decode;
mod error;
mod event;
mod handler;
mod reader;
mod schema;

pub use decode::{decode, decode_record};
pub use error::{WebhookError, WebhookResult};
pub use event::{EventMeta, EventType, WebhookEvent};
pub use handler::{CreateFn, DeleteFn, EventHandler, UpdateFn};
pub use reader::{FieldHandle, FieldReader, FieldValue, Record, Records, RecordsIter};
pub use schema::{
    BASE_FIELDS, EnvelopeShape, FIELD_DATABASE_ID, FIELD_EVENT_ID, FIELD_EVENT_TYPE, FIELD_ID,
    FIELD_ITEMS, FIELD_OLD_ITEMS, FIELD_ORDER, FIELD_ROW_IDS, FIELD_TABLE_ID, FIELD_WORKSPACE_ID,
    FieldType, RecordShape, compose, wrap,
};
