//! Routing of decoded webhook events to registered callbacks.

use crate::decode::decode;
use crate::error::{WebhookError, WebhookResult};
use crate::event::{EventMeta, WebhookEvent};
use crate::reader::Record;
use crate::schema::{EnvelopeShape, RecordShape, compose, wrap};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Callback for `rows.created`: `(table_id, items)`.
pub type CreateFn = dyn Fn(i64, Vec<Record>) -> anyhow::Result<()> + Send + Sync;
/// Callback for `rows.updated`: `(table_id, items, old_items)`.
pub type UpdateFn = dyn Fn(i64, Vec<Record>, Vec<Record>) -> anyhow::Result<()> + Send + Sync;
/// Callback for `rows.deleted`: `(table_id, row_ids)`.
pub type DeleteFn = dyn Fn(i64, Vec<i64>) -> anyhow::Result<()> + Send + Sync;

/// Decodes webhook payloads for one table and routes them to callbacks.
///
/// Shapes are composed once in [`EventHandler::new`]. Callbacks are registered
/// through `&mut self`, so once the handler is shared (e.g. behind an `Arc`)
/// it is read-only and [`EventHandler::handle`] may run concurrently.
pub struct EventHandler {
    envelope: EnvelopeShape,
    on_create: Option<Box<CreateFn>>,
    on_update: Option<Box<UpdateFn>>,
    on_delete: Option<Box<DeleteFn>>,
}

impl EventHandler {
    /// Builds a handler for rows carrying the given custom fields.
    pub fn new(custom: &RecordShape) -> WebhookResult<Self> {
        let item = compose(custom)?;
        Ok(Self {
            envelope: wrap(item),
            on_create: None,
            on_update: None,
            on_delete: None,
        })
    }

    pub fn on_create<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(i64, Vec<Record>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_create = Some(Box::new(f));
        self
    }

    pub fn on_update<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(i64, Vec<Record>, Vec<Record>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_delete<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(i64, Vec<i64>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_delete = Some(Box::new(f));
        self
    }

    /// The composed row shape (base fields plus custom fields).
    pub fn item_shape(&self) -> &Arc<RecordShape> {
        self.envelope.item_shape()
    }

    pub fn envelope_shape(&self) -> &EnvelopeShape {
        &self.envelope
    }

    /// Decodes one payload and invokes the matching callback.
    ///
    /// Decode errors and unknown event types are returned without invoking
    /// any callback. A callback's error is returned as
    /// [`WebhookError::Callback`].
    pub fn handle(&self, data: &[u8]) -> WebhookResult<()> {
        let envelope = decode(data, &self.envelope)?;
        let meta = EventMeta::read(&envelope)?;
        debug!(
            table_id = ?meta.table_id,
            database_id = ?meta.database_id,
            workspace_id = ?meta.workspace_id,
            event_id = ?meta.event_id,
            event_type = %meta.event_type,
            "Dispatching webhook"
        );

        let event = WebhookEvent::from_envelope(envelope)?;
        self.dispatch(event)
    }

    /// Reads a request body to the end and handles it.
    pub fn handle_request<R: Read>(&self, mut body: R) -> WebhookResult<()> {
        let mut data = Vec::new();
        body.read_to_end(&mut data)?;
        self.handle(&data)
    }

    /// Routes an already decoded event to its callback.
    ///
    /// An event whose callback was never registered is skipped.
    pub fn dispatch(&self, event: WebhookEvent) -> WebhookResult<()> {
        let event_type = event.event_type();
        let result = match event {
            WebhookEvent::Created { table_id, items } => match &self.on_create {
                Some(f) => f(table_id, items),
                None => return skip(event_type.as_str()),
            },
            WebhookEvent::Updated {
                table_id,
                items,
                old_items,
            } => match &self.on_update {
                Some(f) => f(table_id, items, old_items),
                None => return skip(event_type.as_str()),
            },
            WebhookEvent::Deleted { table_id, row_ids } => match &self.on_delete {
                Some(f) => f(table_id, row_ids),
                None => return skip(event_type.as_str()),
            },
        };
        result.map_err(WebhookError::Callback)
    }
}

fn skip(event_type: &str) -> WebhookResult<()> {
    debug!(event_type, "No callback registered, skipping");
    Ok(())
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("envelope", &self.envelope)
            .field("on_create", &self.on_create.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}
