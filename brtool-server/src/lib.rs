//! HTTP receiver for Baserow row webhooks.

use std::{fs, path::Path, sync::Arc};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use brtool_webhook::{EventHandler, RecordShape};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HookResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HookResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(message),
        }
    }
}

async fn webhook_handler(
    State(handler): State<Arc<EventHandler>>,
    body: Bytes,
) -> (StatusCode, Json<HookResponse>) {
    // Callbacks are synchronous and may block.
    let result = tokio::task::spawn_blocking(move || handler.handle(&body)).await;

    match result {
        Ok(Ok(())) => (StatusCode::OK, Json(HookResponse::ok())),
        Ok(Err(e)) => {
            let status = if e.is_bad_payload() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            warn!(status = status.as_u16(), "Rejected webhook delivery: {}", e);
            (status, Json(HookResponse::error(e.to_string())))
        }
        Err(e) => {
            warn!("Webhook callback panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HookResponse::error("callback panicked".to_string())),
            )
        }
    }
}

async fn health_handler() -> Json<HookResponse> {
    Json(HookResponse::ok())
}

/// Build the HTTP router delivering `POST /webhook` bodies to `handler`.
pub fn build_router(handler: Arc<EventHandler>) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(handler)
}

/// Custom fields of the demo table used when no field file is given.
pub fn demo_fields() -> RecordShape {
    RecordShape::new()
        .text("Number")
        .timestamp("Updated")
        .object("Url", RecordShape::new().text("url").text("label"))
        .text("Report")
}

/// Load a custom field set from a JSON file such as
/// `{"Number": "text", "Updated": "timestamp"}`.
pub fn load_fields(path: &Path) -> Result<RecordShape> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read field file {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse field file {:?}", path))
}
