//! Baserow REST API client.
//!
//! Uses the token-authenticated database API. Only the calls the webhook
//! tooling needs are covered: checking that an instance is reachable and
//! patching a single field of a row.

use crate::config::BaserowConfig;
use crate::error::{ClientError, ClientResult};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const SETTINGS_PATH: &str = "/api/settings/";

fn update_row_path(table_id: i64, row_id: i64) -> String {
    format!("/api/database/rows/table/{table_id}/{row_id}/?user_field_names=true")
}

/// Public instance settings returned by `GET /api/settings/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSettings {
    pub allow_new_signups: bool,
    pub allow_signups_via_workspace_invitations: bool,
    pub allow_reset_password: bool,
    pub allow_global_workspace_creation: bool,
    pub account_deletion_grace_delay: i64,
    pub show_admin_signup_page: bool,
    pub track_workspace_usage: bool,
    pub show_baserow_help_request: bool,
    pub co_branding_logo: Option<Value>,
}

/// Client for one Baserow instance.
#[derive(Debug, Clone)]
pub struct BaserowClient {
    config: BaserowConfig,
    client: Client,
    base_url: String,
}

impl BaserowClient {
    /// Creates a client. Fails if the host or token is empty.
    pub fn new(config: BaserowConfig) -> ClientResult<Self> {
        if config.host.trim().is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if config.token.is_empty() {
            return Err(ClientError::Config("token must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            base_url: config.base_url(),
            config,
            client,
        })
    }

    pub fn config(&self) -> &BaserowConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks that the instance is reachable and answers with its settings.
    pub async fn ping(&self) -> ClientResult<InstanceSettings> {
        let body = self.execute(Method::GET, SETTINGS_PATH, None).await?;
        let settings = serde_json::from_str(&body)?;
        debug!(host = %self.config.host, "Baserow instance reachable");
        Ok(settings)
    }

    /// Sets one field of a row, addressing the field by its user-facing name.
    pub async fn update_row_field<V: Serialize>(
        &self,
        table_id: i64,
        row_id: i64,
        field: &str,
        value: V,
    ) -> ClientResult<()> {
        let mut payload = serde_json::Map::new();
        payload.insert(field.to_string(), serde_json::to_value(value)?);
        let payload = Value::Object(payload);

        self.execute(
            Method::PATCH,
            &update_row_path(table_id, row_id),
            Some(&payload),
        )
        .await?;

        debug!(table_id, row_id, field, "Updated row field");
        Ok(())
    }

    /// Sends an authenticated request and returns the body of a 200 response.
    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<String> {
        let url = format!("{}{}", self.base_url, path);

        if self.config.trace_http {
            debug!(%method, %url, body = ?body, "Baserow request");
        }

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Token {}", self.config.token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if self.config.trace_http {
            debug!(%method, %url, status = status.as_u16(), body = %text, "Baserow response");
        }

        if status != StatusCode::OK {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_row_path_uses_user_field_names() {
        assert_eq!(
            update_row_path(531, 8),
            "/api/database/rows/table/531/8/?user_field_names=true"
        );
    }
}
