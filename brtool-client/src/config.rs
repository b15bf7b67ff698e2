use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection settings for a Baserow instance.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaserowConfig {
    /// Host and optional port, without scheme (e.g. `baserow.example.com`).
    pub host: String,
    /// Database token, sent as `Authorization: Token <token>`.
    pub token: String,
    /// Use `https://` instead of `http://`.
    pub use_tls: bool,
    /// Skip certificate verification. Only for self-hosted instances with
    /// self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Log every request and response body at debug level.
    pub trace_http: bool,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for BaserowConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            token: String::new(),
            use_tls: false,
            accept_invalid_certs: false,
            trace_http: false,
            timeout_secs: 30,
        }
    }
}

impl BaserowConfig {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    /// `http://host` or `https://host`, depending on `use_tls`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}", self.host)
    }
}

impl fmt::Debug for BaserowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaserowConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("trace_http", &self.trace_http)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
