use brtool_client::{BaserowClient, BaserowConfig, ClientError, InstanceSettings};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Config defaults ─────────────────────────────────────────────

#[test]
fn config_default() {
    let cfg = BaserowConfig::default();
    assert_eq!(cfg.host, "localhost");
    assert!(cfg.token.is_empty());
    assert!(!cfg.use_tls);
    assert!(!cfg.accept_invalid_certs);
    assert!(!cfg.trace_http);
    assert_eq!(cfg.timeout_secs, 30);
}

#[test]
fn config_base_url_follows_tls_flag() {
    let mut cfg = BaserowConfig::new("baserow.example.com", "t");
    assert_eq!(cfg.base_url(), "http://baserow.example.com");
    cfg.use_tls = true;
    assert_eq!(cfg.base_url(), "https://baserow.example.com");
}

#[test]
fn config_debug_redacts_token() {
    let cfg = BaserowConfig::new("h", "super-secret-token");
    let debug = format!("{cfg:?}");
    assert!(debug.contains("host"));
    assert!(!debug.contains("super-secret-token"));
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: BaserowConfig =
        serde_json::from_str(r#"{"host": "db.local:8080", "token": "abc"}"#).unwrap();
    assert_eq!(cfg.host, "db.local:8080");
    assert_eq!(cfg.token, "abc");
    assert_eq!(cfg.timeout_secs, 30);
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn new_rejects_empty_host() {
    let err = BaserowClient::new(BaserowConfig::new("  ", "token")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn new_rejects_empty_token() {
    let err = BaserowClient::new(BaserowConfig::new("localhost", "")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn new_builds_base_url() {
    let client = BaserowClient::new(BaserowConfig::new("localhost:8000", "token")).unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
    assert_eq!(client.config().host, "localhost:8000");
}

// ── Wiremock-based integration tests ────────────────────────────

fn mock_client(server: &MockServer) -> BaserowClient {
    let config = BaserowConfig {
        host: server.address().to_string(),
        token: "secret".to_string(),
        trace_http: true,
        ..Default::default()
    };
    BaserowClient::new(config).unwrap()
}

#[tokio::test]
async fn ping_returns_settings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings/"))
        .and(header("Authorization", "Token secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "allow_new_signups": true,
            "allow_reset_password": true,
            "account_deletion_grace_delay": 30,
            "co_branding_logo": null,
            "instance_wide_licenses": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = mock_client(&server).ping().await.unwrap();
    assert_eq!(
        settings,
        InstanceSettings {
            allow_new_signups: true,
            allow_reset_password: true,
            account_deletion_grace_delay: 30,
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn ping_non_200_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    match mock_client(&server).ping().await {
        Err(ClientError::Api { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn ping_invalid_body_is_serialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = mock_client(&server).ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
}

#[tokio::test]
async fn ping_unreachable_host_is_http_error() {
    let client = BaserowClient::new(BaserowConfig {
        host: "127.0.0.1:1".to_string(),
        token: "t".to_string(),
        timeout_secs: 2,
        ..Default::default()
    })
    .unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn update_row_field_sends_patch() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/database/rows/table/531/8/"))
        .and(query_param("user_field_names", "true"))
        .and(header("Authorization", "Token secret"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"Report": "done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 8,
            "order": "1.00000000000000000000",
            "Report": "done"
        })))
        .expect(1)
        .mount(&server)
        .await;

    mock_client(&server)
        .update_row_field(531, 8, "Report", "done")
        .await
        .unwrap();
}

#[tokio::test]
async fn update_row_field_accepts_non_string_values() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/database/rows/table/1/2/"))
        .and(body_json(serde_json::json!({"Count": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    mock_client(&server)
        .update_row_field(1, 2, "Count", 42)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_row_field_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "ERROR_INVALID_TOKEN"
        })))
        .mount(&server)
        .await;

    let err = mock_client(&server)
        .update_row_field(531, 8, "Report", "done")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(401));
    assert!(format!("{err}").contains("ERROR_INVALID_TOKEN"));
}

#[tokio::test]
async fn update_row_field_rejects_other_success_codes() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = mock_client(&server)
        .update_row_field(531, 8, "Report", "done")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(204));
}

// ── Errors ──────────────────────────────────────────────────────

#[test]
fn error_display_api() {
    let err = ClientError::Api {
        status: 404,
        body: "ERROR_ROW_DOES_NOT_EXIST".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("404"));
    assert!(msg.contains("ERROR_ROW_DOES_NOT_EXIST"));
    assert!(!err.is_unauthorized());
}

#[test]
fn error_from_serde_json() {
    let serde_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
    let err: ClientError = serde_err.into();
    assert!(format!("{err}").contains("serialization"));
    assert_eq!(err.status(), None);
}
