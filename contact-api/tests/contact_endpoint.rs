//! Router-level tests for the contact endpoint.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contact_api::{router, AppState, Config, MailError, Mailer, SendGridMailer};

type Calls = Arc<Mutex<Vec<(String, String, String)>>>;

struct StubMailer {
    succeed: bool,
    calls: Calls,
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, name: &str, email: &str, message: &str) -> Result<(), MailError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), email.to_string(), message.to_string()));
        if self.succeed {
            Ok(())
        } else {
            Err(MailError::Rejected {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }
}

fn config(base_url: &str) -> Config {
    Config {
        port: 0,
        sendgrid_api_key: "SG.test-key".to_string(),
        sendgrid_base_url: base_url.to_string(),
        contact_to_email: "inbox@example.com".to_string(),
        contact_from_email: "inbox@example.com".to_string(),
        contact_from_name: "Example Contact Form".to_string(),
        request_timeout_ms: 2_000,
    }
}

fn app_with_stub(succeed: bool) -> (Router, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let mailer = StubMailer {
        succeed,
        calls: calls.clone(),
    };
    let state = AppState::new(Arc::new(mailer));
    (router(state), calls)
}

async fn post_contact(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    (status, json)
}

fn failure(error: &str) -> Value {
    json!({"success": false, "error": error})
}

#[tokio::test]
async fn test_valid_submission_is_sent() {
    let (app, calls) = app_with_stub(true);

    let (status, body) = post_contact(
        app,
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "error": null}));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![(
            "Ann".to_string(),
            "ann@example.com".to_string(),
            "Hello there!".to_string()
        )]
    );
}

#[tokio::test]
async fn test_send_failure_is_500() {
    let (app, calls) = app_with_stub(false);

    let (status, body) = post_contact(
        app,
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("Message received, but email sending failed."));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_body() {
    let (app, calls) = app_with_stub(true);

    let (status, body) = post_contact(app, Body::empty()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("Request body is empty."));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_or_null_body_is_empty() {
    for raw in ["   \r\n\t ", "null"] {
        let (app, calls) = app_with_stub(true);

        let (status, body) = post_contact(app, raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", raw);
        assert_eq!(body, failure("Request body is empty."), "body: {:?}", raw);
        assert!(calls.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_filled_honeypot_variant_beats_blank_one() {
    let bodies = [
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!","honeypot":"","Honeypot":"bot"}"#,
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!","Honeypot":"bot","honeypot":""}"#,
    ];

    for raw in bodies {
        let (app, calls) = app_with_stub(true);

        let (status, body) = post_contact(app, raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", raw);
        assert_eq!(body, failure("Spam detected."), "body: {}", raw);
        assert!(calls.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_malformed_json() {
    let (app, _) = app_with_stub(true);

    let (status, body) = post_contact(app, r#"{"name": "Ann", "#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("Invalid JSON."));
}

#[tokio::test]
async fn test_honeypot_wins_regardless_of_fields() {
    let bodies = [
        r#"{"honeypot":"bot"}"#,
        r#"{"name":"","email":"nope","message":"","honeypot":"bot"}"#,
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!","HONEYPOT":"bot"}"#,
    ];

    for raw in bodies {
        let (app, calls) = app_with_stub(true);

        let (status, body) = post_contact(app, raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", raw);
        assert_eq!(body, failure("Spam detected."), "body: {}", raw);
        assert!(calls.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_validation_order() {
    let cases = [
        (r#"{"email":"bad","message":"x"}"#, "Name is required."),
        (r#"{"name":"Ann","email":"bad","message":"x"}"#, "A valid email is required."),
        (r#"{"name":"Ann","email":"ann@example.com","message":"x"}"#, "Message is too short."),
    ];

    for (raw, expected) in cases {
        let (app, calls) = app_with_stub(true);

        let (status, body) = post_contact(app, raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", raw);
        assert_eq!(body, failure(expected), "body: {}", raw);
        assert!(calls.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_fields_are_case_insensitive() {
    let (app, calls) = app_with_stub(true);

    let (status, _) = post_contact(
        app,
        r#"{"Name":"Ann","EMAIL":"ann@example.com","Message":"Hello there!"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with_stub(true);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], br#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_sendgrid_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config(&mock_server.uri());
    let mailer = SendGridMailer::new(&config).unwrap();
    let app = router(AppState::new(Arc::new(mailer)));

    let (status, body) = post_contact(
        app,
        r#"{"name":"Ann","email":"ann@example.com","message":"<script>alert(1)</script>"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "error": null}));

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["reply_to"], json!({"email": "ann@example.com", "name": "Ann"}));
    assert!(sent["content"][1]["value"]
        .as_str()
        .unwrap()
        .contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[tokio::test]
async fn test_sendgrid_rejection_is_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let config = config(&mock_server.uri());
    let mailer = SendGridMailer::new(&config).unwrap();
    let app = router(AppState::new(Arc::new(mailer)));

    let (status, body) = post_contact(
        app,
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("Message received, but email sending failed."));
}

#[tokio::test]
async fn test_unconfigured_mailer_is_500() {
    let mut config = config("http://127.0.0.1:9");
    config.sendgrid_api_key = String::new();
    let mailer = SendGridMailer::new(&config).unwrap();
    let app = router(AppState::new(Arc::new(mailer)));

    let (status, body) = post_contact(
        app,
        r#"{"name":"Ann","email":"ann@example.com","message":"Hello there!"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("Message received, but email sending failed."));
}
