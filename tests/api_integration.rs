//! HTTP endpoint tests
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! provider is replaced by a canned transport.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use order_mailer::config::{MandrillConfig, Settings, ServerConfig};
use order_mailer::mailer::{Transport, TransportError};
use order_mailer::server::{create_app, AppState};

struct CannedTransport {
    answer: Value,
}

#[async_trait]
impl Transport for CannedTransport {
    async fn post(&self, _path: &str, body: &Value) -> Result<Value, TransportError> {
        // Echo the key so tests can see which one was used
        let mut answer = self.answer.clone();
        answer["_key"] = body["key"].clone();
        Ok(answer)
    }
}

fn app(api_key: Option<&str>, answer: Value) -> axum::Router {
    let settings = Settings {
        server: ServerConfig::default(),
        mandrill: MandrillConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        },
    };
    let state = AppState::with_transport(settings, Arc::new(CannedTransport { answer }));
    create_app(state)
}

fn message() -> Value {
    let address = json!({
        "firstname": "Mary",
        "lastname": "Major",
        "address1": "1 Way",
        "city": "Portland",
        "zipcode": "97201",
        "state_id": 37,
        "state": {"abbr": "OR"},
        "country": {"iso": "US"}
    });
    json!({
        "message_id": "518726r85010000001",
        "payload": {"order": {"actual": {
            "number": "R555",
            "email": "mary@example.com",
            "item_total": "10.00",
            "total": "10.00",
            "shipment_state": "ready",
            "ship_address": address,
            "bill_address": address,
            "line_items": [{"variant": {"name": "Cap"}, "quantity": 1, "price": "10.00"}]
        }}}
    })
}

async fn post(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/order/confirmation")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_sent_order_returns_ok() {
    let (status, body) = post(app(Some("svc-key"), json!({"status": "sent"})), message()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message_id"], "518726r85010000001");
    assert_eq!(body["order_number"], "R555");
    assert_eq!(body["messages"][0]["message"], "email:sent");
    assert_eq!(body["messages"][0]["payload"]["status"], "sent");
    assert!(body.get("status_code").is_none());
}

#[tokio::test]
async fn test_rejected_order_returns_internal_error_status() {
    let (status, body) = post(
        app(Some("svc-key"), json!({"status": "invalid"})),
        message(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["messages"][0]["message"], "email:failure");
}

#[tokio::test]
async fn test_missing_api_key_is_unauthorized() {
    let (status, body) = post(app(None, json!({"status": "sent"})), message()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_request_parameters_supply_api_key() {
    let mut msg = message();
    msg["parameters"] = json!({"mandrill.api_key": "request-key"});

    let (status, body) = post(app(None, json!({"status": "queued"})), msg).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["payload"]["_key"], "request-key");
}

#[tokio::test]
async fn test_missing_message_id_is_generated() {
    let mut msg = message();
    msg.as_object_mut().unwrap().remove("message_id");

    let (status, body) = post(app(Some("svc-key"), json!({"status": "sent"})), msg).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["message_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_health() {
    let response = app(None, json!({}))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
