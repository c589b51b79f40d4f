//! Normalization of send-template responses.
//!
//! Mandrill answers with one status object per recipient: a bare object for a
//! single recipient, an array otherwise. Only the first entry is reported;
//! statuses for further recipients are dropped.

use serde_json::{Map, Value};

use crate::order::OrderNumber;

use super::types::{DeliveryResult, ResultMessage};

const SENT_MESSAGE: &str = "email:sent";
const FAILURE_MESSAGE: &str = "email:failure";

/// Raw provider response before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Single(Value),
    Many(Vec<Value>),
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => RawResponse::Many(values),
            other => RawResponse::Single(other),
        }
    }
}

impl RawResponse {
    /// Reduce the response to the object that gets reported.
    ///
    /// An empty list selects an empty object.
    pub fn select(self) -> Value {
        match self {
            RawResponse::Single(value) => value,
            RawResponse::Many(values) => {
                if values.len() > 1 {
                    tracing::debug!(
                        discarded = values.len() - 1,
                        "Reporting first recipient status only"
                    );
                }
                values
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| Value::Object(Map::new()))
            }
        }
    }
}

/// Binary classification of a provider status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success,
    Failure,
}

impl DeliveryOutcome {
    /// `sent` and `queued` succeed; every other status, or none, fails
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("sent") | Some("queued") => DeliveryOutcome::Success,
            _ => DeliveryOutcome::Failure,
        }
    }

    pub fn status_code(self) -> u16 {
        match self {
            DeliveryOutcome::Success => 200,
            DeliveryOutcome::Failure => 500,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DeliveryOutcome::Success => SENT_MESSAGE,
            DeliveryOutcome::Failure => FAILURE_MESSAGE,
        }
    }
}

pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Turn a raw provider response into a [`DeliveryResult`]. Never fails:
    /// provider-side rejections are reported as a 500 result.
    pub fn normalize(
        raw: RawResponse,
        message_id: impl Into<String>,
        order_number: OrderNumber,
    ) -> DeliveryResult {
        let mut payload = raw.select();
        drop_null_reject_reason(&mut payload);

        let outcome = DeliveryOutcome::classify(payload.get("status").and_then(Value::as_str));

        DeliveryResult {
            status_code: outcome.status_code(),
            message_id: message_id.into(),
            order_number,
            messages: vec![ResultMessage {
                message: outcome.message().to_string(),
                payload,
            }],
        }
    }
}

fn drop_null_reject_reason(payload: &mut Value) {
    if let Some(map) = payload.as_object_mut() {
        if matches!(map.get("reject_reason"), Some(Value::Null)) {
            map.remove("reject_reason");
        }
    }
}
