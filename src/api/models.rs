//! Request models for the email endpoints

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::order::Order;

/// Integration message carrying one order.
///
/// ```json
/// {
///   "message_id": "518726r85010000001",
///   "payload": { "order": { "actual": { "number": "R123", ... } } },
///   "parameters": { "mandrill.api_key": "..." }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct OrderMessage {
    /// Correlation id echoed back in the result; generated when absent
    #[serde(default)]
    pub message_id: Option<String>,
    pub payload: OrderPayload,
    /// Per-request `mandrill.*` settings overriding the service config
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderPayload {
    pub order: OrderEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct OrderEnvelope {
    pub actual: Order,
}

impl OrderMessage {
    pub fn order(&self) -> &Order {
        &self.payload.order.actual
    }

    /// The caller's correlation id, or a fresh UUID when none was sent
    pub fn resolve_message_id(&self) -> Result<String> {
        match self.message_id.as_deref().map(str::trim) {
            None => Ok(Uuid::new_v4().to_string()),
            Some("") => Err(AppError::Validation(
                "message_id must not be blank".to_string(),
            )),
            Some(id) => Ok(id.to_string()),
        }
    }
}
