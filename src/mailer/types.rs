use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::OrderNumber;

/// Mailer-specific error type
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Mandrill API key is not configured")]
    Authentication,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Failures talking to the email provider
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Result type for mailer operations
pub type MailerResult<T> = Result<T, MailerError>;

/// A named value substituted into the email template at send time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    pub content: String,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Uniform outcome of one delivery attempt.
///
/// `status_code` is carried out-of-band (as the HTTP status of the
/// integration endpoint) and is not part of the serialized body.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    #[serde(skip)]
    pub status_code: u16,
    pub message_id: String,
    pub order_number: OrderNumber,
    pub messages: Vec<ResultMessage>,
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMessage {
    pub message: String,
    /// Provider response for the selected recipient
    pub payload: serde_json::Value,
}
