//! Provider transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::MandrillConfig;

use super::types::TransportError;

/// Send-template endpoint, relative to the API base URL
pub const SEND_TEMPLATE_PATH: &str = "/messages/send-template.json";

/// Posts a JSON body to the provider and returns the parsed JSON answer
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

/// Transport backed by a pooled `reqwest` client
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &MandrillConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;

        // Error statuses still carry a JSON body ({"status": "error", ...})
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(status = %status.as_u16(), bytes = bytes.len(), "Provider responded");

        serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::Decode(format!("HTTP {}: {}", status.as_u16(), e)))
    }
}
