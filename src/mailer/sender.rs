use std::sync::Arc;
use std::time::Instant;

use crate::config::MandrillConfig;
use crate::metrics::DeliveryMetrics;
use crate::order::Order;

use super::payload::PayloadBuilder;
use super::response::{RawResponse, ResponseNormalizer};
use super::transport::{Transport, SEND_TEMPLATE_PATH};
use super::types::{DeliveryResult, MailerResult, TransportError};

/// Sends order confirmation emails: build, submit, normalize
pub struct OrderMailer {
    transport: Arc<dyn Transport>,
    config: MandrillConfig,
}

impl OrderMailer {
    pub fn new(transport: Arc<dyn Transport>, config: MandrillConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &MandrillConfig {
        &self.config
    }

    /// Deliver using the service-level configuration
    pub async fn deliver(&self, order: &Order, message_id: &str) -> MailerResult<DeliveryResult> {
        self.deliver_with(order, message_id, &self.config).await
    }

    /// Deliver using an explicit configuration, e.g. one carrying per-request overrides.
    ///
    /// Fails before any network I/O when the configuration has no API key.
    #[tracing::instrument(
        name = "mailer.deliver",
        skip(self, order, config),
        fields(order_number = %order.number, template = %config.template_name)
    )]
    pub async fn deliver_with(
        &self,
        order: &Order,
        message_id: &str,
        config: &MandrillConfig,
    ) -> MailerResult<DeliveryResult> {
        // Metric labels use the service template; request overrides are unbounded
        let metric_template = self.config.template_name.as_str();

        let builder = PayloadBuilder::new(order, message_id, config)?;
        let merge_vars = builder.build_merge_variables();
        tracing::debug!(variables = merge_vars.len(), "Merge variables built");

        let request = builder.build_request(merge_vars);
        let body = serde_json::to_value(&request).map_err(TransportError::from)?;

        let started = Instant::now();
        let response = self.transport.post(SEND_TEMPLATE_PATH, &body).await;
        DeliveryMetrics::observe_latency(started.elapsed());

        let raw = match response {
            Ok(raw) => raw,
            Err(e) => {
                DeliveryMetrics::record_error(metric_template);
                tracing::error!(error = %e, "Send-template request failed");
                return Err(e.into());
            }
        };

        let result =
            ResponseNormalizer::normalize(RawResponse::from(raw), message_id, order.number.clone());

        if result.is_success() {
            DeliveryMetrics::record_sent(metric_template);
            tracing::info!("Order email accepted by provider");
        } else {
            DeliveryMetrics::record_failure(metric_template);
            tracing::warn!(
                status = ?result.messages.first().and_then(|m| m.payload.get("status")),
                "Order email not accepted by provider"
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MailerError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Transport that replays a canned answer and records requests
    struct StubTransport {
        answer: Value,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl StubTransport {
        fn new(answer: Value) -> Self {
            Self {
                answer,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            Ok(self.answer.clone())
        }
    }

    fn order() -> Order {
        let address = json!({
            "firstname": "Alan",
            "lastname": "Turing",
            "address1": "Bletchley Park",
            "city": "Milton Keynes",
            "zipcode": "MK3 6EB",
            "state_name": "Buckinghamshire",
            "country": {"iso": "GB"}
        });
        serde_json::from_value(json!({
            "number": "R42",
            "email": "alan@example.com",
            "item_total": 10,
            "total": 12,
            "ship_address": address,
            "bill_address": address
        }))
        .unwrap()
    }

    fn config() -> MandrillConfig {
        MandrillConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_deliver_posts_to_send_template() {
        let transport = Arc::new(StubTransport::new(json!([{"status": "sent"}])));
        let mailer = OrderMailer::new(transport.clone(), config());

        let result = mailer.deliver(&order(), "m1").await.unwrap();
        assert_eq!(result.status_code, 200);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, SEND_TEMPLATE_PATH);
        assert_eq!(requests[0].1["key"], "test-key");
        assert_eq!(requests[0].1["message"]["metadata"]["message_id"], "m1");
    }

    #[tokio::test]
    async fn test_missing_key_never_reaches_transport() {
        let transport = Arc::new(StubTransport::new(json!({"status": "sent"})));
        let mailer = OrderMailer::new(transport.clone(), MandrillConfig::default());

        let result = mailer.deliver(&order(), "m1").await;
        assert!(matches!(result, Err(MailerError::Authentication)));
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_template_override_does_not_label_metrics() {
        let transport = Arc::new(StubTransport::new(json!({"status": "sent"})));
        let mailer = OrderMailer::new(transport.clone(), config());

        for i in 0..3 {
            let overridden = MandrillConfig {
                template_name: format!("request-template-{}", i),
                ..config()
            };
            let result = mailer.deliver_with(&order(), "m1", &overridden).await.unwrap();
            assert_eq!(result.status_code, 200);
        }

        // The override still reaches the provider
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[2].1["template_name"], "request-template-2");

        let output = crate::metrics::encode_metrics().unwrap();
        assert!(!output.contains("request-template-"));
        assert!(output.contains("template=\"order-confirmation\""));
    }

    #[tokio::test]
    async fn test_rejection_is_a_result_not_an_error() {
        let transport = Arc::new(StubTransport::new(
            json!({"status": "rejected", "reject_reason": "spam"}),
        ));
        let mailer = OrderMailer::new(transport, config());

        let result = mailer.deliver(&order(), "m1").await.unwrap();
        assert_eq!(result.status_code, 500);
        assert_eq!(result.messages[0].message, "email:failure");
    }
}
