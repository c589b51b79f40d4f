//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{DELIVERIES_TOTAL, PROVIDER_LATENCY};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    /// Record an email the provider accepted (sent or queued)
    pub fn record_sent(template: &str) {
        DELIVERIES_TOTAL.with_label_values(&["sent", template]).inc();
    }

    /// Record an email the provider rejected
    pub fn record_failure(template: &str) {
        DELIVERIES_TOTAL.with_label_values(&["failure", template]).inc();
    }

    /// Record a send that never got a usable provider answer
    pub fn record_error(template: &str) {
        DELIVERIES_TOTAL.with_label_values(&["error", template]).inc();
    }

    pub fn observe_latency(elapsed: Duration) {
        PROVIDER_LATENCY.observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_deliveries_are_encoded() {
        DeliveryMetrics::record_sent("metrics-test");
        DeliveryMetrics::record_failure("metrics-test");
        DeliveryMetrics::observe_latency(Duration::from_millis(120));

        let output = encode_metrics().unwrap();
        assert!(output.contains("order_mailer_deliveries_total"));
        assert!(output.contains("template=\"metrics-test\""));
        assert!(output.contains("order_mailer_provider_latency_seconds"));
    }
}
