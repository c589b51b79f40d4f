//! Prometheus metrics for order email delivery.
//!
//! - Delivery outcomes (sent, failed, errored) per template
//! - Provider round-trip latency

mod helpers;

pub use helpers::{encode_metrics, DeliveryMetrics};

use lazy_static::lazy_static;
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "order_mailer";

lazy_static! {
    /// Deliveries by outcome ("sent", "failure", "error") and template
    pub static ref DELIVERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_deliveries_total", METRIC_PREFIX),
        "Total order emails submitted, by outcome",
        &["outcome", "template"]
    ).unwrap();

    /// Provider request latency in seconds
    pub static ref PROVIDER_LATENCY: Histogram = register_histogram!(
        format!("{}_provider_latency_seconds", METRIC_PREFIX),
        "Round-trip latency of send-template requests",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();
}
