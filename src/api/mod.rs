//! HTTP API
//!
//! - `POST /api/v1/order/confirmation`: send the confirmation email for an order
//! - `GET /health`: liveness
//! - `GET /metrics`: Prometheus metrics

mod handlers;
mod health;
mod metrics;
mod models;
mod routes;

pub use handlers::send_order_confirmation;
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use models::{OrderEnvelope, OrderMessage, OrderPayload};
pub use routes::api_routes;
