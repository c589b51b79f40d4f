use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::handlers::send_order_confirmation;
use super::health::health;
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Email endpoints
        .nest(
            "/api/v1",
            Router::new().route("/order/confirmation", post(send_order_confirmation)),
        )
}
