//! Email endpoint handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::{AppError, Result};
use crate::mailer::DeliveryResult;
use crate::server::AppState;

use super::models::OrderMessage;

/// Send the confirmation email for an order.
///
/// Answers with the delivery result body; the HTTP status is the result's
/// status code (200 when the provider accepted the email, 500 otherwise).
#[tracing::instrument(
    name = "http.send_order_confirmation",
    skip(state, message),
    fields(order_number = %message.order().number)
)]
pub async fn send_order_confirmation(
    State(state): State<AppState>,
    Json(message): Json<OrderMessage>,
) -> Result<(StatusCode, Json<DeliveryResult>)> {
    let message_id = message.resolve_message_id()?;
    let config = state.mailer.config().with_parameters(&message.parameters);

    let result = state
        .mailer
        .deliver_with(message.order(), &message_id, &config)
        .await?;

    let status = StatusCode::from_u16(result.status_code)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((status, Json(result)))
}
