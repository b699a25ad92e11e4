use axum::{body::Bytes, extract::State, http::HeaderMap};
use chrono::Utc;

use crate::db::queries;
use crate::error::AppError;
use crate::extract::Json;
use crate::payments::signature::{self, SignatureError, SIGNATURE_HEADER};
use crate::payments::webhook::{PaymentOutcome, WebhookEvent};
use crate::schemas::{ErrorBody, WebhookAck};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/payment/webhook",
    request_body(content = String, description = "Raw signed event body", content_type = "application/json"),
    params(("Stripe-Signature" = String, Header, description = "t=<unix>,v1=<hex hmac>")),
    responses(
        (status = 200, description = "Event accepted", body = WebhookAck),
        (status = 400, description = "Invalid signature or payload", body = ErrorBody)
    ),
    tag = "Payments"
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let verified = match headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(header) => signature::verify(
            &body,
            header,
            &state.config.stripe_webhook_secret,
            state.config.webhook_tolerance_secs,
            Utc::now().timestamp(),
        ),
        None => Err(SignatureError::MissingHeader),
    };

    if let Err(e) = verified {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        return Err(AppError::BadRequest("Invalid signature".to_string()));
    }

    let event: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Webhook payload is not a recognizable event");
        AppError::BadRequest("Invalid event payload".to_string())
    })?;

    let outcome = event.outcome().map_err(|e| {
        tracing::warn!(error = %e, "Webhook payment event is incomplete");
        AppError::BadRequest("Invalid event payload".to_string())
    })?;

    match outcome {
        PaymentOutcome::Transition {
            payment_intent_id,
            status,
        } => {
            let updated =
                queries::update_status_by_payment_intent(&state.db, &payment_intent_id, status)
                    .await?;

            if updated.is_empty() {
                tracing::info!(
                    event_type = %event.event_type,
                    payment_intent_id = %payment_intent_id,
                    "No order matches payment intent, ignoring"
                );
            }
            for order_id in updated {
                tracing::info!(
                    order_id = %order_id,
                    payment_intent_id = %payment_intent_id,
                    status = %status,
                    "Order status updated from webhook"
                );
            }
        }
        PaymentOutcome::Ignored => {
            tracing::info!(
                event_type = %event.event_type,
                event_id = event.id.as_deref().unwrap_or("-"),
                "Unhandled event type"
            );
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
