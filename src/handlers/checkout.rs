use axum::extract::State;
use uuid::Uuid;

use crate::db::queries;
use crate::domain::order::to_minor_units;
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthenticatedScout;
use crate::payments::PaymentIntentRequest;
use crate::schemas::{CheckoutResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/orders/{id}/checkout",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Payment intent created", body = CheckoutResponse),
        (status = 400, description = "Order total is not chargeable", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such unpaid order for this scout", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn checkout(
    State(state): State<AppState>,
    scout: AuthenticatedScout,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let order = queries::get_order(&state.db, id, scout.id)
        .await?
        .filter(|order| order.status.accepts_changes())
        .ok_or_else(|| AppError::NotFound("Order not found or already paid".to_string()))?;

    let amount = to_minor_units(&order.total)
        .ok_or_else(|| AppError::Internal(format!("order {} total out of range", order.id)))?;
    if amount <= 0 {
        return Err(AppError::BadRequest(
            "Order total must be greater than zero".to_string(),
        ));
    }

    let intent = state
        .payments
        .create_payment_intent(PaymentIntentRequest {
            amount,
            currency: state.config.payment_currency.clone(),
            order_id: order.id,
            scout_id: scout.id,
            scout_email: scout.email.clone(),
            description: format!("Girl Scout Cookie Order #{}", order.short_ref()),
        })
        .await?;

    queries::set_payment_intent(&state.db, order.id, &intent.id).await?;

    tracing::info!(
        order_id = %order.id,
        payment_intent_id = %intent.id,
        amount,
        "Payment intent created"
    );

    Ok(Json(CheckoutResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    }))
}
