use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::db::queries;
use crate::domain::order::{NewOrderItem, Order};
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthenticatedScout;
use crate::schemas::{
    CreateOrderRequest, CreateOrderResponse, ErrorBody, OrderListResponse, UpdateOrderRequest,
};
use crate::validation::{sanitize_string, validate_order_item, validate_order_items};
use crate::AppState;

pub const ACTION_ADD_ITEM: &str = "add_item";
pub const ACTION_CANCEL: &str = "cancel";

fn not_found_or_paid() -> AppError {
    AppError::NotFound("Order not found or already paid".to_string())
}

fn clean_item(mut item: NewOrderItem) -> NewOrderItem {
    item.cookie_type = sanitize_string(&item.cookie_type);
    item
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders of the calling scout, newest first", body = OrderListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    scout: AuthenticatedScout,
) -> Result<Json<OrderListResponse>, AppError> {
    let orders = queries::list_orders(&state.db, scout.id).await?;

    Ok(Json(OrderListResponse {
        orders,
        scout_name: scout.name,
    }))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Missing or invalid items", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    scout: AuthenticatedScout,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Items are required".to_string()));
    }

    let items: Vec<NewOrderItem> = payload.items.into_iter().map(clean_item).collect();
    validate_order_items(&items)?;

    let order = queries::insert_order(&state.db, scout.id, &items).await?;

    tracing::info!(
        order_id = %order.id,
        scout_id = %scout.id,
        items = order.items.len(),
        total = %order.total,
        "Order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse { order_id: order.id }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its items", body = Order),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such order for this scout", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    scout: AuthenticatedScout,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = queries::get_order(&state.db, id, scout.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Unknown action or invalid item", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such unpaid order for this scout", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    scout: AuthenticatedScout,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let order = match (payload.action.as_str(), payload.item) {
        (ACTION_ADD_ITEM, Some(item)) => {
            let item = clean_item(item);
            validate_order_item(&item)?;

            let order = queries::append_item(&state.db, id, scout.id, &item)
                .await?
                .ok_or_else(not_found_or_paid)?;

            tracing::info!(
                order_id = %order.id,
                cookie_type = %item.cookie_type,
                quantity = item.quantity,
                total = %order.total,
                "Item appended to order"
            );
            order
        }
        (ACTION_CANCEL, _) => {
            let order = queries::cancel_order(&state.db, id, scout.id)
                .await?
                .ok_or_else(not_found_or_paid)?;

            tracing::info!(order_id = %order.id, "Order cancelled");
            order
        }
        _ => {
            return Err(AppError::BadRequest(
                "Invalid action or missing item".to_string(),
            ))
        }
    };

    Ok(Json(order))
}
