//! Request/response bodies of the JSON API and the generated OpenAPI document.

use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::domain::catalog::CookieTypeView;
use crate::domain::order::{NewOrderItem, Order, OrderItem, OrderStatus};
use crate::domain::qr::QrPayload;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub scout_name: String,
}

/// `action` is `add_item` (with `item`) or `cancel`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub action: String,
    pub item: Option<NewOrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QrEncodeRequest {
    pub cookie_type: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "5.00")]
    pub price: BigDecimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QrData {
    pub data: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DbPoolStats {
    pub active_connections: u32,
    pub idle_connections: u32,
    pub max_connections: u32,
    pub usage_percent: f32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub db: String,
    pub db_pool: DbPoolStats,
    /// Circuit breaker state of the payment processor, `closed` or `open`.
    pub payment_processor: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health,
        crate::handlers::auth::login,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::checkout::checkout,
        crate::handlers::webhook::payment_webhook,
        crate::handlers::catalog::list_cookies,
        crate::handlers::catalog::encode_qr,
        crate::handlers::catalog::decode_qr,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        UserView,
        CreateOrderRequest,
        CreateOrderResponse,
        OrderListResponse,
        UpdateOrderRequest,
        CheckoutResponse,
        WebhookAck,
        QrEncodeRequest,
        QrData,
        QrPayload,
        ErrorBody,
        HealthStatus,
        DbPoolStats,
        Order,
        OrderItem,
        OrderStatus,
        NewOrderItem,
        CookieTypeView,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Scout login"),
        (name = "Orders", description = "Order lifecycle"),
        (name = "Payments", description = "Checkout and processor webhooks"),
        (name = "Catalog", description = "Cookie catalog and QR payloads"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
