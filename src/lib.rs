pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod db;
pub mod domain;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod payments;
pub mod schemas;
pub mod startup;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenSigner;
use crate::config::Config;
use crate::middleware::request_logger::{request_logger_middleware, RequestLogConfig};
use crate::payments::PaymentProcessor;
use crate::schemas::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub tokens: TokenSigner,
    pub payments: Arc<dyn PaymentProcessor>,
}

impl FromRef<AppState> for TokenSigner {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// `*` allows any origin, a comma-separated list allows those origins, and
/// no value sends no CORS headers at all.
fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    match allowed_origins.map(str::trim) {
        Some("*") => layer.allow_origin(Any).allow_headers(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
        None => layer,
    }
}

pub fn create_app(state: AppState) -> Router {
    let log_config = RequestLogConfig {
        log_body: state.config.log_request_body,
    };
    let cors = cors_layer(state.config.cors_allowed_origins.as_deref());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/api/orders/:id",
            get(handlers::orders::get_order).put(handlers::orders::update_order),
        )
        .route("/api/orders/:id/checkout", post(handlers::checkout::checkout))
        .route("/api/payment/webhook", post(handlers::webhook::payment_webhook))
        .route("/api/cookies", get(handlers::catalog::list_cookies))
        .route("/api/qr/encode", post(handlers::catalog::encode_qr))
        .route("/api/qr/decode", post(handlers::catalog::decode_qr))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            log_config,
            request_logger_middleware,
        ))
        .layer(cors)
        .with_state(state)
}
