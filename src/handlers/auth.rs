use axum::extract::State;

use crate::crypto;
use crate::db::queries;
use crate::error::AppError;
use crate::extract::Json;
use crate::schemas::{ErrorBody, LoginRequest, LoginResponse, UserView};
use crate::validation::normalize_email;
use crate::AppState;

/// Same response for an unknown email and a wrong password.
fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let email = normalize_email(&payload.email);
    let Some(scout) = queries::find_scout_by_email(&state.db, &email).await? else {
        tracing::info!("Login rejected: unknown account");
        return Err(invalid_credentials());
    };

    if !crypto::verify_password_async(payload.password, scout.password_hash.clone()).await? {
        tracing::info!(scout_id = %scout.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let token = state
        .tokens
        .issue(&scout)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(scout_id = %scout.id, "Scout logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserView {
            id: scout.id,
            email: scout.email,
            name: scout.name,
        },
    }))
}
