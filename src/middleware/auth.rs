use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::auth::{Claims, TokenSigner};
use crate::error::AppError;

/// Extractor for the scout behind an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedScout {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<Claims> for AuthenticatedScout {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedScout
where
    TokenSigner: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = || AppError::Unauthorized("Unauthorized".to_string());

        let token = bearer_token(parts).ok_or_else(unauthorized)?;
        let signer = TokenSigner::from_ref(state);

        match signer.verify(token) {
            Ok(claims) => Ok(claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                Err(unauthorized())
            }
        }
    }
}
