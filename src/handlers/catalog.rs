use crate::domain::catalog::{self, CookieTypeView};
use crate::domain::qr::{self, QrPayload};
use crate::error::AppError;
use crate::extract::Json;
use crate::schemas::{ErrorBody, QrData, QrEncodeRequest};

#[utoipa::path(
    get,
    path = "/api/cookies",
    responses((status = 200, description = "Cookie catalog", body = [CookieTypeView])),
    tag = "Catalog"
)]
pub async fn list_cookies() -> Json<Vec<CookieTypeView>> {
    Json(catalog::all().iter().map(CookieTypeView::from).collect())
}

#[utoipa::path(
    post,
    path = "/api/qr/encode",
    request_body = QrEncodeRequest,
    responses(
        (status = 200, description = "Encoded payload", body = QrData),
        (status = 400, description = "Fields cannot be encoded", body = ErrorBody)
    ),
    tag = "Catalog"
)]
pub async fn encode_qr(Json(payload): Json<QrEncodeRequest>) -> Result<Json<QrData>, AppError> {
    let data = qr::encode(&payload.cookie_type, payload.quantity, payload.price)?;
    Ok(Json(QrData { data }))
}

#[utoipa::path(
    post,
    path = "/api/qr/decode",
    request_body = QrData,
    responses(
        (status = 200, description = "Decoded payload", body = QrPayload),
        (status = 400, description = "Not a cookie QR payload", body = ErrorBody)
    ),
    tag = "Catalog"
)]
pub async fn decode_qr(Json(payload): Json<QrData>) -> Result<Json<QrPayload>, AppError> {
    Ok(Json(qr::decode(&payload.data)?))
}
