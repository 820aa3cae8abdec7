// POST /auth/registration/verify-email/ and .../resend-email/ - confirmation
// key handling. Delivery of the actual email is out of band; fresh keys are
// written to the server log.

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::accounts;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendEmailRequest {
    pub email: String,
}

/// POST /auth/registration/verify-email/ - Confirm an address with the key
/// from the confirmation email. The key is single-use.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let key = Uuid::parse_str(payload.key.trim())
        .map_err(|_| ApiError::not_found("Not found."))?;

    if accounts::verify_email(&state.pool, key).await? {
        Ok(Json(json!({ "detail": "ok" })))
    } else {
        Err(ApiError::not_found("Not found."))
    }
}

/// POST /auth/registration/resend-email/ - Rotate the confirmation key.
///
/// Always answers ok, whether or not the address belongs to an account, so
/// this endpoint cannot be used to probe for registered emails.
pub async fn resend_email(
    State(state): State<AppState>,
    Json(payload): Json<ResendEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    if let Some(token) = accounts::rotate_verification_token(&state.pool, &payload.email).await? {
        tracing::info!(key = %token, "verification email re-issued");
    }

    Ok(Json(json!({ "detail": "ok" })))
}
