// POST /auth/token/refresh/ - trade a refresh token for a fresh access token.

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, TOKEN_TYPE_REFRESH};
use crate::error::ApiError;
use crate::services::accounts;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// POST /auth/token/refresh/ - Issue a new access token.
///
/// The refresh token must verify, still be of refresh type, and reference an
/// account that is still active.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::decode_token(
        &payload.refresh,
        &state.config.security.jwt_secret,
        TOKEN_TYPE_REFRESH,
    )
    .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let account = accounts::find_active_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User inactive or deleted."))?;

    let access = auth::generate_access_token(&account, &state.config.security).map_err(|e| {
        tracing::error!(error = %e, "token generation failed");
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    Ok(Json(json!({ "access": access })))
}
