// GET /auth/user/ - current account details from the access token.

use axum::{extract::State, response::Json, Extension};
use serde_json::Value;

use crate::api::format::account_json;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::accounts;
use crate::state::AppState;

/// GET /auth/user/ - Return the authenticated account's profile.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let account = accounts::find_active_by_id(&state.pool, auth_user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User inactive or deleted."))?;

    Ok(Json(account_json(&account)))
}
