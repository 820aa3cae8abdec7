// POST /auth/login/ - authenticate and issue a JWT token pair.

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::format::account_json;
use crate::auth;
use crate::error::ApiError;
use crate::services::{accounts, password};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email; either field name is accepted.
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login/ - Authenticate with username-or-email plus password.
///
/// Unknown identifier, wrong password and deactivated account are all the
/// same "Invalid credentials" answer; a correct password on an unverified
/// address gets its own message so the user knows to check their inbox.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let identifier = payload
        .username
        .as_deref()
        .filter(|v| !v.is_empty())
        .or(payload.email.as_deref().filter(|v| !v.is_empty()));

    let password = payload.password.as_deref().filter(|v| !v.is_empty());
    let (Some(identifier), Some(password)) = (identifier, password) else {
        return Err(ApiError::bad_request("Username/email and password are required."));
    };

    let account = accounts::find_active_by_identifier(&state.pool, identifier)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid credentials"))?;

    if !password::verify_password(password, &account.password_hash)? {
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    if !account.email_verified {
        return Err(ApiError::bad_request("E-mail is not verified."));
    }

    let pair = auth::generate_token_pair(&account, &state.config.security).map_err(|e| {
        tracing::error!(error = %e, "token generation failed");
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    Ok(Json(json!({
        "access": pair.access,
        "refresh": pair.refresh,
        "user": account_json(&account),
    })))
}
