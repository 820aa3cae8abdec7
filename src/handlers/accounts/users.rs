// /accounts/users/ - account administration endpoints (list, retrieve,
// update, destroy). Password updates are re-hashed; responses never carry
// the hash.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::format::account_admin_json;
use crate::database;
use crate::error::ApiError;
use crate::services::accounts::{self, AccountChanges};
use crate::services::password;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// GET /accounts/users/ - List all accounts, active and deactivated.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows = accounts::list(&state.pool).await?;
    let body = rows.iter().map(account_admin_json).collect::<Vec<_>>();
    Ok(Json(Value::Array(body)))
}

/// GET /accounts/users/{id} - Retrieve one account.
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let account = accounts::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;

    Ok(Json(account_admin_json(&account)))
}

/// PUT/PATCH /accounts/users/{id} - Update provided fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<Value>, ApiError> {
    let password_hash = match payload.password.as_deref() {
        Some(plain) if !plain.is_empty() => Some(password::hash_password(plain)?),
        _ => None,
    };

    let changes = AccountChanges {
        username: payload.username,
        email: payload.email,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    let updated = accounts::update(&state.pool, id, changes).await.map_err(|err| {
        if database::is_unique_violation(&err) {
            ApiError::bad_request("A user with that username or email already exists.")
        } else {
            err.into()
        }
    })?;

    let account = updated.ok_or_else(|| ApiError::not_found("Not found."))?;
    Ok(Json(account_admin_json(&account)))
}

/// DELETE /accounts/users/{id} - Remove the row outright. Unlike the
/// self-service flow this is a hard delete.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if accounts::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Not found."))
    }
}
