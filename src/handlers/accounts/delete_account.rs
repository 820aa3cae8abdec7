// DELETE /accounts/delete-account/ - self-service soft delete.

use axum::{extract::State, http::StatusCode, Extension};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::accounts;
use crate::state::AppState;

/// DELETE /accounts/delete-account/ - Deactivate the authenticated account.
///
/// Flips `is_active` and persists only that; the row is never removed and no
/// catalog content is touched. Idempotent: a repeat request on an already
/// deactivated account is still a 204.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let deactivated = accounts::deactivate(&state.pool, auth_user.id).await?;
    if deactivated {
        tracing::info!(account_id = %auth_user.id, "account deactivated on user request");
    }

    Ok(StatusCode::NO_CONTENT)
}
