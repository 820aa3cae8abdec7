pub mod delete_account;
pub mod users;

use axum::response::Json;
use serde_json::{json, Value};

/// GET /accounts/ - Account API index.
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "users": "/accounts/users/",
        "delete-account": "/accounts/delete-account/",
    }))
}
