use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database;
use crate::handlers::{accounts, auth, catalog};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected (JWT required)
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/registration", post(auth::register::register))
        .route("/auth/registration/verify-email", post(auth::verify::verify_email))
        .route("/auth/registration/resend-email", post(auth::verify::resend_email))
        .route("/auth/login", post(auth::login::login))
        .route("/auth/token/refresh", post(auth::refresh::refresh))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/user", get(auth::user::current_user))
        // Accounts
        .route("/accounts", get(accounts::api_root))
        .route("/accounts/users", get(accounts::users::list))
        .route(
            "/accounts/users/:id",
            get(accounts::users::retrieve)
                .put(accounts::users::update)
                .patch(accounts::users::update)
                .delete(accounts::users::destroy),
        )
        .route(
            "/accounts/delete-account",
            delete(accounts::delete_account::delete_account),
        )
        // Catalog
        .route("/catalog", get(catalog::api_root))
        .route(
            "/catalog/categories",
            get(catalog::categories::list).post(catalog::categories::create),
        )
        .route(
            "/catalog/categories/:id",
            get(catalog::categories::retrieve)
                .put(catalog::categories::update)
                .patch(catalog::categories::partial_update)
                .delete(catalog::categories::destroy),
        )
        .route(
            "/catalog/books",
            get(catalog::books::list).post(catalog::books::create),
        )
        .route(
            "/catalog/books/:id",
            get(catalog::books::retrieve)
                .put(catalog::books::update)
                .patch(catalog::books::partial_update)
                .delete(catalog::books::destroy),
        )
        .route(
            "/catalog/chapters",
            get(catalog::chapters::list).post(catalog::chapters::create),
        )
        .route(
            "/catalog/chapters/:id",
            get(catalog::chapters::retrieve)
                .put(catalog::chapters::update)
                .patch(catalog::chapters::partial_update)
                .delete(catalog::chapters::destroy),
        )
        .route_layer(axum::middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Sweasy API (Rust)",
        "version": version,
        "description": "Learning content platform backend built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "registration": "/auth/registration/ (public)",
            "login": "/auth/login/ (public)",
            "token_refresh": "/auth/token/refresh/ (public)",
            "user": "/auth/user/ (protected)",
            "accounts": "/accounts/* (protected)",
            "catalog": "/catalog/* (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::pool::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
