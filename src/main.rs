use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use sweasy_api_rust::config::AppConfig;
use sweasy_api_rust::database;
use sweasy_api_rust::routes;
use sweasy_api_rust::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Sweasy API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .context("database setup failed")?;

    let port = config.server.port;
    let state = AppState::new(config, pool);

    // Clients send Django-style trailing slashes; trim them before routing.
    let app = NormalizePathLayer::trim_trailing_slash().layer(routes::app(state));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Sweasy API listening on http://{}", bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
