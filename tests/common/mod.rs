#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Integration tests need a reachable Postgres; without one they skip.
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sweasy-api-rust"));
        cmd.env("SWEASY_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL (and .env)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Direct database handle for row-level assertions.
pub async fn db() -> Result<PgPool> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .context("failed to connect to test database")?;
    Ok(pool)
}

/// Unique identifier so repeated test runs never collide on the unique
/// indexes.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

pub struct Registered {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register a fresh account through the public endpoint.
pub async fn register_account(server: &TestServer) -> Result<Registered> {
    let client = reqwest::Client::new();
    let username = unique("user");
    let email = format!("{}@example.com", username);
    let password = "horse-battery-staple".to_string();

    let res = client
        .post(format!("{}/auth/registration/", server.base_url))
        .json(&serde_json::json!({
            "username": username,
            "email": email,
            "password1": password,
            "password2": password,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );

    Ok(Registered { username, email, password })
}

/// Flip the verification flag directly; email delivery is out of scope.
pub async fn mark_email_verified(pool: &PgPool, email: &str) -> Result<()> {
    sqlx::query("UPDATE accounts SET email_verified = TRUE WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

pub struct AuthSession {
    pub account: Registered,
    pub access: String,
    pub refresh: String,
}

/// Register, verify, and log in; returns a ready-to-use token pair.
pub async fn register_and_login(server: &TestServer, pool: &PgPool) -> Result<AuthSession> {
    let account = register_account(server).await?;
    mark_email_verified(pool, &account.email).await?;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/login/", server.base_url))
        .json(&serde_json::json!({
            "email": account.email,
            "password": account.password,
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    let access = body["access"].as_str().context("missing access token")?.to_string();
    let refresh = body["refresh"].as_str().context("missing refresh token")?.to_string();

    Ok(AuthSession { account, access, refresh })
}

pub async fn account_count(pool: &PgPool, email: &str) -> Result<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
