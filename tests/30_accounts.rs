mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn delete_account_requires_authentication() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}/accounts/delete-account/", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn delete_account_soft_deletes_and_blocks_login() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let pool = common::db().await?;
    let client = reqwest::Client::new();

    let session = common::register_and_login(server, &pool).await?;

    let res = client
        .delete(format!("{}/accounts/delete-account/", server.base_url))
        .bearer_auth(&session.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // the row survives, flagged inactive
    let (count, is_active): (i64, bool) = {
        let (is_active,): (bool,) =
            sqlx::query_as("SELECT is_active FROM accounts WHERE LOWER(email) = LOWER($1)")
                .bind(&session.account.email)
                .fetch_one(&pool)
                .await?;
        (common::account_count(&pool, &session.account.email).await?, is_active)
    };
    assert_eq!(count, 1);
    assert!(!is_active);

    // a deactivated account can no longer authenticate
    let login = client
        .post(format!("{}/auth/login/", server.base_url))
        .json(&json!({
            "email": session.account.email,
            "password": session.account.password,
        }))
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::BAD_REQUEST);
    let body = login.json::<serde_json::Value>().await?;
    assert_eq!(body["detail"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn delete_account_is_idempotent() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let pool = common::db().await?;
    let client = reqwest::Client::new();

    let session = common::register_and_login(server, &pool).await?;
    let url = format!("{}/accounts/delete-account/", server.base_url);

    let first = client.delete(&url).bearer_auth(&session.access).send().await?;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = client.delete(&url).bearer_auth(&session.access).send().await?;
    assert_eq!(second.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn users_endpoints_require_authentication() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/accounts/users/", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn users_list_and_detail_never_expose_password_material() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let pool = common::db().await?;
    let client = reqwest::Client::new();

    let session = common::register_and_login(server, &pool).await?;

    let res = client
        .get(format!("{}/accounts/users/", server.base_url))
        .bearer_auth(&session.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let list = body.as_array().expect("list response");

    let me = list
        .iter()
        .find(|u| u["username"] == session.account.username.as_str())
        .expect("own account appears in the list");
    assert!(me.get("password").is_none());
    assert!(me.get("password_hash").is_none());

    let id = me["id"].as_str().expect("account id");
    let detail = client
        .get(format!("{}/accounts/users/{}/", server.base_url, id))
        .bearer_auth(&session.access)
        .send()
        .await?;
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = detail.json::<serde_json::Value>().await?;
    assert_eq!(detail["email"], session.account.email);
    assert!(detail.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn users_update_changes_profile_fields() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let pool = common::db().await?;
    let client = reqwest::Client::new();

    let session = common::register_and_login(server, &pool).await?;
    let (id,): (uuid::Uuid,) = sqlx::query_as("SELECT id FROM accounts WHERE LOWER(email) = LOWER($1)")
        .bind(&session.account.email)
        .fetch_one(&pool)
        .await?;

    let res = client
        .patch(format!("{}/accounts/users/{}/", server.base_url, id))
        .bearer_auth(&session.access)
        .json(&json!({ "first_name": "Jane", "last_name": "Doe" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["first_name"], "Jane");
    assert_eq!(body["last_name"], "Doe");
    // untouched fields survive
    assert_eq!(body["email"], session.account.email);
    Ok(())
}
