use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Account;

/// Look up an active account by username or email (case-insensitive). Used by
/// login; inactive accounts are invisible here, so a deactivated account can
/// no longer authenticate.
pub async fn find_active_by_identifier(pool: &PgPool, identifier: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM accounts
        WHERE is_active AND (LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($1))
        "#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await
}

pub async fn find_active_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts WHERE id = $1 AND is_active")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Soft-delete: flip the activity flag, nothing else. The row survives for
/// history and the unique indexes release the username/email.
pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE accounts SET is_active = FALSE, updated_at = now() WHERE id = $1 AND is_active",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Consume a verification key. Returns false when the key matches nothing,
/// which the handler maps to 404.
pub async fn verify_email(pool: &PgPool, key: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET email_verified = TRUE, verification_token = NULL, updated_at = now()
        WHERE verification_token = $1 AND is_active
        "#,
    )
    .bind(key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Issue a fresh verification key for an active, still-unverified address.
/// Returns None otherwise; the caller answers identically either way.
pub async fn rotate_verification_token(pool: &PgPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let token = Uuid::new_v4();
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET verification_token = $1, updated_at = now()
        WHERE LOWER(email) = LOWER($2) AND is_active AND NOT email_verified
        "#,
    )
    .bind(token)
    .bind(email)
    .execute(pool)
    .await?;

    Ok((result.rows_affected() > 0).then_some(token))
}

pub async fn list(pool: &PgPool) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Field-wise account update; only provided columns change. A provided
/// password arrives already hashed.
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn update(pool: &PgPool, id: Uuid, changes: AccountChanges) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE accounts
        SET username = COALESCE($2, username),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            first_name = COALESCE($5, first_name),
            last_name = COALESCE($6, last_name),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.username)
    .bind(changes.email)
    .bind(changes.password_hash)
    .bind(changes.first_name)
    .bind(changes.last_name)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
