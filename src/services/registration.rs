use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::database::{self, models::Account};
use crate::services::password::{self, PasswordError, PasswordPolicy};

/// Returned for a real success AND for any collision or policy rejection, so
/// the response never reveals whether the username/email was already taken.
pub const GENERIC_REGISTRATION_MSG: &str =
    "If this account was not registered before, a confirmation email will be sent to the provided e-mail.";

/// Returned when the create pipeline fails unexpectedly. Same status code as
/// the generic branch; the real cause only appears in the server log.
pub const GENERIC_ERR_MSG: &str = "Error creating user.";

pub const CODE_EMAIL_REQUIRED: &str = "email-required";
pub const CODE_USERNAME_REQUIRED: &str = "username-required";
pub const CODE_PASSWORD1_REQUIRED: &str = "password1-required";
pub const CODE_PASSWORD2_REQUIRED: &str = "password2-required";

/// A required registration field with its stable error code. The array order
/// is the reporting priority: when several fields are missing, the first one
/// here wins.
#[derive(Debug)]
pub struct RequiredField {
    pub field: &'static str,
    pub code: &'static str,
    pub message: &'static str,
}

pub static REQUIRED_FIELDS: [RequiredField; 4] = [
    RequiredField { field: "email", code: CODE_EMAIL_REQUIRED, message: "Email is required" },
    RequiredField { field: "username", code: CODE_USERNAME_REQUIRED, message: "Username is required" },
    RequiredField { field: "password1", code: CODE_PASSWORD1_REQUIRED, message: "Password1 is required" },
    RequiredField { field: "password2", code: CODE_PASSWORD2_REQUIRED, message: "Password2 is required" },
];

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Tagged result of the registration pipeline, consumed by a single
/// outcome-to-response mapping in the handler.
#[derive(Debug)]
pub enum RegistrationOutcome {
    /// All checks passed and the account row committed.
    Registered(Account),
    /// Collision or policy rejection; no row was created and the client gets
    /// the same response as a success.
    Suppressed,
    /// A required field was absent or empty.
    MissingField(&'static RequiredField),
    /// Unexpected failure, already logged; the client gets a non-committal
    /// generic error.
    Failed,
}

#[derive(Debug, Error)]
enum RegistrationError {
    #[error("payload incomplete after required-field check")]
    IncompletePayload,

    #[error("password hashing failed: {0}")]
    Hash(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Run the registration pipeline: required fields first (short-circuits to a
/// field-keyed error), then the validate-and-create steps inside a single
/// transaction. Every other failure mode collapses into `Suppressed` or
/// `Failed`.
pub async fn register(pool: &PgPool, policy: &PasswordPolicy, req: &RegisterRequest) -> RegistrationOutcome {
    if let Some(field) = missing_required_field(req) {
        return RegistrationOutcome::MissingField(field);
    }

    match try_create(pool, policy, req).await {
        Ok(Some(account)) => {
            // Email delivery is handled out-of-band; surface the link for
            // operators and development.
            tracing::info!(
                account_id = %account.id,
                key = ?account.verification_token,
                "account registered, confirmation pending"
            );
            RegistrationOutcome::Registered(account)
        }
        Ok(None) => RegistrationOutcome::Suppressed,
        Err(err) => {
            tracing::error!(error = %err, "registration pipeline failed");
            RegistrationOutcome::Failed
        }
    }
}

/// First missing (absent or empty) required field in priority order.
pub fn missing_required_field(req: &RegisterRequest) -> Option<&'static RequiredField> {
    REQUIRED_FIELDS
        .iter()
        .find(|f| field_value(req, f.field).map_or(true, str::is_empty))
}

fn field_value<'a>(req: &'a RegisterRequest, field: &str) -> Option<&'a str> {
    match field {
        "email" => req.email.as_deref(),
        "username" => req.username.as_deref(),
        "password1" => req.password1.as_deref(),
        "password2" => req.password2.as_deref(),
        _ => None,
    }
}

/// Validate and persist inside one transaction. `Ok(None)` means the attempt
/// was rejected without side effects (collision, weak password, mismatched
/// confirmation); the caller folds that into the generic response.
async fn try_create(
    pool: &PgPool,
    policy: &PasswordPolicy,
    req: &RegisterRequest,
) -> Result<Option<Account>, RegistrationError> {
    let (Some(username), Some(email), Some(password1), Some(password2)) = (
        req.username.as_deref(),
        req.email.as_deref(),
        req.password1.as_deref(),
        req.password2.as_deref(),
    ) else {
        return Err(RegistrationError::IncompletePayload);
    };

    // Byte-for-byte comparison, no trimming.
    if password1 != password2 {
        tracing::debug!("registration rejected: password confirmation mismatch");
        return Ok(None);
    }

    if let Err(violation) = policy.check(password1, username, email) {
        tracing::debug!(reason = %violation, "registration rejected by password policy");
        return Ok(None);
    }

    let mut tx = pool.begin().await?;

    // Advisory pre-check; the partial unique indexes remain the authority
    // under concurrency.
    if identifier_taken(&mut tx, username, email).await? {
        tx.rollback().await?;
        tracing::debug!("registration suppressed: username or email already registered");
        return Ok(None);
    }

    let password_hash = password::hash_password(password1)?;

    let inserted: Result<Account, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO accounts (id, username, email, password_hash, first_name, last_name, verification_token)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .bind(req.first_name.as_deref().unwrap_or(""))
    .bind(req.last_name.as_deref().unwrap_or(""))
    .bind(Uuid::new_v4())
    .fetch_one(&mut *tx)
    .await;

    match inserted {
        Ok(account) => {
            tx.commit().await?;
            Ok(Some(account))
        }
        Err(err) if database::is_unique_violation(&err) => {
            // Lost the race to a concurrent registration with the same
            // username or email; indistinguishable from a plain collision.
            tx.rollback().await?;
            tracing::debug!("registration suppressed: unique index rejected concurrent insert");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Case-insensitive existence check among active accounts.
async fn identifier_taken(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM accounts
        WHERE is_active AND (LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2))
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_one(&mut **tx)
    .await?;

    Ok(count > 0)
}
