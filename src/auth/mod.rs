use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::Account;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    fn new(account: &Account, token_type: &str, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: account.id,
            username: account.username.clone(),
            token_type: token_type.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Access/refresh token pair issued on login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Unexpected token type: expected {expected}")]
    WrongTokenType { expected: &'static str },
}

pub fn generate_token_pair(account: &Account, security: &SecurityConfig) -> Result<TokenPair, JwtError> {
    let access = generate_token(
        account,
        TOKEN_TYPE_ACCESS,
        Duration::minutes(security.access_token_expiry_mins as i64),
        security,
    )?;
    let refresh = generate_token(
        account,
        TOKEN_TYPE_REFRESH,
        Duration::hours(security.refresh_token_expiry_hours as i64),
        security,
    )?;
    Ok(TokenPair { access, refresh })
}

pub fn generate_access_token(account: &Account, security: &SecurityConfig) -> Result<String, JwtError> {
    generate_token(
        account,
        TOKEN_TYPE_ACCESS,
        Duration::minutes(security.access_token_expiry_mins as i64),
        security,
    )
}

fn generate_token(
    account: &Account,
    token_type: &str,
    lifetime: Duration,
    security: &SecurityConfig,
) -> Result<String, JwtError> {
    let claims = Claims::new(account, token_type, lifetime);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a token's signature and expiry, and require the expected type so
/// a refresh token cannot be replayed as an access token (or vice versa).
pub fn decode_token(token: &str, secret: &str, expected_type: &'static str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    if token_data.claims.token_type != expected_type {
        return Err(JwtError::WrongTokenType { expected: expected_type });
    }

    Ok(token_data.claims)
}
