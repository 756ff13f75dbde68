// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifetime bound to a token when the caller does not pick one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the user's email, the stable identity the guard resolves.
    pub sub: String,
    /// Issued-at as Unix timestamp.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new HS256 token for `email`.
///
/// `ttl_minutes` of `None` binds `DEFAULT_TOKEN_TTL_MINUTES`.
pub fn sign_jwt(email: &str, secret: &str, ttl_minutes: Option<i64>) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as i64;

    let ttl_seconds = ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES) * 60;

    let claims = Claims {
        sub: email.to_owned(),
        iat: now as usize,
        exp: (now + ttl_seconds).max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Bad signature, malformed input and expiry all collapse into one `AuthError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Could not validate credentials".to_string()))?;

    Ok(token_data.claims)
}
