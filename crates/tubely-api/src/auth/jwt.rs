//! HS256 access tokens
//!
//! Tokens are issued with [`make_jwt`] and carry the user ID in `sub`. Validation
//! requires the `tubely-access` issuer and an unexpired `exp`, with no leeway.

use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written into and required from every access token.
pub const ISSUER: &str = "tubely-access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// User ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedCredentials,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to issue token: {0}")]
    Issue(String),
}

/// Pull the bearer token out of the `Authorization` header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MalformedCredentials)?;

    if token.is_empty() {
        return Err(AuthError::MalformedCredentials);
    }

    Ok(token)
}

/// Validate a token and return the user ID it was issued for.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidIssuer => AuthError::InvalidToken("invalid issuer".to_string()),
            _ => AuthError::InvalidToken(e.to_string()),
        }
    })?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AuthError::InvalidToken("subject is not a user ID".to_string()))
}

/// Issue an access token for `user_id` that expires after `ttl`.
pub fn make_jwt(user_id: Uuid, secret: &str, ttl: chrono::Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Issue(e.to_string()))
}

/// Resolve the principal of a request.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers)?;
    validate_jwt(token, secret)
}
