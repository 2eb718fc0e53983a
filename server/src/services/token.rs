//! Bearer token service.
//!
//! ARCHITECTURE
//! ============
//! Sessions are stateless signed tokens (HS256) carrying the subject, role,
//! and expiry. Validation checks only the signature and the embedded claims;
//! nothing is stored server-side, so logout is purely a client-side teardown.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::auth::Role;

const ISSUER: &str = "haulboard";
const DEFAULT_TTL_SECS: u64 = 86_400;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("invalid authorization header format")]
    MalformedHeader,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Claims embedded in every bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Role string, one of the closed role set.
    pub role: String,
    /// Expiration (epoch seconds).
    pub exp: i64,
    /// Issued at (epoch seconds).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_secs: u64,
}

impl TokenConfig {
    #[must_use]
    pub fn new(secret: String, ttl_secs: u64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Load TTL from `JWT_TTL_SECS`, defaulting to 24 hours.
    #[must_use]
    pub fn from_env(secret: String) -> Self {
        let ttl_secs = std::env::var("JWT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        Self { secret, ttl_secs }
    }
}

pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self { config, encoding_key, decoding_key }
    }

    /// Issue a signed bearer token for the given user and role.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, now_secs())
    }

    /// Internal: issue with an explicit clock (for testing).
    pub(crate) fn issue_at(&self, user_id: Uuid, role: Role, now: i64) -> Result<String, TokenError> {
        let ttl = i64::try_from(self.config.ttl_secs).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_owned(),
            exp: now.saturating_add(ttl),
            iat: now,
            iss: ISSUER.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// `Expired` for a valid-but-stale token, `Invalid` for anything else.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// # Errors
///
/// Returns `MalformedHeader` when the scheme prefix is missing or wrong.
pub fn extract_bearer(auth_header: &str) -> Result<&str, TokenError> {
    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(TokenError::MalformedHeader)
}

pub(crate) fn now_secs() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_secs()).unwrap_or(0)
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
