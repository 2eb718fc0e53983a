//! Auth state machine and the admin role gate.
//!
//! DESIGN
//! ======
//! Auth state is three-valued: the app starts in `Initializing` and resolves
//! to exactly one of `Authenticated` or `Unauthenticated` once the stored
//! token has been checked. Callers gate on the resolved phases and render a
//! holding state for `Initializing`, so a stale token never flashes an
//! authenticated view before the server confirms it.
//!
//! The role gate lives in exactly one place: [`AuthContext::login`] refuses
//! to store a token for a non-admin principal, and [`AuthContext::initialize`]
//! applies the same check to resumed sessions.

use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Method;
use serde::Deserialize;

use crate::http::{ApiClient, ApiError};
use crate::types::{LoginResponse, User, UserEnvelope};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("admin role required")]
    NotAdmin,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub enum AuthPhase {
    /// Startup: a stored token may exist but has not been verified yet.
    Initializing,
    Authenticated(User),
    Unauthenticated,
}

impl AuthPhase {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

pub struct AuthContext {
    client: ApiClient,
    phase: Mutex<AuthPhase>,
}

impl AuthContext {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, phase: Mutex::new(AuthPhase::Initializing) }
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.phase
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn set_phase(&self, phase: AuthPhase) {
        *self
            .phase
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = phase;
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        match self.phase() {
            AuthPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Resolve startup state: verify any stored token against the server
    /// and land in `Authenticated` or `Unauthenticated`.
    pub async fn initialize(&self) {
        let Some(token) = self.client.session().bearer() else {
            self.set_phase(AuthPhase::Unauthenticated);
            return;
        };

        // A token past its embedded expiry is dead; skip the round trip.
        if is_expired(&token, now_secs()) {
            self.client.session().clear();
            self.set_phase(AuthPhase::Unauthenticated);
            return;
        }

        self.client.ensure_csrf().await;

        match self.client.get_json::<UserEnvelope>("/api/auth/me").await {
            Ok(envelope) if envelope.data.user.role.is_admin() => {
                self.set_phase(AuthPhase::Authenticated(envelope.data.user));
            }
            Ok(_) => {
                // Role changed out from under a stored admin token.
                self.client.session().clear();
                self.set_phase(AuthPhase::Unauthenticated);
            }
            Err(e) => {
                // Any resume failure lands logged-out with no token left
                // behind; a 401 already cleared via the pipeline, and a
                // transport error must not keep a token we cannot verify.
                tracing::debug!(error = %e, "session resume failed");
                self.client.session().clear();
                self.set_phase(AuthPhase::Unauthenticated);
            }
        }
    }

    /// Log in and store the session — admins only.
    ///
    /// A valid non-admin credential authenticates at the API but is refused
    /// here: the token is never stored and the phase stays unauthenticated.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for a rejected login, `NotAdmin` for a valid
    /// non-admin login, `Api` for everything else.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self
            .client
            .request(Method::POST, "/api/auth/login", Some(body))
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized => AuthError::InvalidCredentials,
                other => AuthError::Api(other),
            })?;
        let response: LoginResponse = serde_json::from_value(value).map_err(ApiError::from)?;

        if !response.data.user.role.is_admin() {
            self.set_phase(AuthPhase::Unauthenticated);
            return Err(AuthError::NotAdmin);
        }

        self.client.session().set_bearer(&response.token);
        self.set_phase(AuthPhase::Authenticated(response.data.user.clone()));
        Ok(response.data.user)
    }

    /// Tear the session down. The server call is best-effort; local state is
    /// cleared regardless of its outcome.
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .request(Method::POST, "/api/auth/logout", None)
            .await
        {
            tracing::debug!(error = %e, "logout call failed");
        }
        self.client.session().clear();
        self.set_phase(AuthPhase::Unauthenticated);
    }
}

// =============================================================================
// TOKEN INSPECTION
// =============================================================================

#[derive(Deserialize)]
struct ExpClaim {
    exp: i64,
}

/// Read the expiry (epoch seconds) out of a JWT without verifying it.
/// Verification is the server's job; the client only needs the timestamp
/// to skip a round trip for obviously dead tokens.
#[must_use]
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claim: ExpClaim = serde_json::from_slice(&bytes).ok()?;
    Some(claim.exp)
}

/// A token whose expiry cannot be read is treated as expired.
pub(crate) fn is_expired(token: &str, now: i64) -> bool {
    token_expiry(token).is_none_or(|exp| exp <= now)
}

pub(crate) fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_secs()).unwrap_or(0)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
