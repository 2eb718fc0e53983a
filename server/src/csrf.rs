//! Anti-forgery (CSRF) token store and middleware.
//!
//! ARCHITECTURE
//! ============
//! Tokens are bound to a cookie-backed CSRF session, independent of the
//! bearer token. Every response carries the session's current token in the
//! `X-CSRF-Token` header so clients can cache the latest value; every
//! mutating request must echo it back. Tokens rotate on expiry, so a client
//! holding a stale value gets exactly one `EBADCSRFTOKEN` rejection, refetches,
//! and replays.
//!
//! TRADE-OFFS
//! ==========
//! The store is in-memory and per-process. A restart invalidates all tokens,
//! which costs each client one refetch-and-retry round trip — acceptable for
//! an admin surface, and it keeps the hot path off the database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;

use crate::services::auth::bytes_to_hex;
use crate::state::AppState;

pub const CSRF_HEADER: &str = "x-csrf-token";
pub const SESSION_COOKIE: &str = "csrf_session";
pub const CSRF_ERROR_CODE: &str = "EBADCSRFTOKEN";

const DEFAULT_TOKEN_TTL_SECS: u64 = 7200;

#[derive(Debug, thiserror::Error)]
pub enum CsrfError {
    #[error("missing csrf token")]
    Missing,
    #[error("invalid or expired csrf token")]
    Rejected,
}

// =============================================================================
// STORE
// =============================================================================

struct CsrfEntry {
    token: String,
    expires_at: Instant,
}

/// Session-bound token store: csrf session id -> current token + expiry.
#[derive(Clone)]
pub struct CsrfStore {
    inner: Arc<Mutex<HashMap<String, CsrfEntry>>>,
    ttl: Duration,
}

impl CsrfStore {
    #[must_use]
    pub fn new() -> Self {
        let ttl_secs = std::env::var("CSRF_TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        Self { inner: Arc::new(Mutex::new(HashMap::new())), ttl: Duration::from_secs(ttl_secs) }
    }

    /// Return the session's current token, generating or rotating as needed.
    pub fn issue(&self, session_id: &str) -> String {
        self.issue_at(session_id, Instant::now())
    }

    fn issue_at(&self, session_id: &str, now: Instant) -> String {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        prune(&mut inner, now);

        if let Some(entry) = inner.get(session_id)
            && entry.expires_at > now
        {
            return entry.token.clone();
        }

        let token = generate_csrf_token();
        inner.insert(
            session_id.to_owned(),
            CsrfEntry { token: token.clone(), expires_at: now + self.ttl },
        );
        token
    }

    /// Check a submitted token against the session-bound value.
    ///
    /// # Errors
    ///
    /// `Missing` when no token was submitted; `Rejected` when the session has
    /// no live token or the submitted value does not match.
    pub fn validate(&self, session_id: &str, submitted: Option<&str>) -> Result<(), CsrfError> {
        self.validate_at(session_id, submitted, Instant::now())
    }

    fn validate_at(&self, session_id: &str, submitted: Option<&str>, now: Instant) -> Result<(), CsrfError> {
        let submitted = match submitted {
            Some(value) if !value.is_empty() => value,
            _ => return Err(CsrfError::Missing),
        };

        let inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = inner.get(session_id).ok_or(CsrfError::Rejected)?;
        if entry.expires_at <= now || entry.token != submitted {
            return Err(CsrfError::Rejected);
        }
        Ok(())
    }
}

impl Default for CsrfStore {
    fn default() -> Self {
        Self::new()
    }
}

fn prune(map: &mut HashMap<String, CsrfEntry>, now: Instant) {
    map.retain(|_, entry| entry.expires_at > now);
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_csrf_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn generate_session_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

pub(crate) fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

pub(crate) fn rejection_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({
            "error": CSRF_ERROR_CODE,
            "message": "Invalid or expired CSRF token",
        })),
    )
        .into_response()
}

/// Validate mutating requests and stamp every response with the session's
/// current token.
pub async fn guard(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let (session_id, is_new_session) = match jar.get(SESSION_COOKIE).map(Cookie::value) {
        Some(sid) if !sid.is_empty() => (sid.to_owned(), false),
        _ => (generate_session_id(), true),
    };

    if is_mutating(request.method()) {
        let submitted = request
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok());
        if let Err(e) = state.csrf.validate(&session_id, submitted) {
            tracing::debug!(error = %e, "csrf validation failed");
            let mut response = rejection_response();
            stamp_response(&mut response, &state, &session_id, is_new_session);
            return response;
        }
    }

    let mut response = next.run(request).await;
    stamp_response(&mut response, &state, &session_id, is_new_session);
    response
}

fn stamp_response(response: &mut Response, state: &AppState, session_id: &str, is_new_session: bool) {
    let token = state.csrf.issue(session_id);
    if let Ok(value) = HeaderValue::from_str(&token) {
        response.headers_mut().insert(CSRF_HEADER, value);
    }

    if is_new_session {
        let cookie = Cookie::build((SESSION_COOKIE, session_id.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
}

#[cfg(test)]
#[path = "csrf_test.rs"]
mod tests;
