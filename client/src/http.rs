//! HTTP request pipeline.
//!
//! ARCHITECTURE
//! ============
//! Every call to the API goes through [`ApiClient::request`]:
//!
//! 1. The bearer token is attached when the session holds one; mutating
//!    requests additionally carry the cached CSRF token.
//! 2. The `X-CSRF-Token` header of every response — success or failure —
//!    replaces the cached token, so the client tracks server-side rotation
//!    for free.
//! 3. A 401 from any endpoint tears the whole session down before the error
//!    is surfaced. There is no recovery path from a dead bearer token.
//! 4. A CSRF rejection (403 with the `EBADCSRFTOKEN` code) triggers exactly
//!    one refetch-and-retry via [`execute_with_retry`]. A second rejection
//!    surfaces to the caller.

use std::future::Future;
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::Session;
use crate::types::ApiErrorBody;

pub const CSRF_HEADER: &str = "x-csrf-token";
pub const CSRF_ERROR_CODE: &str = "EBADCSRFTOKEN";

/// One initial attempt plus one retry after a CSRF refetch.
pub const MAX_ATTEMPTS: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session expired or invalid")]
    Unauthorized,
    #[error("{code}: {message}")]
    Server { status: u16, code: String, message: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The retry predicate: only a CSRF-coded 403 is worth one more attempt.
/// A plain 403 means the role gate fired and retrying cannot help.
#[must_use]
pub fn is_csrf_rejection(err: &ApiError) -> bool {
    matches!(err, ApiError::Server { status: 403, code, .. } if code == CSRF_ERROR_CODE)
}

// =============================================================================
// RETRY
// =============================================================================

/// Run `op`, retrying after `refresh` while `should_retry` approves and
/// attempts remain. With [`MAX_ATTEMPTS`] = 2 this is the
/// fail-refetch-replay loop, bounded to a single retry.
///
/// # Errors
///
/// The final attempt's error, or the refresh error if refreshing fails.
pub async fn execute_with_retry<T, F, Fut, P, R, RFut>(
    mut op: F,
    max_attempts: u32,
    mut should_retry: P,
    mut refresh: R,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    P: FnMut(&ApiError) -> bool,
    R: FnMut() -> RFut,
    RFut: Future<Output = Result<(), ApiError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && should_retry(&err) => {
                tracing::debug!(attempt, error = %err, "retrying after refresh");
                refresh().await?;
            }
            Err(err) => return Err(err),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Arc<Session>,
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

impl ApiClient {
    /// Build a client against `base_url` (no trailing slash needed).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying client cannot be built.
    pub fn new(base_url: &str, session: Arc<Session>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').into(), session })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mutating = is_mutating(&method);
        let mut builder = self.http.request(method, url);

        if let Some(token) = self.session.bearer() {
            builder = builder.bearer_auth(token);
        }
        if mutating && let Some(csrf) = self.session.csrf() {
            builder = builder.header(CSRF_HEADER, csrf);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    /// One attempt: send, absorb the rotated CSRF token, map the status.
    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self.build_request(method, path, body).send().await?;

        if let Some(token) = response
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            self.session.set_csrf(token);
        }

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // The bearer token is dead; no request outcome can salvage it.
            self.session.clear();
            return Err(ApiError::Unauthorized);
        }

        let bytes = response.bytes().await?;
        if status.is_success() {
            if bytes.is_empty() {
                return Ok(serde_json::Value::Null);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_else(|_| ApiErrorBody {
            error: "UNKNOWN".to_owned(),
            message: String::from_utf8_lossy(&bytes).into_owned(),
        });
        Err(ApiError::Server { status: status.as_u16(), code: body.error, message: body.message })
    }

    /// Fetch a fresh CSRF token; `send_once` caches it from the header.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and 401 teardown.
    pub async fn fetch_csrf(&self) -> Result<(), ApiError> {
        self.send_once(Method::GET, "/api/auth/csrf-token", None)
            .await
            .map(|_| ())
    }

    /// Proactively warm the CSRF cache. Best-effort: a failure here only
    /// means the first mutation pays the refetch-and-retry round trip.
    pub async fn ensure_csrf(&self) {
        if self.session.csrf().is_some() {
            return;
        }
        if let Err(e) = self.fetch_csrf().await {
            tracing::debug!(error = %e, "csrf prefetch failed");
        }
    }

    /// Send a request through the full pipeline, with the single CSRF retry.
    ///
    /// # Errors
    ///
    /// `Unauthorized` after a 401 teardown, `Server` for other API errors,
    /// `Http`/`Decode` for transport and parse failures.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let op_client = self.clone();
        let op_path = path.to_owned();
        let refresh_client = self.clone();

        execute_with_retry(
            move || {
                let client = op_client.clone();
                let method = method.clone();
                let path = op_path.clone();
                let body = body.clone();
                async move { client.send_once(method, &path, body.as_ref()).await }
            },
            MAX_ATTEMPTS,
            is_csrf_rejection,
            move || {
                let client = refresh_client.clone();
                async move { client.fetch_csrf().await }
            },
        )
        .await
    }

    // ===== typed wrappers =====

    /// GET a path and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let value = self.request(method, path, Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// DELETE a path, discarding the response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, path, None).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
