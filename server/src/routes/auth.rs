//! Auth routes — login, who-am-i, logout, CSRF token fetch.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::{StatusCode, header::AUTHORIZATION};
use axum::response::{Json, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::error_json;
use crate::services::auth::{self as auth_svc, Role, UserRecord};
use crate::services::token::{Claims, TokenError, extract_bearer};
use crate::state::AppState;

// =============================================================================
// EXTRACTORS
// =============================================================================

/// Principal resolved from the bearer token. Use as a handler parameter to
/// require authentication; validation is stateless against the token's
/// signature and embedded expiry.
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

pub(crate) fn principal_from_claims(claims: &Claims) -> Option<AuthUser> {
    let id = Uuid::parse_str(&claims.sub).ok()?;
    let role = Role::from_str(&claims.role)?;
    Some(AuthUser { id, role })
}

fn unauthorized(message: &str) -> Response {
    error_json(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
}

fn forbidden(message: &str) -> Response {
    error_json(StatusCode::FORBIDDEN, "FORBIDDEN", message)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if header.is_empty() {
            return Err(unauthorized("missing bearer token"));
        }

        let token = extract_bearer(header).map_err(|_| unauthorized("invalid authorization header"))?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.tokens.validate(token).map_err(|e| match e {
            TokenError::Expired => unauthorized("token has expired"),
            _ => unauthorized("invalid token"),
        })?;

        principal_from_claims(&claims).ok_or_else(|| unauthorized("invalid token"))
    }
}

/// Admin-only principal. Every resource route takes this; non-admin sessions
/// are rejected with a `FORBIDDEN` body distinguishable from CSRF rejections.
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(forbidden("admin role required"));
        }
        Ok(Self(user))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub(crate) fn login_body(token: &str, user: &UserRecord) -> serde_json::Value {
    serde_json::json!({ "token": token, "data": { "user": user } })
}

pub(crate) fn user_envelope(user: &UserRecord) -> serde_json::Value {
    serde_json::json!({ "data": { "user": user } })
}

/// `POST /api/auth/login` — verify credentials and issue a bearer token.
///
/// Any valid credential authenticates regardless of role; the admin gate
/// applies to the resource routes, and the client enforces its own role
/// check on top.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Result<Json<serde_json::Value>, Response> {
    let user = auth_svc::verify_credentials(&state.pool, &body.email, &body.password)
        .await
        .map_err(|e| match e {
            auth_svc::AuthError::InvalidCredentials => unauthorized("invalid email or password"),
            auth_svc::AuthError::Db(err) => {
                tracing::error!(error = %err, "credential lookup failed");
                error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
            }
        })?;

    let token = state.tokens.issue(user.id, user.role).map_err(|e| {
        tracing::error!(error = %e, "token issue failed");
        error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "failed to issue token")
    })?;

    Ok(Json(login_body(&token, &user)))
}

/// `GET /api/auth/me` — return the current user.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<serde_json::Value>, Response> {
    let user = auth_svc::load_user(&state.pool, auth.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "user lookup failed");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
        })?
        .ok_or_else(|| unauthorized("user no longer exists"))?;

    Ok(Json(user_envelope(&user)))
}

/// `POST /api/auth/logout` — bearer tokens are stateless; this exists so
/// clients have a uniform teardown call.
pub async fn logout(_auth: AuthUser) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `GET /api/auth/csrf-token` — empty 200; the CSRF middleware stamps the
/// session's current token into the `X-CSRF-Token` response header.
pub async fn csrf_token() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
