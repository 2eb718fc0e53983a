//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the auth endpoints and the admin CRUD surface under a single Axum
//! router. The CSRF guard wraps every route: mutating requests are validated
//! against the session-bound token and every response is stamped with the
//! current one.

pub mod applications;
pub mod auth;
pub mod shipments;
pub mod trucks;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::csrf;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/csrf-token", get(auth::csrf_token))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/trucks", get(trucks::list_trucks).post(trucks::create_truck))
        .route(
            "/api/trucks/{id}",
            get(trucks::get_truck)
                .patch(trucks::update_truck)
                .delete(trucks::delete_truck),
        )
        .route("/api/trucks/{id}/status", patch(trucks::update_truck_status))
        .route(
            "/api/shipments",
            get(shipments::list_shipments).post(shipments::create_shipment),
        )
        .route(
            "/api/shipments/{id}",
            get(shipments::get_shipment)
                .patch(shipments::update_shipment)
                .delete(shipments::delete_shipment),
        )
        .route("/api/shipments/{id}/status", patch(shipments::update_shipment_status))
        .route(
            "/api/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/api/applications/{id}",
            get(applications::get_application).delete(applications::delete_application),
        )
        .route(
            "/api/applications/{id}/status",
            patch(applications::update_application_status),
        )
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), csrf::guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// SHARED ERROR HELPERS
// =============================================================================

/// JSON error body with a machine-readable code, so clients can tell
/// anti-forgery rejections apart from authorization failures.
pub(crate) fn error_json(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": code, "message": message }))).into_response()
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}

/// Map an insert/update error to a response: duplicates conflict, broken
/// references are caller errors, anything else is internal.
pub(crate) fn write_error_response(err: &sqlx::Error) -> Response {
    if is_unique_violation(err) {
        return error_json(StatusCode::CONFLICT, "CONFLICT", "duplicate value");
    }
    if is_foreign_key_violation(err) {
        return error_json(StatusCode::BAD_REQUEST, "VALIDATION", "referenced row does not exist");
    }
    tracing::error!(error = %err, "database write failed");
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
}
