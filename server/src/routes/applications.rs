//! Shipment application (bid) routes (admin only).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AdminUser;
use crate::routes::{error_json, write_error_response};
use crate::services::shipment::{self, ApplicationStatus, ShipmentError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub truck_id: Uuid,
    pub bid_amount: f64,
    pub status: String,
}

type ApplicationRow = (Uuid, Uuid, Uuid, f64, String);

fn to_response(row: ApplicationRow) -> ApplicationResponse {
    let (id, shipment_id, truck_id, bid_amount, status) = row;
    ApplicationResponse { id, shipment_id, truck_id, bid_amount, status }
}

fn db_error(err: &sqlx::Error) -> Response {
    tracing::error!(error = %err, "application query failed");
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
}

fn not_found() -> Response {
    error_json(StatusCode::NOT_FOUND, "NOT_FOUND", "application not found")
}

pub(crate) fn shipment_error_response(err: &ShipmentError) -> Response {
    match err {
        ShipmentError::NotFound(what) => error_json(StatusCode::NOT_FOUND, "NOT_FOUND", what),
        ShipmentError::Conflict(why) => error_json(StatusCode::CONFLICT, "CONFLICT", why),
        ShipmentError::Database(e) => {
            tracing::error!(error = %e, "application transaction failed");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
        }
    }
}

const SELECT_APPLICATION: &str =
    "SELECT id, shipment_id, truck_id, bid_amount, status FROM shipment_applications";

async fn fetch_application(state: &AppState, application_id: Uuid) -> Result<Json<ApplicationResponse>, Response> {
    let row = sqlx::query_as::<_, ApplicationRow>(&format!("{SELECT_APPLICATION} WHERE id = $1"))
        .bind(application_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(not_found)?;
    Ok(Json(to_response(row)))
}

#[derive(Deserialize)]
pub struct ListApplicationsQuery {
    pub shipment_id: Option<Uuid>,
}

/// `GET /api/applications?shipment_id=` — list bids, optionally per shipment.
pub async fn list_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<Vec<ApplicationResponse>>, Response> {
    let rows = match query.shipment_id {
        Some(shipment_id) => {
            sqlx::query_as::<_, ApplicationRow>(&format!(
                "{SELECT_APPLICATION} WHERE shipment_id = $1 ORDER BY created_at DESC"
            ))
            .bind(shipment_id)
            .fetch_all(&state.pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ApplicationRow>(&format!("{SELECT_APPLICATION} ORDER BY created_at DESC"))
                .fetch_all(&state.pool)
                .await
        }
    }
    .map_err(|e| db_error(&e))?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

#[derive(Deserialize)]
pub struct CreateApplicationBody {
    pub shipment_id: Uuid,
    pub truck_id: Uuid,
    pub bid_amount: f64,
}

/// `POST /api/applications` — file a bid on behalf of a truck.
pub async fn create_application(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateApplicationBody>,
) -> Result<(StatusCode, Json<ApplicationResponse>), Response> {
    if body.bid_amount <= 0.0 {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "bid_amount must be positive"));
    }

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO shipment_applications (shipment_id, truck_id, bid_amount) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(body.shipment_id)
    .bind(body.truck_id)
    .bind(body.bid_amount)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| write_error_response(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            id,
            shipment_id: body.shipment_id,
            truck_id: body.truck_id,
            bid_amount: body.bid_amount,
            status: ApplicationStatus::Pending.as_str().to_owned(),
        }),
    ))
}

/// `GET /api/applications/:id` — fetch one bid.
pub async fn get_application(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, Response> {
    fetch_application(&state, application_id).await
}

#[derive(Deserialize)]
pub struct UpdateApplicationStatusBody {
    pub status: String,
}

/// `PATCH /api/applications/:id/status` — decide a bid.
///
/// Accepting runs the atomic assignment transaction; rejecting flips a
/// still-pending bid only. Reverting to Pending is not supported.
pub async fn update_application_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(application_id): Path<Uuid>,
    Json(body): Json<UpdateApplicationStatusBody>,
) -> Result<Json<ApplicationResponse>, Response> {
    let status = ApplicationStatus::from_str(&body.status)
        .ok_or_else(|| error_json(StatusCode::BAD_REQUEST, "VALIDATION", "unknown application status"))?;

    match status {
        ApplicationStatus::Pending => {
            return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "cannot revert a bid to Pending"));
        }
        ApplicationStatus::Accepted => {
            shipment::accept_application(&state.pool, application_id)
                .await
                .map_err(|e| shipment_error_response(&e))?;
        }
        ApplicationStatus::Rejected => {
            let result = sqlx::query(
                "UPDATE shipment_applications SET status = $2 WHERE id = $1 AND status = $3",
            )
            .bind(application_id)
            .bind(ApplicationStatus::Rejected.as_str())
            .bind(ApplicationStatus::Pending.as_str())
            .execute(&state.pool)
            .await
            .map_err(|e| db_error(&e))?;

            if result.rows_affected() == 0 {
                // Distinguish a missing bid from one already decided.
                fetch_application(&state, application_id).await?;
                return Err(error_json(StatusCode::CONFLICT, "CONFLICT", "application already decided"));
            }
        }
    }

    fetch_application(&state, application_id).await
}

/// `DELETE /api/applications/:id` — withdraw a bid.
pub async fn delete_application(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Response> {
    let result = sqlx::query("DELETE FROM shipment_applications WHERE id = $1")
        .bind(application_id)
        .execute(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "applications_test.rs"]
mod tests;
