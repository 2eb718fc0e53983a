//! Truck management routes (admin only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AdminUser;
use crate::routes::{error_json, write_error_response};
use crate::services::shipment::TruckStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TruckResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plate_number: String,
    pub truck_type: String,
    pub capacity_kg: f64,
    pub status: String,
}

type TruckRow = (Uuid, Uuid, String, String, f64, String);

fn to_response(row: TruckRow) -> TruckResponse {
    let (id, owner_id, plate_number, truck_type, capacity_kg, status) = row;
    TruckResponse { id, owner_id, plate_number, truck_type, capacity_kg, status }
}

fn db_error(err: &sqlx::Error) -> Response {
    tracing::error!(error = %err, "truck query failed");
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
}

fn not_found() -> Response {
    error_json(StatusCode::NOT_FOUND, "NOT_FOUND", "truck not found")
}

const SELECT_TRUCK: &str = "SELECT id, owner_id, plate_number, truck_type, capacity_kg, status FROM trucks";

async fn fetch_truck(state: &AppState, truck_id: Uuid) -> Result<Json<TruckResponse>, Response> {
    let row = sqlx::query_as::<_, TruckRow>(&format!("{SELECT_TRUCK} WHERE id = $1"))
        .bind(truck_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(not_found)?;
    Ok(Json(to_response(row)))
}

/// `GET /api/trucks` — list trucks, newest first.
pub async fn list_trucks(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<TruckResponse>>, Response> {
    let rows = sqlx::query_as::<_, TruckRow>(&format!("{SELECT_TRUCK} ORDER BY created_at DESC"))
        .fetch_all(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

#[derive(Deserialize)]
pub struct CreateTruckBody {
    pub owner_id: Uuid,
    pub plate_number: String,
    pub truck_type: String,
    pub capacity_kg: f64,
    pub status: Option<String>,
}

/// `POST /api/trucks` — register a truck for an owner.
pub async fn create_truck(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateTruckBody>,
) -> Result<(StatusCode, Json<TruckResponse>), Response> {
    let status = match body.status.as_deref() {
        Some(raw) => TruckStatus::from_str(raw)
            .ok_or_else(|| error_json(StatusCode::BAD_REQUEST, "VALIDATION", "unknown truck status"))?,
        None => TruckStatus::Available,
    };
    if body.plate_number.trim().is_empty() {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "plate_number is required"));
    }
    if body.capacity_kg <= 0.0 {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "capacity_kg must be positive"));
    }

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO trucks (owner_id, plate_number, truck_type, capacity_kg, status)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(body.owner_id)
    .bind(body.plate_number.trim())
    .bind(&body.truck_type)
    .bind(body.capacity_kg)
    .bind(status.as_str())
    .fetch_one(&state.pool)
    .await
    .map_err(|e| write_error_response(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(TruckResponse {
            id,
            owner_id: body.owner_id,
            plate_number: body.plate_number.trim().to_owned(),
            truck_type: body.truck_type,
            capacity_kg: body.capacity_kg,
            status: status.as_str().to_owned(),
        }),
    ))
}

/// `GET /api/trucks/:id` — fetch one truck.
pub async fn get_truck(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(truck_id): Path<Uuid>,
) -> Result<Json<TruckResponse>, Response> {
    fetch_truck(&state, truck_id).await
}

#[derive(Deserialize)]
pub struct UpdateTruckBody {
    pub plate_number: Option<String>,
    pub truck_type: Option<String>,
    pub capacity_kg: Option<f64>,
}

/// `PATCH /api/trucks/:id` — update truck metadata.
pub async fn update_truck(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(truck_id): Path<Uuid>,
    Json(body): Json<UpdateTruckBody>,
) -> Result<Json<TruckResponse>, Response> {
    // Validate the whole body up front; nothing may be written once any
    // field turns out invalid.
    if let Some(plate) = body.plate_number.as_deref()
        && plate.trim().is_empty()
    {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "plate_number cannot be empty"));
    }
    if let Some(capacity_kg) = body.capacity_kg
        && capacity_kg <= 0.0
    {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "capacity_kg must be positive"));
    }

    if let Some(plate) = body.plate_number.as_deref() {
        sqlx::query("UPDATE trucks SET plate_number = $2 WHERE id = $1")
            .bind(truck_id)
            .bind(plate.trim())
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(truck_type) = body.truck_type.as_deref() {
        sqlx::query("UPDATE trucks SET truck_type = $2 WHERE id = $1")
            .bind(truck_id)
            .bind(truck_type)
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(capacity_kg) = body.capacity_kg {
        sqlx::query("UPDATE trucks SET capacity_kg = $2 WHERE id = $1")
            .bind(truck_id)
            .bind(capacity_kg)
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }

    fetch_truck(&state, truck_id).await
}

#[derive(Deserialize)]
pub struct UpdateTruckStatusBody {
    pub status: String,
}

/// `PATCH /api/trucks/:id/status` — set truck availability.
pub async fn update_truck_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(truck_id): Path<Uuid>,
    Json(body): Json<UpdateTruckStatusBody>,
) -> Result<Json<TruckResponse>, Response> {
    let status = TruckStatus::from_str(&body.status)
        .ok_or_else(|| error_json(StatusCode::BAD_REQUEST, "VALIDATION", "unknown truck status"))?;

    let result = sqlx::query("UPDATE trucks SET status = $2 WHERE id = $1")
        .bind(truck_id)
        .bind(status.as_str())
        .execute(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    fetch_truck(&state, truck_id).await
}

/// `DELETE /api/trucks/:id` — remove a truck.
pub async fn delete_truck(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(truck_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Response> {
    let result = sqlx::query("DELETE FROM trucks WHERE id = $1")
        .bind(truck_id)
        .execute(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "trucks_test.rs"]
mod tests;
