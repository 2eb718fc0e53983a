//! Shipment management routes (admin only).
//!
//! Status updates validate against the closed status set but do not enforce
//! a transition graph; any known status can be patched onto any shipment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AdminUser;
use crate::routes::{error_json, write_error_response};
use crate::services::shipment::ShipmentStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo: String,
    pub weight_kg: f64,
    pub price: f64,
    pub status: String,
    pub truck_id: Option<Uuid>,
}

type ShipmentRow = (Uuid, Uuid, String, String, String, f64, f64, String, Option<Uuid>);

fn to_response(row: ShipmentRow) -> ShipmentResponse {
    let (id, merchant_id, origin, destination, cargo, weight_kg, price, status, truck_id) = row;
    ShipmentResponse { id, merchant_id, origin, destination, cargo, weight_kg, price, status, truck_id }
}

fn db_error(err: &sqlx::Error) -> Response {
    tracing::error!(error = %err, "shipment query failed");
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
}

fn not_found() -> Response {
    error_json(StatusCode::NOT_FOUND, "NOT_FOUND", "shipment not found")
}

const SELECT_SHIPMENT: &str =
    "SELECT id, merchant_id, origin, destination, cargo, weight_kg, price, status, truck_id FROM shipments";

async fn fetch_shipment(state: &AppState, shipment_id: Uuid) -> Result<Json<ShipmentResponse>, Response> {
    let row = sqlx::query_as::<_, ShipmentRow>(&format!("{SELECT_SHIPMENT} WHERE id = $1"))
        .bind(shipment_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(not_found)?;
    Ok(Json(to_response(row)))
}

/// `GET /api/shipments` — list shipments, newest first.
pub async fn list_shipments(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ShipmentResponse>>, Response> {
    let rows = sqlx::query_as::<_, ShipmentRow>(&format!("{SELECT_SHIPMENT} ORDER BY created_at DESC"))
        .fetch_all(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

#[derive(Deserialize)]
pub struct CreateShipmentBody {
    pub merchant_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo: String,
    pub weight_kg: f64,
    pub price: f64,
}

/// `POST /api/shipments` — create a shipment request for a merchant.
pub async fn create_shipment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateShipmentBody>,
) -> Result<(StatusCode, Json<ShipmentResponse>), Response> {
    if body.origin.trim().is_empty() || body.destination.trim().is_empty() {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "origin and destination are required"));
    }
    if body.weight_kg <= 0.0 {
        return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "weight_kg must be positive"));
    }

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO shipments (merchant_id, origin, destination, cargo, weight_kg, price)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(body.merchant_id)
    .bind(body.origin.trim())
    .bind(body.destination.trim())
    .bind(&body.cargo)
    .bind(body.weight_kg)
    .bind(body.price)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| write_error_response(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(ShipmentResponse {
            id,
            merchant_id: body.merchant_id,
            origin: body.origin.trim().to_owned(),
            destination: body.destination.trim().to_owned(),
            cargo: body.cargo,
            weight_kg: body.weight_kg,
            price: body.price,
            status: ShipmentStatus::Pending.as_str().to_owned(),
            truck_id: None,
        }),
    ))
}

/// `GET /api/shipments/:id` — fetch one shipment.
pub async fn get_shipment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(shipment_id): Path<Uuid>,
) -> Result<Json<ShipmentResponse>, Response> {
    fetch_shipment(&state, shipment_id).await
}

#[derive(Deserialize)]
pub struct UpdateShipmentBody {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub cargo: Option<String>,
    pub weight_kg: Option<f64>,
    pub price: Option<f64>,
}

/// `PATCH /api/shipments/:id` — update shipment details.
pub async fn update_shipment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(shipment_id): Path<Uuid>,
    Json(body): Json<UpdateShipmentBody>,
) -> Result<Json<ShipmentResponse>, Response> {
    if let Some(origin) = body.origin.as_deref() {
        if origin.trim().is_empty() {
            return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "origin cannot be empty"));
        }
        sqlx::query("UPDATE shipments SET origin = $2 WHERE id = $1")
            .bind(shipment_id)
            .bind(origin.trim())
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(destination) = body.destination.as_deref() {
        if destination.trim().is_empty() {
            return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "destination cannot be empty"));
        }
        sqlx::query("UPDATE shipments SET destination = $2 WHERE id = $1")
            .bind(shipment_id)
            .bind(destination.trim())
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(cargo) = body.cargo.as_deref() {
        sqlx::query("UPDATE shipments SET cargo = $2 WHERE id = $1")
            .bind(shipment_id)
            .bind(cargo)
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(weight_kg) = body.weight_kg {
        if weight_kg <= 0.0 {
            return Err(error_json(StatusCode::BAD_REQUEST, "VALIDATION", "weight_kg must be positive"));
        }
        sqlx::query("UPDATE shipments SET weight_kg = $2 WHERE id = $1")
            .bind(shipment_id)
            .bind(weight_kg)
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(price) = body.price {
        sqlx::query("UPDATE shipments SET price = $2 WHERE id = $1")
            .bind(shipment_id)
            .bind(price)
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }

    fetch_shipment(&state, shipment_id).await
}

#[derive(Deserialize)]
pub struct UpdateShipmentStatusBody {
    pub status: String,
}

/// `PATCH /api/shipments/:id/status` — set the workflow status.
pub async fn update_shipment_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(shipment_id): Path<Uuid>,
    Json(body): Json<UpdateShipmentStatusBody>,
) -> Result<Json<ShipmentResponse>, Response> {
    let status = ShipmentStatus::from_str(&body.status)
        .ok_or_else(|| error_json(StatusCode::BAD_REQUEST, "VALIDATION", "unknown shipment status"))?;

    let result = sqlx::query("UPDATE shipments SET status = $2 WHERE id = $1")
        .bind(shipment_id)
        .bind(status.as_str())
        .execute(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    fetch_shipment(&state, shipment_id).await
}

/// `DELETE /api/shipments/:id` — delete a shipment (cascades to bids).
pub async fn delete_shipment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(shipment_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Response> {
    let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
        .bind(shipment_id)
        .execute(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "shipments_test.rs"]
mod tests;
