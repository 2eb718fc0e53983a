//! Shipment workflow service — status sets and the accept-bid transaction.
//!
//! Statuses are closed enums validated at the API boundary; there is no
//! enforced transition graph between shipment states. Accepting an
//! application is the one multi-entity state change and runs in a single
//! database transaction.

use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ShipmentError {
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// STATUS SETS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentStatus {
    Pending,
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::InTransit => "InTransit",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "Assigned" => Some(Self::Assigned),
            "InTransit" => Some(Self::InTransit),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruckStatus {
    Available,
    OnTrip,
    Maintenance,
}

impl TruckStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OnTrip => "OnTrip",
            Self::Maintenance => "Maintenance",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Available" => Some(Self::Available),
            "OnTrip" => Some(Self::OnTrip),
            "Maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "Accepted" => Some(Self::Accepted),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

// =============================================================================
// ACCEPT TRANSACTION
// =============================================================================

/// Accept one application: mark it Accepted, reject every other pending bid
/// on the shipment, assign the truck, and move the shipment to Assigned.
/// Atomic — either the whole assignment lands or none of it does.
///
/// # Errors
///
/// `NotFound` for an unknown application, `Conflict` when the shipment is no
/// longer Pending or the bid itself was already decided.
pub async fn accept_application(pool: &PgPool, application_id: Uuid) -> Result<(), ShipmentError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r"SELECT a.shipment_id, a.truck_id, a.status AS app_status, s.status AS shipment_status
          FROM shipment_applications a
          JOIN shipments s ON s.id = a.shipment_id
          WHERE a.id = $1
          FOR UPDATE",
    )
    .bind(application_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ShipmentError::NotFound("application"))?;

    let shipment_id: Uuid = row.get("shipment_id");
    let truck_id: Uuid = row.get("truck_id");
    let app_status: String = row.get("app_status");
    let shipment_status: String = row.get("shipment_status");

    if ApplicationStatus::from_str(&app_status) != Some(ApplicationStatus::Pending) {
        return Err(ShipmentError::Conflict("application already decided"));
    }
    if ShipmentStatus::from_str(&shipment_status) != Some(ShipmentStatus::Pending) {
        return Err(ShipmentError::Conflict("shipment is not open for assignment"));
    }

    sqlx::query("UPDATE shipment_applications SET status = $2 WHERE id = $1")
        .bind(application_id)
        .bind(ApplicationStatus::Accepted.as_str())
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "UPDATE shipment_applications SET status = $3 WHERE shipment_id = $1 AND id <> $2 AND status = $4",
    )
    .bind(shipment_id)
    .bind(application_id)
    .bind(ApplicationStatus::Rejected.as_str())
    .bind(ApplicationStatus::Pending.as_str())
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE shipments SET status = $2, truck_id = $3 WHERE id = $1")
        .bind(shipment_id)
        .bind(ShipmentStatus::Assigned.as_str())
        .bind(truck_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
#[path = "shipment_test.rs"]
mod tests;
