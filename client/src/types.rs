//! Wire types shared across the client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed role set mirrored from the server. Unknown role strings fail
/// deserialization rather than mapping onto a catch-all variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Merchant,
    TruckOwner,
    Driver,
}

impl Role {
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Merchant => "Merchant",
            Self::TruckOwner => "TruckOwner",
            Self::Driver => "Driver",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(Self::Admin),
            "Merchant" => Some(Self::Merchant),
            "TruckOwner" => Some(Self::TruckOwner),
            "Driver" => Some(Self::Driver),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
}

/// `POST /api/auth/login` response: token plus the user nested under `data`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub data: UserData,
}

/// `GET /api/auth/me` response.
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub data: UserData,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub user: User,
}

/// Error body shape shared by every non-2xx API response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// RESOURCES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plate_number: String,
    pub truck_type: String,
    pub capacity_kg: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentApplication {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub truck_id: Uuid,
    pub bid_amount: f64,
    pub status: String,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTruck {
    pub owner_id: Uuid,
    pub plate_number: String,
    pub truck_type: String,
    pub capacity_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateTruck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_kg: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateShipment {
    pub merchant_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo: String,
    pub weight_kg: f64,
    pub price: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateShipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateApplication {
    pub shipment_id: Uuid,
    pub truck_id: Uuid,
    pub bid_amount: f64,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
