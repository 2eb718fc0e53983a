//! Typed wrappers for the admin CRUD surface.
//!
//! Thin by design: every call is one pipeline request plus a decode. Status
//! changes go through the dedicated `/status` endpoints so the server-side
//! validation of the closed status sets applies.

use reqwest::Method;
use uuid::Uuid;

use crate::http::{ApiClient, ApiError};
use crate::types::{
    CreateApplication, CreateShipment, CreateTruck, CreateUser, Shipment, ShipmentApplication,
    Truck, UpdateShipment, UpdateTruck, UpdateUser, User,
};

fn status_body(status: &str) -> serde_json::Value {
    serde_json::json!({ "status": status })
}

impl ApiClient {
    // ===== users =====

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/api/users").await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn create_user(&self, body: &CreateUser) -> Result<User, ApiError> {
        self.send_json(Method::POST, "/api/users", body).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_user(&self, id: Uuid) -> Result<User, ApiError> {
        self.get_json(&format!("/api/users/{id}")).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn update_user(&self, id: Uuid, body: &UpdateUser) -> Result<User, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/users/{id}"), body)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete_user(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/api/users/{id}")).await
    }

    // ===== trucks =====

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn list_trucks(&self) -> Result<Vec<Truck>, ApiError> {
        self.get_json("/api/trucks").await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn create_truck(&self, body: &CreateTruck) -> Result<Truck, ApiError> {
        self.send_json(Method::POST, "/api/trucks", body).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_truck(&self, id: Uuid) -> Result<Truck, ApiError> {
        self.get_json(&format!("/api/trucks/{id}")).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn update_truck(&self, id: Uuid, body: &UpdateTruck) -> Result<Truck, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/trucks/{id}"), body)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn set_truck_status(&self, id: Uuid, status: &str) -> Result<Truck, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/trucks/{id}/status"), &status_body(status))
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete_truck(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/api/trucks/{id}")).await
    }

    // ===== shipments =====

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn list_shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        self.get_json("/api/shipments").await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn create_shipment(&self, body: &CreateShipment) -> Result<Shipment, ApiError> {
        self.send_json(Method::POST, "/api/shipments", body).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_shipment(&self, id: Uuid) -> Result<Shipment, ApiError> {
        self.get_json(&format!("/api/shipments/{id}")).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn update_shipment(&self, id: Uuid, body: &UpdateShipment) -> Result<Shipment, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/shipments/{id}"), body)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn set_shipment_status(&self, id: Uuid, status: &str) -> Result<Shipment, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/shipments/{id}/status"), &status_body(status))
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete_shipment(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/api/shipments/{id}")).await
    }

    // ===== applications =====

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn list_applications(
        &self,
        shipment_id: Option<Uuid>,
    ) -> Result<Vec<ShipmentApplication>, ApiError> {
        let path = match shipment_id {
            Some(id) => format!("/api/applications?shipment_id={id}"),
            None => "/api/applications".to_owned(),
        };
        self.get_json(&path).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn create_application(
        &self,
        body: &CreateApplication,
    ) -> Result<ShipmentApplication, ApiError> {
        self.send_json(Method::POST, "/api/applications", body).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_application(&self, id: Uuid) -> Result<ShipmentApplication, ApiError> {
        self.get_json(&format!("/api/applications/{id}")).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn set_application_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<ShipmentApplication, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/applications/{id}/status"),
            &status_body(status),
        )
        .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete_application(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/api/applications/{id}")).await
    }
}
