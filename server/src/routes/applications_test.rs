use super::*;

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn row_maps_to_response() {
    let id = Uuid::new_v4();
    let shipment = Uuid::new_v4();
    let truck = Uuid::new_v4();
    let row: ApplicationRow = (id, shipment, truck, 1500.0, "Pending".into());
    let response = to_response(row);
    assert_eq!(response.id, id);
    assert_eq!(response.shipment_id, shipment);
    assert_eq!(response.truck_id, truck);
    assert_eq!(response.status, "Pending");
}

// =============================================================================
// error mapping
// =============================================================================

#[tokio::test]
async fn not_found_error_maps_to_404() {
    let response = shipment_error_response(&ShipmentError::NotFound("application not found"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "application not found");
}

#[tokio::test]
async fn conflict_error_maps_to_409() {
    let response = shipment_error_response(&ShipmentError::Conflict("application already decided"));
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn database_error_maps_to_500_without_detail() {
    let response = shipment_error_response(&ShipmentError::Database(sqlx::Error::RowNotFound));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "INTERNAL");
    assert_eq!(body["message"], "database error");
}
