use super::*;

#[test]
fn row_maps_to_response() {
    let id = Uuid::new_v4();
    let merchant = Uuid::new_v4();
    let truck = Uuid::new_v4();
    let row: ShipmentRow = (
        id,
        merchant,
        "Mombasa".into(),
        "Nairobi".into(),
        "tea".into(),
        1200.0,
        45_000.0,
        "Assigned".into(),
        Some(truck),
    );
    let response = to_response(row);
    assert_eq!(response.id, id);
    assert_eq!(response.merchant_id, merchant);
    assert_eq!(response.origin, "Mombasa");
    assert_eq!(response.status, "Assigned");
    assert_eq!(response.truck_id, Some(truck));
}

#[test]
fn unassigned_row_has_no_truck() {
    let row: ShipmentRow = (
        Uuid::new_v4(),
        Uuid::new_v4(),
        "A".into(),
        "B".into(),
        "".into(),
        1.0,
        1.0,
        "Pending".into(),
        None,
    );
    assert_eq!(to_response(row).truck_id, None);
}

#[test]
fn select_statement_covers_response_fields() {
    for column in ["id", "merchant_id", "origin", "destination", "cargo", "weight_kg", "price", "status", "truck_id"] {
        assert!(SELECT_SHIPMENT.contains(column));
    }
}

#[tokio::test]
async fn not_found_is_404() {
    let response = not_found();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
