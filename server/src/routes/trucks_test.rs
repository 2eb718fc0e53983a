use super::*;

#[test]
fn row_maps_to_response() {
    let id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let row: TruckRow = (id, owner, "KA-01-1234".into(), "flatbed".into(), 5000.0, "Available".into());
    let response = to_response(row);
    assert_eq!(response.id, id);
    assert_eq!(response.owner_id, owner);
    assert_eq!(response.plate_number, "KA-01-1234");
    assert_eq!(response.status, "Available");
}

#[test]
fn select_statement_covers_response_fields() {
    for column in ["id", "owner_id", "plate_number", "truck_type", "capacity_kg", "status"] {
        assert!(SELECT_TRUCK.contains(column));
    }
}

#[tokio::test]
async fn not_found_is_404() {
    let response = not_found();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "truck not found");
}

// =============================================================================
// update validation ordering
// =============================================================================

fn admin() -> AdminUser {
    AdminUser(crate::routes::auth::AuthUser {
        id: Uuid::new_v4(),
        role: crate::services::auth::Role::Admin,
    })
}

// The test pool is lazy and points at nothing: a 400 here proves the body
// was rejected before any statement ran, otherwise the broken connection
// would surface as a 500.

#[tokio::test]
async fn update_rejects_nonpositive_capacity_even_after_valid_fields() {
    let state = crate::state::test_helpers::test_app_state();
    let body = UpdateTruckBody {
        plate_number: None,
        truck_type: Some("flatbed".into()),
        capacity_kg: Some(0.0),
    };

    let err = update_truck(State(state), admin(), Path(Uuid::new_v4()), Json(body))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_rejects_empty_plate_before_any_write() {
    let state = crate::state::test_helpers::test_app_state();
    let body = UpdateTruckBody {
        plate_number: Some("  ".into()),
        truck_type: None,
        capacity_kg: None,
    };

    let err = update_truck(State(state), admin(), Path(Uuid::new_v4()), Json(body))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}
