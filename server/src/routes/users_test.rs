use super::*;

// =============================================================================
// row mapping
// =============================================================================

#[test]
fn row_to_record_maps_known_role() {
    let id = Uuid::new_v4();
    let row: UserRow = (id, "Ops".into(), "ops@example.com".into(), "Merchant".into(), Some("555".into()));
    let record = row_to_record(row).unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.role, Role::Merchant);
    assert_eq!(record.phone.as_deref(), Some("555"));
}

#[test]
fn row_to_record_drops_unknown_role() {
    let row: UserRow = (Uuid::new_v4(), "X".into(), "x@y.z".into(), "Dispatcher".into(), None);
    assert!(row_to_record(row).is_none());
}

// =============================================================================
// rejection helpers
// =============================================================================

#[tokio::test]
async fn validation_is_400() {
    let response = validation("name is required");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "VALIDATION");
}

#[tokio::test]
async fn not_found_is_404() {
    let response = not_found();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// update validation ordering
// =============================================================================

fn admin() -> AdminUser {
    AdminUser(crate::routes::auth::AuthUser { id: Uuid::new_v4(), role: Role::Admin })
}

// The test pool is lazy and points at nothing: a 400 here proves the body
// was rejected before any statement ran, otherwise the broken connection
// would surface as a 500.

#[tokio::test]
async fn update_rejects_empty_name_before_any_write() {
    let state = crate::state::test_helpers::test_app_state();
    let body = UpdateUserBody { name: Some("   ".into()), phone: None, role: None, password: None };

    let err = update_user(State(state), admin(), Path(Uuid::new_v4()), Json(body))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_rejects_empty_password_even_after_valid_fields() {
    let state = crate::state::test_helpers::test_app_state();
    let body = UpdateUserBody {
        name: Some("Ops".into()),
        phone: Some("555".into()),
        role: None,
        password: Some(String::new()),
    };

    let err = update_user(State(state), admin(), Path(Uuid::new_v4()), Json(body))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_rejects_unknown_role_before_any_write() {
    let state = crate::state::test_helpers::test_app_state();
    let body = UpdateUserBody {
        name: Some("Ops".into()),
        phone: None,
        role: Some("Dispatcher".into()),
        password: None,
    };

    let err = update_user(State(state), admin(), Path(Uuid::new_v4()), Json(body))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}
