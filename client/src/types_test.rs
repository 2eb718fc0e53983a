use super::*;

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_deserializes_exact_strings() {
    let role: Role = serde_json::from_str("\"TruckOwner\"").unwrap();
    assert_eq!(role, Role::TruckOwner);
}

#[test]
fn role_rejects_unknown_strings() {
    assert!(serde_json::from_str::<Role>("\"SuperAdmin\"").is_err());
    assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
}

#[test]
fn role_from_str_round_trips() {
    for role in [Role::Admin, Role::Merchant, Role::TruckOwner, Role::Driver] {
        assert_eq!(Role::from_str(role.as_str()), Some(role));
    }
    assert_eq!(Role::from_str("Dispatcher"), None);
}

#[test]
fn only_admin_is_admin() {
    assert!(Role::Admin.is_admin());
    assert!(!Role::Merchant.is_admin());
    assert!(!Role::TruckOwner.is_admin());
    assert!(!Role::Driver.is_admin());
}

// =============================================================================
// envelopes
// =============================================================================

#[test]
fn login_response_parses_server_shape() {
    let raw = serde_json::json!({
        "token": "tok-abc",
        "data": { "user": {
            "id": "00000000-0000-0000-0000-000000000000",
            "name": "Ops",
            "email": "ops@example.com",
            "role": "Admin",
            "phone": null
        }}
    });
    let parsed: LoginResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(parsed.token, "tok-abc");
    assert_eq!(parsed.data.user.role, Role::Admin);
    assert!(parsed.data.user.phone.is_none());
}

#[test]
fn login_response_with_unknown_role_fails_to_parse() {
    let raw = serde_json::json!({
        "token": "tok",
        "data": { "user": {
            "id": "00000000-0000-0000-0000-000000000000",
            "name": "X",
            "email": "x@y.z",
            "role": "Dispatcher",
            "phone": null
        }}
    });
    assert!(serde_json::from_value::<LoginResponse>(raw).is_err());
}

#[test]
fn error_body_defaults_missing_message() {
    let parsed: ApiErrorBody = serde_json::from_str("{\"error\":\"EBADCSRFTOKEN\"}").unwrap();
    assert_eq!(parsed.error, "EBADCSRFTOKEN");
    assert_eq!(parsed.message, "");
}

// =============================================================================
// request bodies
// =============================================================================

#[test]
fn create_user_skips_absent_phone() {
    let body = CreateUser {
        name: "Ops".into(),
        email: "ops@example.com".into(),
        password: "pw".into(),
        role: Role::Admin,
        phone: None,
    };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["role"], "Admin");
    assert!(json.get("phone").is_none());
}

#[test]
fn update_shipment_serializes_only_set_fields() {
    let body = UpdateShipment { price: Some(900.0), ..UpdateShipment::default() };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "price": 900.0 }));
}
