use super::*;

// =============================================================================
// bytes_to_hex / generate_salt
// =============================================================================

#[test]
fn bytes_to_hex_known_values() {
    assert_eq!(bytes_to_hex(&[]), "");
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn generate_salt_is_32_hex_chars() {
    let salt = generate_salt();
    assert_eq!(salt.len(), 32);
    assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_salt_two_calls_differ() {
    assert_ne!(generate_salt(), generate_salt());
}

// =============================================================================
// password hashing
// =============================================================================

#[test]
fn hash_then_verify_round_trip() {
    let stored = hash_password("hunter2");
    assert!(verify_password("hunter2", &stored));
}

#[test]
fn verify_rejects_wrong_password() {
    let stored = hash_password("hunter2");
    assert!(!verify_password("hunter3", &stored));
}

#[test]
fn hash_uses_fresh_salt_each_time() {
    assert_ne!(hash_password("same"), hash_password("same"));
}

#[test]
fn stored_format_is_salt_dollar_digest() {
    let stored = hash_password("pw");
    let (salt, digest) = stored.split_once('$').expect("separator");
    assert_eq!(salt.len(), 32);
    assert_eq!(digest.len(), 64);
}

#[test]
fn verify_rejects_malformed_stored_value() {
    assert!(!verify_password("pw", "no-separator"));
    assert!(!verify_password("pw", ""));
}

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Admin@Example.COM "), Some("admin@example.com".into()));
}

#[test]
fn normalize_email_rejects_invalid() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("no-at-sign"), None);
    assert_eq!(normalize_email("@domain"), None);
    assert_eq!(normalize_email("local@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_round_trips_all_variants() {
    for role in [Role::Admin, Role::Merchant, Role::TruckOwner, Role::Driver] {
        assert_eq!(Role::from_str(role.as_str()), Some(role));
    }
}

#[test]
fn role_from_str_rejects_unknown() {
    assert_eq!(Role::from_str("admin"), None);
    assert_eq!(Role::from_str("SuperAdmin"), None);
    assert_eq!(Role::from_str(""), None);
}

#[test]
fn only_admin_is_admin() {
    assert!(Role::Admin.is_admin());
    assert!(!Role::Merchant.is_admin());
    assert!(!Role::TruckOwner.is_admin());
    assert!(!Role::Driver.is_admin());
}

#[test]
fn role_serializes_to_wire_string() {
    assert_eq!(serde_json::to_string(&Role::TruckOwner).unwrap(), "\"TruckOwner\"");
    let parsed: Role = serde_json::from_str("\"Admin\"").unwrap();
    assert_eq!(parsed, Role::Admin);
}

#[test]
fn user_record_serializes_role_as_string() {
    let user = UserRecord {
        id: Uuid::nil(),
        name: "Ops".into(),
        email: "ops@example.com".into(),
        role: Role::Admin,
        phone: None,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["role"], "Admin");
    assert!(json["phone"].is_null());
    assert!(json.get("password_hash").is_none());
}
