use super::*;

fn service() -> TokenService {
    TokenService::new(TokenConfig::new("test-secret".into(), 3600))
}

// =============================================================================
// issue / validate
// =============================================================================

#[test]
fn issue_and_validate_round_trip() {
    let svc = service();
    let user_id = Uuid::new_v4();

    let token = svc.issue(user_id, Role::Admin).unwrap();
    assert!(!token.is_empty());

    let claims = svc.validate(&token).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "Admin");
    assert_eq!(claims.iss, "haulboard");
    assert_eq!(claims.exp, claims.iat + 3600);
}

#[test]
fn validate_preserves_non_admin_role() {
    let svc = service();
    let token = svc.issue(Uuid::new_v4(), Role::Driver).unwrap();
    let claims = svc.validate(&token).unwrap();
    assert_eq!(claims.role, "Driver");
}

#[test]
fn expired_token_rejected_as_expired() {
    let svc = service();
    // Issued two hours ago with a one hour TTL; past jsonwebtoken's leeway.
    let token = svc
        .issue_at(Uuid::new_v4(), Role::Admin, now_secs() - 7200)
        .unwrap();

    match svc.validate(&token) {
        Err(TokenError::Expired) => {}
        other => panic!("expected Expired, got {other:?}"),
    }
}

#[test]
fn tampered_token_rejected_as_invalid() {
    let svc = service();
    let mut token = svc.issue(Uuid::new_v4(), Role::Admin).unwrap();
    token.push('x');

    match svc.validate(&token) {
        Err(TokenError::Invalid) => {}
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn token_from_other_secret_rejected() {
    let svc = service();
    let other = TokenService::new(TokenConfig::new("other-secret".into(), 3600));
    let token = other.issue(Uuid::new_v4(), Role::Admin).unwrap();

    assert!(matches!(svc.validate(&token), Err(TokenError::Invalid)));
}

#[test]
fn garbage_token_rejected() {
    let svc = service();
    assert!(matches!(svc.validate("not-a-jwt"), Err(TokenError::Invalid)));
}

// =============================================================================
// extract_bearer
// =============================================================================

#[test]
fn extract_bearer_accepts_bearer_scheme() {
    assert_eq!(extract_bearer("Bearer abc123").unwrap(), "abc123");
}

#[test]
fn extract_bearer_rejects_other_schemes() {
    assert!(extract_bearer("Basic abc123").is_err());
    assert!(extract_bearer("abc123").is_err());
}

#[test]
fn extract_bearer_rejects_empty_token() {
    assert!(extract_bearer("Bearer ").is_err());
}

// =============================================================================
// now_secs
// =============================================================================

#[test]
fn now_secs_is_after_2024() {
    assert!(now_secs() > 1_700_000_000);
}
