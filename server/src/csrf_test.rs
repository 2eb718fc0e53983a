use super::*;

fn store_with_ttl(secs: u64) -> CsrfStore {
    CsrfStore { inner: Arc::new(Mutex::new(HashMap::new())), ttl: Duration::from_secs(secs) }
}

// =============================================================================
// token generation
// =============================================================================

#[test]
fn csrf_token_is_64_hex_chars() {
    let token = generate_csrf_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn session_id_is_32_hex_chars() {
    let sid = generate_session_id();
    assert_eq!(sid.len(), 32);
    assert!(sid.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn two_tokens_differ() {
    assert_ne!(generate_csrf_token(), generate_csrf_token());
}

// =============================================================================
// issue / validate
// =============================================================================

#[test]
fn issue_is_stable_within_ttl() {
    let store = store_with_ttl(60);
    let first = store.issue("sid");
    let second = store.issue("sid");
    assert_eq!(first, second);
}

#[test]
fn issue_is_per_session() {
    let store = store_with_ttl(60);
    assert_ne!(store.issue("sid-a"), store.issue("sid-b"));
}

#[test]
fn validate_accepts_current_token() {
    let store = store_with_ttl(60);
    let token = store.issue("sid");
    assert!(store.validate("sid", Some(&token)).is_ok());
}

#[test]
fn validate_rejects_wrong_token() {
    let store = store_with_ttl(60);
    store.issue("sid");
    assert!(matches!(store.validate("sid", Some("bogus")), Err(CsrfError::Rejected)));
}

#[test]
fn validate_missing_token_is_missing() {
    let store = store_with_ttl(60);
    store.issue("sid");
    assert!(matches!(store.validate("sid", None), Err(CsrfError::Missing)));
    assert!(matches!(store.validate("sid", Some("")), Err(CsrfError::Missing)));
}

#[test]
fn validate_unknown_session_is_rejected() {
    let store = store_with_ttl(60);
    assert!(matches!(store.validate("never-seen", Some("anything")), Err(CsrfError::Rejected)));
}

// =============================================================================
// rotation on expiry
// =============================================================================

#[test]
fn expired_token_is_rejected_then_rotated() {
    let store = store_with_ttl(10);
    let start = Instant::now();
    let stale = store.issue_at("sid", start);

    let later = start + Duration::from_secs(11);
    assert!(matches!(store.validate_at("sid", Some(&stale), later), Err(CsrfError::Rejected)));

    let fresh = store.issue_at("sid", later);
    assert_ne!(fresh, stale);
    assert!(store.validate_at("sid", Some(&fresh), later).is_ok());
}

#[test]
fn issue_does_not_rotate_before_expiry() {
    let store = store_with_ttl(10);
    let start = Instant::now();
    let token = store.issue_at("sid", start);
    assert_eq!(store.issue_at("sid", start + Duration::from_secs(9)), token);
}

#[test]
fn prune_drops_expired_entries() {
    let store = store_with_ttl(10);
    let start = Instant::now();
    store.issue_at("old", start);
    store.issue_at("new", start + Duration::from_secs(20));

    let inner = store.inner.lock().unwrap();
    assert!(!inner.contains_key("old"));
    assert!(inner.contains_key("new"));
}

// =============================================================================
// middleware helpers
// =============================================================================

#[test]
fn mutating_methods_matrix() {
    assert!(is_mutating(&Method::POST));
    assert!(is_mutating(&Method::PUT));
    assert!(is_mutating(&Method::PATCH));
    assert!(is_mutating(&Method::DELETE));
    assert!(!is_mutating(&Method::GET));
    assert!(!is_mutating(&Method::HEAD));
    assert!(!is_mutating(&Method::OPTIONS));
}

#[tokio::test]
async fn rejection_response_is_403_with_error_code() {
    let response = rejection_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], CSRF_ERROR_CODE);
    assert_eq!(body["message"], "Invalid or expired CSRF token");
}
