use super::*;

#[tokio::test]
async fn test_app_state_constructs_without_live_db() {
    let state = test_helpers::test_app_state();
    // Lazy pool: no connection is made until a query runs.
    let token = state.csrf.issue("sid-1");
    assert_eq!(token.len(), 64);
}

#[tokio::test]
async fn app_state_clone_shares_csrf_store() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    let token = state.csrf.issue("shared-sid");
    assert!(clone.csrf.validate("shared-sid", Some(&token)).is_ok());
}
