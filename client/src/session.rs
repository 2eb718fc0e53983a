//! Credential and session state — the single owner.
//!
//! DESIGN
//! ======
//! Every credential the client holds lives here: the bearer token (mirrored
//! to a pluggable [`TokenStore`] so it survives restarts) and the cached
//! CSRF token (in-memory only; it is per-session and worthless across
//! restarts). Nothing else in the crate touches storage directly, so a
//! teardown is one call and cannot leave a half-cleared session behind.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage key for the persisted bearer token.
pub const TOKEN_KEY: &str = "haulboard_admin_token";

/// Pluggable persistence for the bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}

/// File-backed store: a small JSON map keyed by [`TOKEN_KEY`].
///
/// Write failures are logged and swallowed; losing persistence costs the
/// user a re-login, not a crash.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> HashMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn write_map(&self, map: &HashMap<String, String>) {
        let Ok(raw) = serde_json::to_string_pretty(map) else {
            return;
        };
        if let Err(e) = fs::write(&self.path, raw) {
            tracing::warn!(error = %e, path = %self.path.display(), "failed to persist token");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.read_map().get(TOKEN_KEY).cloned()
    }

    fn save(&self, token: &str) {
        let mut map = self.read_map();
        map.insert(TOKEN_KEY.to_owned(), token.to_owned());
        self.write_map(&map);
    }

    fn clear(&self) {
        let mut map = self.read_map();
        if map.remove(TOKEN_KEY).is_some() {
            self.write_map(&map);
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// The session object. Holds the live bearer token (mirrored to the store)
/// and the most recently observed CSRF token.
pub struct Session {
    store: Box<dyn TokenStore>,
    bearer: Mutex<Option<String>>,
    csrf: Mutex<Option<String>>,
}

impl Session {
    /// Build a session, seeding the bearer slot from the store.
    #[must_use]
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        let bearer = store.load();
        Self { store, bearer: Mutex::new(bearer), csrf: Mutex::new(None) }
    }

    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.bearer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn set_bearer(&self, token: &str) {
        *self
            .bearer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_owned());
        self.store.save(token);
    }

    #[must_use]
    pub fn csrf(&self) -> Option<String> {
        self.csrf
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn set_csrf(&self, token: &str) {
        *self
            .csrf
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_owned());
    }

    /// Tear the session down: bearer, persisted copy, and cached CSRF token.
    pub fn clear(&self) {
        *self
            .bearer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        *self
            .csrf
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        self.store.clear();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
