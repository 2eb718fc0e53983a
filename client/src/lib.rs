//! Admin client for the haulboard API.
//!
//! ARCHITECTURE
//! ============
//! Three layers, each owning one concern:
//!
//! - [`session`]: the single owner of credential state — the bearer token
//!   (mirrored to a pluggable store) and the cached CSRF token.
//! - [`http`]: the request pipeline. Attaches credentials, caches the
//!   rotating CSRF token from every response, tears the session down on any
//!   401, and retries CSRF-rejected mutations exactly once after a refetch.
//! - [`auth`]: the login/logout state machine and the admin role gate.
//!
//! Typed endpoint wrappers for the admin CRUD surface live in [`api`].

pub mod api;
pub mod auth;
pub mod http;
pub mod session;
pub mod types;

pub use auth::{AuthContext, AuthError, AuthPhase};
pub use http::{ApiClient, ApiError};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
