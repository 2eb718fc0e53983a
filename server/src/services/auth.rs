//! Credential service — roles, password hashing, login verification.

use std::fmt::Write;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

const SALT_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

// =============================================================================
// ROLES
// =============================================================================

/// Closed set of marketplace roles. The admin surface accepts sessions only
/// for `Admin`; the check lives in `Role::is_admin` and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Merchant,
    TruckOwner,
    Driver,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Merchant => "Merchant",
            Self::TruckOwner => "TruckOwner",
            Self::Driver => "Driver",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(Self::Admin),
            "Merchant" => Some(Self::Merchant),
            "TruckOwner" => Some(Self::TruckOwner),
            "Driver" => Some(Self::Driver),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

// =============================================================================
// PASSWORD HASHING
// =============================================================================

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

#[must_use]
pub fn generate_salt() -> String {
    let bytes: [u8; SALT_LEN] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Hash a password with a fresh random salt. Stored as `<salt>$<digest>` hex.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = generate_salt();
    let digest = digest_hex(&salt, password);
    format!("{salt}${digest}")
}

/// Verify a password against a stored `<salt>$<digest>` value.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    digest_hex(salt, password) == digest
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

// =============================================================================
// USER LOOKUP
// =============================================================================

/// User row as returned to authenticated callers (never carries the hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
}

fn row_to_record(id: Uuid, name: String, email: String, role: String, phone: Option<String>) -> Option<UserRecord> {
    Some(UserRecord { id, name, email, role: Role::from_str(&role)?, phone })
}

/// Verify login credentials and return the matching user.
///
/// Any valid credential authenticates regardless of role — the marketplace
/// auth service is shared across surfaces; admin-only gating happens at the
/// resource routes and in the client.
///
/// # Errors
///
/// `InvalidCredentials` on unknown email, bad password, or unknown role.
pub async fn verify_credentials(pool: &PgPool, email: &str, password: &str) -> Result<UserRecord, AuthError> {
    let normalized = normalize_email(email).ok_or(AuthError::InvalidCredentials)?;

    let row = sqlx::query("SELECT id, name, email, password_hash, role, phone FROM users WHERE email = $1")
        .bind(&normalized)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored: String = row.get("password_hash");
    if !verify_password(password, &stored) {
        return Err(AuthError::InvalidCredentials);
    }

    row_to_record(
        row.get("id"),
        row.get("name"),
        row.get("email"),
        row.get("role"),
        row.get("phone"),
    )
    .ok_or(AuthError::InvalidCredentials)
}

/// Load a user by id.
///
/// # Errors
///
/// Returns the underlying database error; unknown id or unknown role yields
/// `Ok(None)`.
pub async fn load_user(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, email, role, phone FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|r| row_to_record(r.get("id"), r.get("name"), r.get("email"), r.get("role"), r.get("phone"))))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
