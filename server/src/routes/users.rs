//! User management routes (admin only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::AdminUser;
use crate::routes::{error_json, write_error_response};
use crate::services::auth::{Role, UserRecord, hash_password, load_user, normalize_email};
use crate::state::AppState;

fn db_error(err: &sqlx::Error) -> Response {
    tracing::error!(error = %err, "user query failed");
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "database error")
}

fn validation(message: &str) -> Response {
    error_json(StatusCode::BAD_REQUEST, "VALIDATION", message)
}

fn not_found() -> Response {
    error_json(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found")
}

type UserRow = (Uuid, String, String, String, Option<String>);

fn row_to_record(row: UserRow) -> Option<UserRecord> {
    let (id, name, email, role, phone) = row;
    Some(UserRecord { id, name, email, role: Role::from_str(&role)?, phone })
}

/// `GET /api/users` — list users, newest first.
pub async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<UserRecord>>, Response> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, role, phone FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&state.pool)
    .await
    .map_err(|e| db_error(&e))?;

    Ok(Json(rows.into_iter().filter_map(row_to_record).collect()))
}

#[derive(Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
}

/// `POST /api/users` — create a user with a salted password hash.
pub async fn create_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<UserRecord>), Response> {
    let role = Role::from_str(&body.role).ok_or_else(|| validation("unknown role"))?;
    let email = normalize_email(&body.email).ok_or_else(|| validation("invalid email"))?;
    if body.name.trim().is_empty() {
        return Err(validation("name is required"));
    }
    if body.password.is_empty() {
        return Err(validation("password is required"));
    }

    let password_hash = hash_password(&body.password);
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password_hash, role, phone) VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(body.name.trim())
    .bind(&email)
    .bind(&password_hash)
    .bind(role.as_str())
    .bind(&body.phone)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| write_error_response(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(UserRecord { id, name: body.name.trim().to_owned(), email, role, phone: body.phone }),
    ))
}

/// `GET /api/users/:id` — fetch one user.
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRecord>, Response> {
    let user = load_user(&state.pool, user_id)
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(not_found)?;
    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// `PATCH /api/users/:id` — update provided fields; password updates re-salt.
pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserRecord>, Response> {
    // Validate the whole body up front; nothing may be written once any
    // field turns out invalid.
    let role = match body.role.as_deref() {
        Some(raw) => Some(Role::from_str(raw).ok_or_else(|| validation("unknown role"))?),
        None => None,
    };
    if let Some(name) = body.name.as_deref()
        && name.trim().is_empty()
    {
        return Err(validation("name cannot be empty"));
    }
    if let Some(password) = body.password.as_deref()
        && password.is_empty()
    {
        return Err(validation("password cannot be empty"));
    }

    if load_user(&state.pool, user_id)
        .await
        .map_err(|e| db_error(&e))?
        .is_none()
    {
        return Err(not_found());
    }

    if let Some(name) = body.name.as_deref() {
        sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
            .bind(user_id)
            .bind(name.trim())
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(phone) = body.phone.as_deref() {
        sqlx::query("UPDATE users SET phone = $2 WHERE id = $1")
            .bind(user_id)
            .bind(phone)
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(role) = role {
        sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(user_id)
            .bind(role.as_str())
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }
    if let Some(password) = body.password.as_deref() {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(hash_password(password))
            .execute(&state.pool)
            .await
            .map_err(|e| write_error_response(&e))?;
    }

    let user = load_user(&state.pool, user_id)
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(not_found)?;
    Ok(Json(user))
}

/// `DELETE /api/users/:id` — delete a user (cascades to owned rows).
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Response> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .map_err(|e| db_error(&e))?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
