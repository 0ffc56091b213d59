//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use traduko_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    /// Argon2 hash; never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new user (password already hashed by the caller).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
}
