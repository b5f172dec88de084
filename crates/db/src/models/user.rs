//! User account model and DTOs.

use serde::Serialize;
use snippetbox_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Public columns of a `users` row. The password hash is never loaded into it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
}

/// DTO for signing up a new user. `password` is plaintext and is hashed by
/// the repository before it reaches the database.
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
