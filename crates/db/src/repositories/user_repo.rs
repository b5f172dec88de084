//! Repository for the `users` table.

use sqlx::PgPool;
use snippetbox_core::error::CoreError;
use snippetbox_core::password::{hash_password, verify_password};
use snippetbox_core::types::DbId;

use crate::error::{is_unique_violation, StoreError};
use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, created_at";

/// Unique constraint guarding `users.email`.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

/// Argon2id hash (default parameters) checked when the email is unknown, so
/// both failure paths pay the same verification cost.
pub(crate) const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$+qhx5KifWHqqnur7AqpctA$HbLdzNRC6rZbUKYP33wRT5plEgTTvpr6XwlI6aLYjew";

/// Account storage and password authentication.
pub struct UserRepo;

impl UserRepo {
    /// Hash the password and insert a new user, returning its id.
    ///
    /// A taken email is reported as [`StoreError::DuplicateEmail`], detected
    /// from the unique constraint rather than a prior lookup, so two racing
    /// signups cannot both succeed.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<DbId, StoreError> {
        let password = input.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| CoreError::Internal(format!("Password hashing task failed: {e}")))??;

        let result = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO users (name, email, hashed_password, created_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&hashed_password)
        .fetch_one(pool)
        .await;

        match result {
            Ok(id) => {
                tracing::info!(user_id = id, "User account created");
                Ok(id)
            }
            Err(err) if is_unique_violation(&err, EMAIL_CONSTRAINT) => {
                Err(StoreError::DuplicateEmail)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Check an email/password pair and return the matching user id.
    ///
    /// An unknown email and a wrong password both yield
    /// [`StoreError::InvalidCredentials`].
    pub async fn authenticate(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<DbId, StoreError> {
        let row = sqlx::query_as::<_, (DbId, String)>(
            "SELECT id, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        let (id, hashed_password) = match row {
            Some((id, hashed_password)) => (Some(id), hashed_password),
            None => (None, DUMMY_PASSWORD_HASH.to_owned()),
        };

        let password = password.to_owned();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &hashed_password))
                .await
                .map_err(|e| {
                    CoreError::Internal(format!("Password verification task failed: {e}"))
                })??;

        match id {
            Some(id) if matches => Ok(id),
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<User, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(StoreError::NotFound { entity: "User", id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_is_a_valid_phc_string() {
        let matched = verify_password("not-the-dummy-password", DUMMY_PASSWORD_HASH)
            .expect("dummy hash should parse");
        assert!(!matched);
    }
}
