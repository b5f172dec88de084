//! Repository for the `snippets` table.

use sqlx::PgPool;
use snippetbox_core::types::DbId;

use crate::error::StoreError;
use crate::models::snippet::{CreateSnippet, Snippet};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, created_at, expires_at";

/// Snippet persistence with time-bounded reads.
///
/// Every read filters on `expires_at > NOW()`, so an expired row is
/// indistinguishable from one that never existed.
pub struct SnippetRepo;

impl SnippetRepo {
    /// Insert a snippet and return its id.
    ///
    /// `created_at` is the database clock at insert time and `expires_at` is
    /// that instant plus the requested number of days.
    pub async fn create(pool: &PgPool, input: &CreateSnippet) -> Result<DbId, StoreError> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO snippets (title, content, created_at, expires_at)
             VALUES ($1, $2, NOW(), NOW() + make_interval(days => $3))
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.expires.days())
        .fetch_one(pool)
        .await?;

        tracing::debug!(snippet_id = id, expires_in_days = input.expires.days(), "Snippet created");
        Ok(id)
    }

    /// Find a live snippet by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Snippet, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM snippets
             WHERE id = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Snippet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Snippet",
                id,
            })
    }

    /// List live snippets, newest first, at most `limit` of them.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Snippet>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM snippets
             WHERE expires_at > NOW()
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        let snippets = sqlx::query_as::<_, Snippet>(&query)
            .bind(limit.max(0))
            .fetch_all(pool)
            .await?;
        Ok(snippets)
    }

    /// Delete expired rows. Returns the count of deleted rows.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM snippets WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
