//! Snippet entity model and DTOs.

use serde::Serialize;
use snippetbox_core::snippets::ExpiryDays;
use snippetbox_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `snippets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Snippet {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// DTO for creating a new snippet. Timestamps are assigned by the database.
#[derive(Debug, Clone)]
pub struct CreateSnippet {
    pub title: String,
    pub content: String,
    pub expires: ExpiryDays,
}
