use snippetbox_core::error::CoreError;
use snippetbox_core::types::DbId;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

/// Outcome of a store call that did not succeed.
///
/// The business-rule variants (`DuplicateEmail`, `InvalidCredentials`,
/// `NotFound`) are expected and handled by callers; the rest are failures of
/// the store itself and are never retried here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Email address is already in use")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store call timed out")]
    Timeout,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let timed_out = match &err {
            sqlx::Error::PoolTimedOut => true,
            sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(QUERY_CANCELED),
            _ => false,
        };
        if timed_out {
            tracing::warn!(error = %err, "Store call exceeded its deadline");
            StoreError::Timeout
        } else {
            StoreError::Database(err)
        }
    }
}

/// True when `err` is a unique violation on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
