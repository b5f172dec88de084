use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snippetbox_core::error::CoreError;
use snippetbox_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Validation and business-rule outcomes (bad form input, a taken email,
/// wrong credentials) are normally handled inside the handler by re-rendering
/// the form. Whatever reaches [`IntoResponse`] is answered with the bare
/// status reason; diagnostics go to the log, never to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `snippetbox_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed store call from `snippetbox_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No route, or no live record, for the request.
    #[error("Not found")]
    NotFound,

    /// A malformed request (CSRF failure, unreadable or oversized form body).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(core) => core_status(core),
            AppError::Store(store) => match store {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::DuplicateEmail | StoreError::InvalidCredentials => {
                    StatusCode::BAD_REQUEST
                }
                StoreError::Core(core) => core_status(core),
                StoreError::Timeout | StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Template(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Credential(_) | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
