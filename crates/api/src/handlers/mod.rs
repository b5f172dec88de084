//! Page handlers.
//!
//! Form posts answer with a 303 redirect on success. On a validation or
//! business-rule failure they re-render the form with HTTP 400, the user's
//! input and the messages in place.

pub mod snippets;
pub mod users;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::TemplateData;

/// Render `page` with `data` as an HTML response.
///
/// The page is rendered in full before anything is written, so a template
/// failure still produces a clean 500.
pub(crate) fn render(
    state: &AppState,
    status: StatusCode,
    page: &str,
    data: &TemplateData,
) -> AppResult<Response> {
    let body = state.templates.render(page, data)?;
    Ok((status, Html(body)).into_response())
}

/// GET fallback for paths no route matches.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
