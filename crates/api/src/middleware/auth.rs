//! Session-backed authentication.
//!
//! [`authenticate`] runs on every dynamic route and turns the session's user
//! id into an [`AuthenticatedUser`] request extension. [`require_authentication`]
//! guards individual routes on top of that.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use snippetbox_db::models::user::User;
use snippetbox_db::repositories::UserRepo;
use snippetbox_db::StoreError;

use crate::error::{AppError, AppResult};
use crate::session::{Session, AUTH_USER_KEY};
use crate::state::AppState;

/// Where anonymous visitors to a protected page are sent.
pub const LOGIN_PATH: &str = "/user/login";

/// The account behind the current session, present only when it still exists.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::InternalError("No authenticated user for request".into()))
    }
}

/// Resolve the session's user id to an account.
///
/// A stale id (the account is gone) is removed from the session and the
/// request continues anonymously. Store failures propagate as 500s.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    if let Some(user_id) = session.user_id() {
        match UserRepo::find_by_id(&state.pool, user_id).await {
            Ok(user) => {
                request.extensions_mut().insert(AuthenticatedUser(user));
            }
            Err(StoreError::NotFound { .. }) => {
                tracing::info!(user_id, "Session refers to a missing account, clearing it");
                session.remove(AUTH_USER_KEY);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(next.run(request).await)
}

/// Redirect to the login page when the session carries no user id.
///
/// Whether the account still exists is settled earlier by [`authenticate`],
/// which drops stale ids. Pages behind this guard are marked
/// `Cache-Control: no-store` so a shared cache never serves them to someone
/// else.
pub async fn require_authentication(session: Session, request: Request, next: Next) -> Response {
    if session.user_id().is_none() {
        return (StatusCode::FOUND, [(header::LOCATION, LOGIN_PATH)]).into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
