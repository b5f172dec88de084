//! Middleware that loads the session before the handler and persists it after.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use futures::FutureExt;

use super::cookie::{decode_record, encode_record, SessionRecord};
use super::Session;
use crate::config::{ServerConfig, SessionConfig};
use crate::error::AppError;
use crate::middleware::recover;

/// Name of the signed session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Load the session, run the rest of the stack, then persist the session.
///
/// A missing, tampered or expired cookie starts a fresh session. The session
/// is written back on every exit path, including a panic further in, which is
/// turned into the generic 500 here so the cookie can still be attached.
pub async fn enable(
    State(config): State<Arc<ServerConfig>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let settings = &config.session;
    let session = Session::new(load_record(&jar, settings));
    request.extensions_mut().insert(session.clone());

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => recover::panic_response(panic),
    };

    persist(&session, settings, jar, response)
}

fn load_record(jar: &CookieJar, settings: &SessionConfig) -> SessionRecord {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| match decode_record(cookie.value(), &settings.secret) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "Discarding invalid session cookie");
                None
            }
        })
        .unwrap_or_else(|| SessionRecord::new(settings.lifetime))
}

fn persist(
    session: &Session,
    settings: &SessionConfig,
    jar: CookieJar,
    response: Response,
) -> Response {
    if !session.is_modified() {
        return response;
    }

    let record = session.snapshot();
    let token = match encode_record(&record, &settings.secret) {
        Ok(token) => token,
        Err(e) => {
            return AppError::InternalError(format!("Failed to sign session: {e}")).into_response()
        }
    };

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(settings.secure)
        .max_age(time::Duration::seconds(record.remaining_secs()))
        .build();

    (jar.add(cookie), response).into_response()
}
