//! Cookie-based CSRF protection.
//!
//! The `csrf_token` cookie holds a random 32-byte secret (hex). Pages embed a
//! masked copy of it: a fresh one-time pad followed by `pad XOR secret`, so
//! the value in the HTML changes on every render. An unsafe request passes
//! only when the submitted field unmasks to the cookie's secret.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Name of the cookie holding the raw secret.
pub const CSRF_COOKIE: &str = "csrf_token";

/// Name of the form field carrying the masked token.
pub const CSRF_FIELD: &str = "csrf_token";

/// Secret length in bytes.
pub const TOKEN_LEN: usize = 32;

/// Largest form body read while checking the token.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Secret for the current request. `from_cookie` is false when the client
/// sent no usable cookie and a new secret was minted for this response.
#[derive(Clone)]
struct CsrfSecret {
    bytes: [u8; TOKEN_LEN],
    from_cookie: bool,
}

/// Masked token for embedding in the page being rendered.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

#[derive(Deserialize)]
struct CsrfField {
    csrf_token: String,
}

/// Make sure the client holds a CSRF cookie and expose a masked token.
pub async fn issue(
    State(config): State<Arc<ServerConfig>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(CSRF_COOKIE)
        .and_then(|cookie| parse_secret(cookie.value()));

    let (secret, new_cookie) = match existing {
        Some(bytes) => (
            CsrfSecret {
                bytes,
                from_cookie: true,
            },
            None,
        ),
        None => {
            let bytes: [u8; TOKEN_LEN] = rand::random();
            let cookie = Cookie::build((CSRF_COOKIE, hex::encode(bytes)))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(config.session.secure)
                .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
                .build();
            (
                CsrfSecret {
                    bytes,
                    from_cookie: false,
                },
                Some(cookie),
            )
        }
    };

    request
        .extensions_mut()
        .insert(CsrfToken(mask_token(&secret.bytes)));
    request.extensions_mut().insert(secret);

    let response = next.run(request).await;
    match new_cookie {
        Some(cookie) => (jar.add(cookie), response).into_response(),
        None => response,
    }
}

/// Reject unsafe requests whose form token does not match the cookie.
///
/// Safe methods pass straight through. The body is buffered so the handler
/// can still read the form afterwards.
pub async fn verify(request: Request, next: Next) -> Result<Response, AppError> {
    if request.method().is_safe() {
        return Ok(next.run(request).await);
    }

    let secret = request.extensions().get::<CsrfSecret>().cloned();
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable form body: {e}")))?;

    let submitted = submitted_token(&parts, bytes.clone()).await;
    let accepted = match (secret, submitted) {
        (Some(secret), Some(token)) if secret.from_cookie => tokens_match(&token, &secret.bytes),
        _ => false,
    };

    if !accepted {
        tracing::warn!(
            method = %parts.method,
            path = %parts.uri.path(),
            "Rejected request with missing or invalid CSRF token"
        );
        return Err(AppError::BadRequest("CSRF token missing or invalid".into()));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

async fn submitted_token(parts: &Parts, bytes: axum::body::Bytes) -> Option<String> {
    let mut probe = Request::new(Body::from(bytes));
    *probe.method_mut() = parts.method.clone();
    if let Some(content_type) = parts.headers.get(CONTENT_TYPE) {
        probe
            .headers_mut()
            .insert(CONTENT_TYPE, content_type.clone());
    }
    Form::<CsrfField>::from_request(probe, &())
        .await
        .ok()
        .map(|Form(field)| field.csrf_token)
}

/// Decode a cookie value into a secret.
pub fn parse_secret(value: &str) -> Option<[u8; TOKEN_LEN]> {
    hex::decode(value).ok()?.try_into().ok()
}

/// Mask `secret` with a fresh random pad.
pub fn mask_token(secret: &[u8; TOKEN_LEN]) -> String {
    let pad: [u8; TOKEN_LEN] = rand::random();
    let mut masked = Vec::with_capacity(TOKEN_LEN * 2);
    masked.extend_from_slice(&pad);
    masked.extend(pad.iter().zip(secret).map(|(p, s)| p ^ s));
    hex::encode(masked)
}

fn unmask_token(masked: &str) -> Option<[u8; TOKEN_LEN]> {
    let bytes = hex::decode(masked).ok()?;
    if bytes.len() != TOKEN_LEN * 2 {
        return None;
    }
    let (pad, cipher) = bytes.split_at(TOKEN_LEN);
    let mut secret = [0u8; TOKEN_LEN];
    for (i, byte) in secret.iter_mut().enumerate() {
        *byte = pad[i] ^ cipher[i];
    }
    Some(secret)
}

fn tokens_match(masked: &str, secret: &[u8; TOKEN_LEN]) -> bool {
    unmask_token(masked).is_some_and(|candidate| constant_time_eq(&candidate, secret))
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_token_unmasks_to_secret() {
        let secret: [u8; TOKEN_LEN] = rand::random();
        let masked = mask_token(&secret);

        assert_eq!(masked.len(), TOKEN_LEN * 4);
        assert!(tokens_match(&masked, &secret));
    }

    #[test]
    fn masking_changes_every_time() {
        let secret = [7u8; TOKEN_LEN];
        assert_ne!(mask_token(&secret), mask_token(&secret));
    }

    #[test]
    fn token_for_other_secret_fails() {
        let masked = mask_token(&[1u8; TOKEN_LEN]);
        assert!(!tokens_match(&masked, &[2u8; TOKEN_LEN]));
    }

    #[test]
    fn raw_secret_is_not_accepted_as_token() {
        let secret = [9u8; TOKEN_LEN];
        assert!(!tokens_match(&hex::encode(secret), &secret));
    }

    #[test]
    fn malformed_tokens_fail() {
        let secret = [0u8; TOKEN_LEN];
        assert!(!tokens_match("", &secret));
        assert!(!tokens_match("zz", &secret));
        assert!(!tokens_match(&"00".repeat(TOKEN_LEN * 2 + 1), &secret));
    }

    #[test]
    fn parse_secret_requires_exact_length() {
        assert!(parse_secret(&"ab".repeat(TOKEN_LEN)).is_some());
        assert!(parse_secret(&"ab".repeat(TOKEN_LEN - 1)).is_none());
        assert!(parse_secret("not hex").is_none());
    }

    #[test]
    fn constant_time_eq_compares_fully() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
