//! Per-request view of session, identity and CSRF state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Datelike, Utc};
use snippetbox_db::models::user::User;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::csrf::CsrfToken;
use crate::session::Session;
use crate::templates::TemplateData;

/// What the middleware chain learned about the request, gathered for a handler.
pub struct RequestContext {
    session: Session,
    user: Option<User>,
    csrf_token: String,
}

impl RequestContext {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Default page data. Pops the flash message, so call it once per render.
    pub fn template_data(&self) -> TemplateData {
        TemplateData {
            authenticated_user: self.user.clone(),
            csrf_token: self.csrf_token.clone(),
            current_year: Utc::now().year(),
            flash: self.session.pop_flash(),
            ..Default::default()
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|authenticated| authenticated.0.clone());
        let csrf_token = parts
            .extensions
            .get::<CsrfToken>()
            .map(|token| token.0.clone())
            .unwrap_or_default();

        Ok(Self {
            session,
            user,
            csrf_token,
        })
    }
}
