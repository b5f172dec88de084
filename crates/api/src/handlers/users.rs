//! Handlers for signup, login and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use snippetbox_core::accounts::{
    validate_login_form, validate_signup_form, MSG_DUPLICATE_EMAIL, MSG_INVALID_CREDENTIALS,
};
use snippetbox_core::forms::FormData;
use snippetbox_db::models::user::CreateUser;
use snippetbox_db::repositories::UserRepo;
use snippetbox_db::StoreError;

use super::render;
use crate::context::RequestContext;
use crate::error::AppResult;
use crate::state::AppState;

pub const MSG_SIGNUP_DONE: &str = "Your signup was successful. Please log in.";
pub const MSG_LOGGED_OUT: &str = "You've been logged out successfully!";

/// Form key for messages that belong to the whole form, not one field.
pub const GENERIC_ERROR_KEY: &str = "generic";

/// GET /user/signup
pub async fn signup_form(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let mut data = ctx.template_data();
    data.form = Some(FormData::default());
    render(&state, StatusCode::OK, "signup.page", &data)
}

/// POST /user/signup
pub async fn signup(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let mut form = FormData::new(fields);
    validate_signup_form(&mut form);

    if !form.is_valid() {
        return rerender(&state, &ctx, "signup.page", form);
    }

    let input = CreateUser {
        name: form.get("name").to_string(),
        email: form.get("email").to_string(),
        password: form.get("password").to_string(),
    };

    match UserRepo::create(&state.pool, &input).await {
        Ok(_) => {
            ctx.session().put_flash(MSG_SIGNUP_DONE);
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(StoreError::DuplicateEmail) => {
            form.errors.add("email", MSG_DUPLICATE_EMAIL);
            rerender(&state, &ctx, "signup.page", form)
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /user/login
pub async fn login_form(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let mut data = ctx.template_data();
    data.form = Some(FormData::default());
    render(&state, StatusCode::OK, "login.page", &data)
}

/// POST /user/login
///
/// Blank fields are reported without consulting the store. An unknown email
/// and a wrong password produce the same message.
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let mut form = FormData::new(fields);
    validate_login_form(&mut form);

    if !form.is_valid() {
        return rerender(&state, &ctx, "login.page", form);
    }

    match UserRepo::authenticate(&state.pool, form.get("email"), form.get("password")).await {
        Ok(user_id) => {
            ctx.session().set_user_id(user_id);
            tracing::info!(user_id, "User logged in");
            Ok(Redirect::to("/snippet/create").into_response())
        }
        Err(StoreError::InvalidCredentials) => {
            form.errors.add(GENERIC_ERROR_KEY, MSG_INVALID_CREDENTIALS);
            rerender(&state, &ctx, "login.page", form)
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /user/logout
///
/// Drops the identity but keeps the session, which still has to carry the
/// flash message to the next page.
pub async fn logout(ctx: RequestContext) -> Response {
    let session = ctx.session();
    if let Some(user_id) = session.user_id() {
        tracing::info!(user_id, "User logged out");
    }
    session.remove(crate::session::AUTH_USER_KEY);
    session.put_flash(MSG_LOGGED_OUT);
    Redirect::to("/").into_response()
}

/// Re-render a rejected form with status 400. The password is never echoed.
fn rerender(
    state: &AppState,
    ctx: &RequestContext,
    page: &str,
    mut form: FormData,
) -> AppResult<Response> {
    form.forget("password");
    let mut data = ctx.template_data();
    data.form = Some(form);
    render(state, StatusCode::BAD_REQUEST, page, &data)
}
