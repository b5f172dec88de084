//! Route definitions for the `/user` pages.

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::middleware::csrf;
use crate::state::AppState;

/// ```text
/// GET,POST  /user/signup   -> signup_form / signup
/// GET,POST  /user/login    -> login_form / login
/// POST      /user/logout   -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/user/signup",
            get(users::signup_form)
                .post(users::signup)
                .route_layer(from_fn(csrf::verify)),
        )
        .route(
            "/user/login",
            get(users::login_form)
                .post(users::login)
                .route_layer(from_fn(csrf::verify)),
        )
        .route(
            "/user/logout",
            post(users::logout).route_layer(from_fn(csrf::verify)),
        )
}
