pub mod health;
pub mod snippets;
pub mod users;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower::ServiceBuilder;

use crate::middleware::{auth, csrf};
use crate::session;
use crate::state::AppState;

/// Build the page routes with their per-route middleware.
///
/// Route hierarchy:
///
/// ```text
/// GET       /                   home
/// GET       /snippet            show (legacy ?id= form)
/// GET,POST  /snippet/create     create form / create (auth)
/// GET       /snippet/{id}       show
/// GET,POST  /user/signup        signup form / signup
/// GET,POST  /user/login         login form / login
/// POST      /user/logout        logout
/// ```
///
/// Every route runs, outermost first: session load/persist, CSRF cookie
/// issue, then identity hydration. Token checks and the login guard are
/// attached per route so method mismatches still fall through to 405.
pub fn page_routes(state: AppState) -> Router<AppState> {
    let config = Arc::clone(&state.config);

    Router::new()
        .merge(snippets::router())
        .merge(users::router())
        .route_layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(Arc::clone(&config), session::enable))
                .layer(from_fn_with_state(config, csrf::issue))
                .layer(from_fn_with_state(state, auth::authenticate)),
        )
}
