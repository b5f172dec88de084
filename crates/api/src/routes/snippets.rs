//! Route definitions for snippet pages.

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::handlers::snippets;
use crate::middleware::{auth, csrf};
use crate::state::AppState;

/// ```text
/// GET       /                  -> home
/// GET       /snippet           -> show_legacy
/// GET,POST  /snippet/create    -> create_form / create (requires login)
/// GET       /snippet/{id}      -> show
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(snippets::home))
        .route("/snippet", get(snippets::show_legacy))
        .route(
            "/snippet/create",
            get(snippets::create_form)
                .post(snippets::create)
                .route_layer(from_fn(auth::require_authentication))
                .route_layer(from_fn(csrf::verify)),
        )
        .route("/snippet/{id}", get(snippets::show))
}
