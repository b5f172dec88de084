//! Snippetbox web server library.
//!
//! Exposes the building blocks (config, state, error handling, sessions,
//! middleware, templates, routes) so integration tests and the binary
//! entrypoint share the exact same router.

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
