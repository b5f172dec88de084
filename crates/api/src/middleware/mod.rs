//! Request middleware.
//!
//! - [`recover`] -- Turns a panic into a generic 500 that closes the connection.
//! - [`csrf`] -- Issues the CSRF cookie and checks form tokens on unsafe methods.
//! - [`auth`] -- Hydrates the logged-in user and guards protected routes.

pub mod auth;
pub mod csrf;
pub mod recover;
