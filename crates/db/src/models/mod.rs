//! Row models and insert DTOs.
//!
//! Entity structs derive `FromRow` + `Serialize` so handlers can pass them
//! straight to templates; nothing here carries a password hash.

pub mod snippet;
pub mod user;
