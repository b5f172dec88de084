//! Snippetbox domain core.
//!
//! Holds the pieces with no I/O: shared id/timestamp types, the domain error
//! enum, form validation, password hashing, and the snippet/account rules
//! that both the store and the HTTP layer rely on.

pub mod accounts;
pub mod error;
pub mod forms;
pub mod password;
pub mod snippets;
pub mod types;
