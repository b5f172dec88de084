//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return [`StoreError`].
//!
//! [`StoreError`]: crate::StoreError

pub mod snippet_repo;
pub mod user_repo;

pub use snippet_repo::SnippetRepo;
pub use user_repo::UserRepo;
