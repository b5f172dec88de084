use std::sync::Arc;

use crate::config::ServerConfig;
use crate::templates::TemplateCache;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: snippetbox_db::DbPool,
    /// Server configuration (read by the session and CSRF layers).
    pub config: Arc<ServerConfig>,
    /// Parsed page templates, built once at startup.
    pub templates: Arc<TemplateCache>,
}
