use std::path::PathBuf;
use std::time::Duration;

use snippetbox_db::DbConfig;

/// Shortest accepted `SESSION_SECRET`, in bytes.
pub const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Signed-cookie session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 key used to sign session cookies.
    pub secret: String,
    /// Absolute session lifetime, stamped when the session is created.
    pub lifetime: Duration,
    /// Whether cookies carry the `Secure` attribute.
    pub secure: bool,
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database URL and the session secret has a default
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the `*.hbs` page, layout and partial templates.
    pub template_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    pub session: SessionConfig,
    pub db: DbConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default        |
    /// |---------------------------|----------------|
    /// | `HOST`                    | `0.0.0.0`      |
    /// | `PORT`                    | `4000`         |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`           |
    /// | `TEMPLATE_DIR`            | `./ui/html`    |
    /// | `STATIC_DIR`              | `./ui/static`  |
    /// | `DATABASE_URL`            | **required**   |
    /// | `DB_MAX_CONNECTIONS`      | `20`           |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `3`            |
    /// | `DB_STATEMENT_TIMEOUT_MS` | `3000`         |
    /// | `SESSION_SECRET`          | **required**   |
    /// | `SESSION_LIFETIME_HOURS`  | `12`           |
    /// | `COOKIE_SECURE`           | `true`         |
    ///
    /// # Panics
    ///
    /// Panics on a missing required variable, an unparsable value, or a
    /// session secret shorter than [`MIN_SESSION_SECRET_BYTES`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", "4000");
        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", "30");

        let template_dir =
            PathBuf::from(std::env::var("TEMPLATE_DIR").unwrap_or_else(|_| "./ui/html".into()));
        let static_dir =
            PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| "./ui/static".into()));

        let db = DbConfig {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: parse_var("DB_MAX_CONNECTIONS", "20"),
            acquire_timeout: Duration::from_secs(parse_var("DB_ACQUIRE_TIMEOUT_SECS", "3")),
            statement_timeout: Duration::from_millis(parse_var("DB_STATEMENT_TIMEOUT_MS", "3000")),
        };

        let secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(
            secret.len() >= MIN_SESSION_SECRET_BYTES,
            "SESSION_SECRET must be at least {MIN_SESSION_SECRET_BYTES} bytes"
        );
        let lifetime_hours: u64 = parse_var("SESSION_LIFETIME_HOURS", "12");
        let session = SessionConfig {
            secret,
            lifetime: Duration::from_secs(lifetime_hours * 3600),
            secure: parse_var("COOKIE_SECURE", "true"),
        };

        Self {
            host,
            port,
            request_timeout_secs,
            template_dir,
            static_dir,
            session,
            db,
        }
    }
}

fn parse_var<T>(name: &str, default: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.into());
    raw.parse()
        .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}"))
}
