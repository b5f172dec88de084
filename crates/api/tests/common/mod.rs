#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use snippetbox_api::config::{ServerConfig, SessionConfig};
use snippetbox_api::middleware::csrf::{mask_token, parse_secret, CSRF_COOKIE, CSRF_FIELD};
use snippetbox_api::router::build_app_router;
use snippetbox_api::state::AppState;
use snippetbox_api::templates::TemplateCache;
use snippetbox_db::DbConfig;

pub const TEST_PASSWORD: &str = "pa$$word-long-enough";

/// Build a test `ServerConfig` pointing at the repository's `ui/` assets.
///
/// Cookies are not marked `Secure` so they can be replayed over plain HTTP.
pub fn test_config() -> ServerConfig {
    let ui = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../ui");
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        template_dir: ui.join("html"),
        static_dir: ui.join("static"),
        session: SessionConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            lifetime: Duration::from_secs(12 * 3600),
            secure: false,
        },
        db: DbConfig {
            url: String::new(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
            statement_timeout: Duration::from_secs(3),
        },
    }
}

/// Build the full application router over `pool`, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let templates = TemplateCache::load(&config.template_dir).expect("templates should load");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        templates: Arc::new(templates),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Client with a cookie jar
// ---------------------------------------------------------------------------

/// Drives the router like a browser: remembers cookies between requests and
/// fills in the CSRF field on form posts.
pub struct TestClient {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl TestClient {
    pub fn new(pool: PgPool) -> Self {
        Self {
            app: build_test_app(pool),
            cookies: BTreeMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn forget_cookie(&mut self, name: &str) {
        self.cookies.remove(name);
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if !self.cookies.is_empty() {
            let header_value = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, header_value.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();
        self.store_cookies(&response);
        response
    }

    pub async fn get(&mut self, path: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a form with a valid CSRF token added.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let token = self.csrf_token().await;
        let mut all: Vec<(&str, &str)> = fields.to_vec();
        all.push((CSRF_FIELD, token.as_str()));
        self.post_raw(path, encode_form(&all)).await
    }

    /// POST an already encoded body as a form, without adding a token.
    pub async fn post_raw(&mut self, path: &str, body: String) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// A masked token for the current CSRF cookie, fetching a page first
    /// if no cookie has been issued yet.
    pub async fn csrf_token(&mut self) -> String {
        if self.cookie(CSRF_COOKIE).is_none() {
            self.get("/user/login").await;
        }
        let secret = parse_secret(self.cookie(CSRF_COOKIE).expect("csrf cookie should be set"))
            .expect("csrf cookie should hold a secret");
        mask_token(&secret)
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/user/signup",
            &[("name", name), ("email", email), ("password", password)],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Response<Body> {
        self.post_form("/user/login", &[("email", email), ("password", password)])
            .await
    }

    /// Sign up and log in a fresh account.
    pub async fn sign_in_as(&mut self, email: &str) {
        self.signup("Test User", email, TEST_PASSWORD).await;
        let response = self.login(email, TEST_PASSWORD).await;
        assert_eq!(response.status(), 303, "login should redirect");
    }

    fn store_cookies(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let mut attributes = raw.split(';').map(str::trim);
            let Some((name, value)) = attributes.next().and_then(|pair| pair.split_once('='))
            else {
                continue;
            };
            let expired = attributes.any(|attr| attr.eq_ignore_ascii_case("Max-Age=0"));
            if expired {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
}

/// All `Set-Cookie` values for `name`.
pub fn set_cookies<'a>(response: &'a Response<Body>, name: &str) -> Vec<&'a str> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&prefix))
        .collect()
}

// ---------------------------------------------------------------------------
// Form encoding
// ---------------------------------------------------------------------------

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    count
}
