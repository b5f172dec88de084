//! Integration tests for the health check endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, set_cookies, TestClient};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let mut client = TestClient::new(pool);
    let response = client.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        set_cookies(&response, "session").is_empty(),
        "health sits outside the session layer"
    );

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_reports_closed_pool(pool: PgPool) {
    let mut client = TestClient::new(pool.clone());
    pool.close().await;

    let response = client.get("/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}
