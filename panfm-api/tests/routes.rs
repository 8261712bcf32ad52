//! Router-level integration tests against a real Postgres/TimescaleDB
//! instance. Skipped unless `TEST_DATABASE_URL` is set, same convention as
//! `panfm-core/tests/store.rs`.

use std::env;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use panfm_core::PostgresStore;
use tower::ServiceExt;

use panfm_api::routes::create_app;
use panfm_api::state::AppState;

async fn test_app() -> Option<axum::Router> {
    let url = env::var("TEST_DATABASE_URL").ok()?;
    let config =
        panfm_config::DatabaseConfig { connection_string: Some(url), ..panfm_config::DatabaseConfig::from_env() };
    let store = PostgresStore::connect(&config).await.expect("connect to test database");
    store.run_migrations().await.expect("run migrations");
    Some(create_app(AppState { store }, &[]))
}

#[tokio::test]
async fn ping_is_always_ok() {
    let Some(app) = test_app().await else { return };

    let response =
        app.oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_database_reachable() {
    let Some(app) = test_app().await else { return };

    let response =
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_device_throughput_returns_no_data_not_error() {
    let Some(app) = test_app().await else { return };

    let missing = uuid::Uuid::new_v4();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/devices/{missing}/throughput/current"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
