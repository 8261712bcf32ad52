//! Integration tests against a real Postgres/TimescaleDB instance. Skipped
//! unless `TEST_DATABASE_URL` is set, since these exercise migrations and
//! hypertable-backed tables a throwaway CI database may not provide.

use std::env;

use chrono::{Duration, Utc};
use panfm_core::store::Resolution;
use panfm_core::PostgresStore;
use panfm_model::{
    AlertConfig, AlertConfigId, ComparisonOperator, Device, DeviceId, NotificationChannelKind,
    Severity,
};
use uuid::Uuid;

async fn connect() -> Option<PostgresStore> {
    let url = env::var("TEST_DATABASE_URL").ok()?;
    let config = panfm_config::DatabaseConfig {
        connection_string: Some(url),
        ..panfm_config::DatabaseConfig::from_env()
    };
    let store = PostgresStore::connect(&config).await.expect("connect to test database");
    store.run_migrations().await.expect("run migrations");
    Some(store)
}

#[tokio::test]
async fn device_upsert_roundtrips() {
    let Some(store) = connect().await else { return };

    let device = Device {
        id: DeviceId::from(Uuid::new_v4()),
        name: "fw-test-1".into(),
        ip: "10.0.0.1".into(),
        credential_ref: "fw-test-1".into(),
        enabled: true,
    };

    store.upsert_device(&device).await.unwrap();
    let fetched = store.get_device(device.id).await.unwrap().expect("device present");
    assert_eq!(fetched, device);

    let disabled = Device { enabled: false, ..device.clone() };
    store.upsert_device(&disabled).await.unwrap();
    let fetched = store.get_device(device.id).await.unwrap().unwrap();
    assert!(!fetched.enabled);

    store.delete_device(device.id).await.unwrap();
    assert!(store.get_device(device.id).await.unwrap().is_none());
}

#[tokio::test]
async fn sample_query_returns_success_for_empty_range() {
    let Some(store) = connect().await else { return };

    let device = Device {
        id: DeviceId::from(Uuid::new_v4()),
        name: "fw-test-empty".into(),
        ip: "10.0.0.2".into(),
        credential_ref: "fw-test-empty".into(),
        enabled: true,
    };
    store.upsert_device(&device).await.unwrap();

    let end = Utc::now() - Duration::days(365);
    let start = end - Duration::hours(1);
    let result = store.query_samples(device.id, start, end, Resolution::Auto).await.unwrap();

    assert_eq!(result.status, "success");
    assert!(result.samples.is_empty());
    assert!(result.message.is_some());

    store.delete_device(device.id).await.unwrap();
}

#[tokio::test]
async fn alert_config_cooldown_blocks_repeat_dispatch() {
    let Some(store) = connect().await else { return };

    let device = Device {
        id: DeviceId::from(Uuid::new_v4()),
        name: "fw-test-alert".into(),
        ip: "10.0.0.3".into(),
        credential_ref: "fw-test-alert".into(),
        enabled: true,
    };
    store.upsert_device(&device).await.unwrap();

    let config = AlertConfig {
        id: AlertConfigId::from(Uuid::new_v4()),
        device_id: Some(device.id),
        metric_type: "total_mbps".into(),
        operator: ComparisonOperator::GreaterThan,
        threshold_value: 900.0,
        severity: Severity::Critical,
        enabled: true,
        notification_channels: vec![NotificationChannelKind::Email],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let created = store.create_alert_config(&config).await.unwrap();
    assert_eq!(created.threshold_value, 900.0);
    assert_eq!(created.notification_channels, vec![NotificationChannelKind::Email]);

    assert!(store.get_cooldown(device.id, created.id).await.unwrap().is_none());

    let cooldown = panfm_model::AlertCooldown {
        alert_config_id: created.id,
        device_id: device.id,
        expires_at: Utc::now() + Duration::seconds(300),
    };
    store.upsert_cooldown(&cooldown).await.unwrap();

    let fetched = store.get_cooldown(device.id, created.id).await.unwrap();
    assert!(fetched.is_some());

    store.delete_alert_config(created.id).await.unwrap();
    store.delete_device(device.id).await.unwrap();
}
