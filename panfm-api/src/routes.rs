use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    admin, alerts, collection, connected_devices, devices, health, logs, maintenance, notifications, settings,
    throughput,
};
use crate::state::AppState;

pub fn create_app(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let origins: Vec<_> = cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .route("/api/devices", get(devices::list_devices).post(devices::upsert_device))
        .route("/api/devices/:id", delete(devices::delete_device))
        .route("/api/devices/:id/throughput/current", get(throughput::current))
        .route("/api/devices/:id/throughput/history", get(throughput::history))
        .route("/api/devices/:id/top/categories", get(throughput::top_categories))
        .route("/api/devices/:id/top/clients", get(throughput::top_clients))
        .route("/api/devices/:id/connected-devices", get(connected_devices::list))
        .route("/api/devices/:id/collect", post(collection::enqueue))
        .route("/api/devices/:id/threat-logs", get(logs::threat_logs))
        .route("/api/devices/:id/url-filtering-logs", get(logs::url_filtering_logs))
        .route("/api/devices/:id/alerts/history", get(alerts::history))
        .route("/api/devices/:id/maintenance-windows", get(maintenance::list))
        .route("/api/devices/:id/admin/clear-data", post(admin::clear_device_data))
        .route("/api/alerts", get(alerts::list_configs).post(alerts::create_config))
        .route("/api/alerts/:id", delete(alerts::delete_config))
        .route(
            "/api/notifications/:kind",
            get(notifications::get_channel).put(notifications::upsert_channel),
        )
        .route("/api/notifications/:kind/test", post(notifications::test_channel))
        .route(
            "/api/settings/refresh-interval",
            get(settings::get_refresh_interval).put(settings::set_refresh_interval),
        )
        .route("/api/maintenance-windows", post(maintenance::create))
        .route("/api/maintenance-windows/:id", delete(maintenance::delete))
        .route("/api/admin/oldest-sample-time", get(admin::oldest_sample_time))
        .route("/api/admin/device-sample-counts", get(admin::device_sample_counts))
        .route("/api/admin/storage-stats", get(admin::storage_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(AllowOrigin::list(origins)))
        .with_state(state)
}
