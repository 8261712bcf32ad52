//! Read API server: a thin reference caller of the on-demand collection
//! queue and a JSON facade over the Time-Series Store. The scheduler is
//! the only process that talks to appliances; this process only talks to
//! Postgres.

use std::net::SocketAddr;

use panfm_api::routes::create_app;
use panfm_api::state::AppState;
use panfm_config::ApiConfig;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panfm_api=info,panfm_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    let store = panfm_core::PostgresStore::connect(&config.database).await?;
    store.preflight_check().await?;
    info!("database connected");

    let state = AppState { store };
    let app = create_app(state, &config.cors_allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!(%addr, "starting panfm-api");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
