mod api;
mod middleware;

use tracing_subscriber::EnvFilter;

use cepdb_db::PgStoreRepository;
use cepdb_geocode::{GeocodeClient, Provider};
use cepdb_stores::StoreRegistry;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = cepdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = cepdb_db::PoolConfig::from_app_config(&config);
    let pool = cepdb_db::connect_pool(&config.database_url, pool_config).await?;
    cepdb_db::run_migrations(&pool).await?;

    let geocoder = GeocodeClient::new(
        Provider::from(config.geocode_provider),
        &config.geocode_base_url,
        &config.geocode_api_key,
        config.geocode_timeout_secs,
    )?;
    let registry = StoreRegistry::new(PgStoreRepository::new(pool.clone()), geocoder);

    let app = build_app(AppState {
        pool,
        registry,
        default_radius_km: config.search_radius_km,
    });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting cepdb server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
