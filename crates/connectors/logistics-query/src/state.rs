//! Transient state used by the service.
//!
//! This is initialized on startup.

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tracing::{info_span, Instrument};

use logistics_query_configuration::{Configuration, ConnectionUri, PoolSettings};
use query_engine_execution::metrics;

/// State for our service.
#[derive(Clone)]
pub struct ServerState {
    pub pool: PgPool,
    pub metrics: metrics::Metrics,
    pub metrics_registry: prometheus::Registry,
}

/// Create a connection pool and wrap it inside a ServerState.
pub async fn create_state(configuration: &Configuration) -> Result<ServerState, InitializationError> {
    let pool = create_pool(&configuration.connection_uri, &configuration.pool_settings)
        .instrument(info_span!("Create connection pool"))
        .await?;

    state_from_pool(pool)
}

/// Wrap an existing pool inside a ServerState with a fresh metrics registry.
pub fn state_from_pool(pool: PgPool) -> Result<ServerState, InitializationError> {
    let mut metrics_registry = prometheus::Registry::new();

    let metrics = info_span!("Setup metrics").in_scope(|| {
        let metrics = metrics::Metrics::initialize(&mut metrics_registry)
            .map_err(InitializationError::MetricsError)?;
        metrics.update_pool_metrics(&pool);
        Ok::<_, InitializationError>(metrics)
    })?;

    Ok(ServerState {
        pool,
        metrics,
        metrics_registry,
    })
}

/// Create a connection pool with the given settings, and check that it can connect.
pub async fn create_pool(
    connection_uri: &ConnectionUri,
    pool_settings: &PoolSettings,
) -> Result<PgPool, InitializationError> {
    tracing::info!(
        uri = %connection_uri.redacted(),
        max_connections = pool_settings.max_connections,
        "Connecting to the database"
    );

    pool_options(pool_settings)
        .connect(connection_uri.as_str())
        .await
        .map_err(InitializationError::UnableToCreatePool)
}

/// Pool options for the given settings.
pub fn pool_options(pool_settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .acquire_timeout(pool_settings.acquire_timeout())
        .idle_timeout(pool_settings.idle_timeout())
        .max_lifetime(pool_settings.max_lifetime())
        // check connections are still alive before handing them out
        .test_before_acquire(true)
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to initialize connection pool: {0}")]
    UnableToCreatePool(sqlx::Error),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
