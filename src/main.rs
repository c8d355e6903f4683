//! Service entry point
//!
//! Initialization order matters: configuration is validated before the pool
//! is built, the pool is built before the schema check, and the pool is
//! closed only after the listener has drained.

use ledgerdash::config::AppConfig;
use ledgerdash::core::revalidate::RevalidateBus;
use ledgerdash::server::{self, AppState};
use ledgerdash::storage::{PgDashboardStore, postgres};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ledgerdash=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = postgres::connect(&config.database).await?;
    postgres::ensure_schema(&pool).await?;
    tracing::info!(host = %config.database.host, "connected to PostgreSQL");

    let store = Arc::new(PgDashboardStore::new(pool.clone()));
    let state = AppState::from_store(store, RevalidateBus::default());

    server::serve(&config.server.listen_addr, state).await?;

    // Teardown: the listener has drained, release the pool.
    pool.close().await;
    Ok(())
}
