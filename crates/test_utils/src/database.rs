//! Database Test Utilities
//!
//! Testcontainer management for the PostgreSQL integration tests. The
//! container-backed tests are `#[ignore]`d by default and run where a
//! container runtime is available.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

use infra_store::PgStore;

/// A PostgreSQL test container with a migrated schema
///
/// Keeps the container handle alive for as long as the pool is in use.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub pool: PgPool,
    pub store: PgStore,
}

impl TestDatabase {
    /// Starts a fresh PostgreSQL container and applies the migrations
    ///
    /// # Errors
    ///
    /// Returns an error when the container fails to start, the pool cannot
    /// connect, or the migrations fail to apply.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container = Postgres::default().start().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await?;

        let store = PgStore::new(pool.clone());
        store.migrate().await?;

        Ok(Self {
            _container: container,
            pool,
            store,
        })
    }
}
