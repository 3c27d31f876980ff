//! Postgres container shared by every test in a binary.
//!
//! The container starts once; each test gets its own freshly migrated
//! database so ledger positions never leak between tests.

use std::sync::Arc;

use anyhow::{Context, Result};
use api_core::kernel::stores::PostgresStore;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

struct SharedPostgres {
    base_url: String,
    // Keep the container alive for the whole test run
    _container: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<Option<SharedPostgres>> = OnceCell::const_new();

impl SharedPostgres {
    async fn start() -> Result<Self> {
        let container = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        Ok(Self {
            base_url: format!("postgresql://postgres:postgres@{}:{}", host, port),
            _container: container,
        })
    }

    async fn get() -> Option<&'static Self> {
        SHARED_POSTGRES
            .get_or_init(|| async {
                match Self::start().await {
                    Ok(shared) => Some(shared),
                    Err(e) => {
                        eprintln!("skipping Postgres tests, no container runtime: {:#}", e);
                        None
                    }
                }
            })
            .await
            .as_ref()
    }
}

pub struct PostgresHarness {
    pub store: Arc<PostgresStore>,
}

impl PostgresHarness {
    /// A migrated, empty database. `None` when Docker is not available.
    pub async fn new() -> Option<Self> {
        let shared = SharedPostgres::get().await?;
        Some(
            Self::create_database(&shared.base_url)
                .await
                .expect("Failed to prepare test database"),
        )
    }

    async fn create_database(base_url: &str) -> Result<Self> {
        let admin = PgPool::connect(&format!("{}/postgres", base_url))
            .await
            .context("Failed to connect to Postgres")?;
        let name = format!("swipr_test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE DATABASE {}", name))
            .execute(&admin)
            .await?;
        admin.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(&format!("{}/{}", base_url, name))
            .await
            .context("Failed to connect to test database")?;
        let store = PostgresStore::from_pool(pool);
        store.run_migrations().await?;

        Ok(Self {
            store: Arc::new(store),
        })
    }
}
