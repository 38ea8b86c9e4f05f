use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::Config;

pub mod hooks;
pub mod migrator;
pub mod repositories;

pub use repositories::commit::CommitRepository;
pub use repositories::device::DeviceRepository;
pub use repositories::device_group::DeviceGroupRepository;

/// RFC 3339 timestamp used for `created_at`, `updated_at` and `deleted_at`.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Shared handle to the fleet database. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::connect(
            &config.general.database_path,
            config.database.max_connections,
            config.database.min_connections,
            Duration::from_secs(config.database.connect_timeout_secs),
            Duration::from_secs(config.database.acquire_timeout_secs),
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        Self::connect(
            db_url,
            max_connections,
            min_connections,
            Duration::from_secs(10),
            Duration::from_secs(10),
        )
        .await
    }

    async fn connect(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        connect_timeout: Duration,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(connect_timeout)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & schema ready (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn device_group_repo(&self) -> DeviceGroupRepository {
        DeviceGroupRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn device_repo(&self) -> DeviceRepository {
        DeviceRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn commit_repo(&self) -> CommitRepository {
        CommitRepository::new(self.conn.clone())
    }
}
