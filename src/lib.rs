pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod services;

use anyhow::Context;
pub use config::Config;
pub use db::Store;
pub use error::{FleetError, FleetResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config)?;

    let store = Store::from_config(&config)
        .await
        .with_context(|| format!("Failed to open store at {}", config.general.database_path))?;
    store.ping().await.context("Store did not answer ping")?;

    let rules = config.group_rules()?;
    info!(?rules, "Fleet store ready at {}", config.general.database_path);

    Ok(())
}
