use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::providers::{default_registry, redact_url};

/// Opens the pool for `cfg.url` and brings the schema in line with the
/// entity definitions.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let providers = default_registry()?;
    let provider = providers.resolve(&cfg.url)?;
    info!(
        backend = %provider.kind(),
        url = %redact_url(&cfg.url),
        "connecting to database"
    );

    let db = provider
        .open(cfg)
        .await
        .with_context(|| format!("failed to connect to {}", redact_url(&cfg.url)))?;

    info!("syncing database schema from entities");
    db.get_schema_registry("todo_board::db::entities::*")
        .sync(&db)
        .await
        .context("failed to sync database schema")?;
    Ok(db)
}
