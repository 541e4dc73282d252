use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{
    pool_options,
    registry::{DbKind, DbProvider},
};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteDbProvider;

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn kind(&self) -> DbKind {
        DbKind::Sqlite
    }

    fn schemes(&self) -> &'static [&'static str] {
        &["sqlite:"]
    }

    async fn open(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = pool_options(cfg);
        // PRAGMAs are per connection, so they go on the connect options.
        options.map_sqlx_sqlite_opts(|opts| {
            opts.foreign_keys(true).busy_timeout(SQLITE_BUSY_TIMEOUT)
        });
        // Each pooled connection would get its own empty in-memory database.
        if is_in_memory(&cfg.url) {
            options.max_connections(1).min_connections(1);
        }
        Ok(Database::connect(options).await?)
    }
}
