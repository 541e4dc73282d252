use axum::Router;
use sea_orm::{DatabaseConnection, MockDatabase};

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::build_app,
    state::AppState,
};

/// The full app over `db`, with default config.
pub fn test_app(db: DatabaseConnection) -> anyhow::Result<Router> {
    build_app(AppState::new(AppConfig::default(), db))
}

pub fn mock_app(db: MockDatabase) -> anyhow::Result<Router> {
    test_app(db.into_connection())
}

/// A fresh in-memory SQLite database with the schema applied.
pub async fn sqlite_app() -> anyhow::Result<Router> {
    let db = connection::connect(&DatabaseConfig::in_memory_sqlite()).await?;
    test_app(db)
}
