use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

impl DaoLayerError {
    pub fn not_found<E>(id: Uuid) -> Self {
        Self::NotFound {
            entity: entity_name::<E>(),
            id,
        }
    }

    /// True when the database rejected a write on a unique index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        )
    }
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

/// `crate::db::entities::todo::Entity` becomes `todo`.
fn entity_name<E>() -> &'static str {
    let path = std::any::type_name::<E>();
    let module = path.strip_suffix("::Entity").unwrap_or(path);
    module.rsplit("::").next().unwrap_or(module)
}
