use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::db::dao::{DaoBase, DaoLayerError};
use crate::error::AppError;

type CrudEntity<D> = <D as DaoBase>::Entity;
type CrudModel<D> = <CrudEntity<D> as EntityTrait>::Model;

/// Client-facing messages used when a DAO call fails.
#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub not_found: &'static str,
    pub conflict: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            create_failed: "Create failed",
            find_failed: "Find failed",
            not_found: "Resource not found",
            conflict: "Resource already exists",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

#[async_trait::async_trait]
pub trait CrudService {
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            err @ DaoLayerError::Db(_) if err.is_unique_violation() => {
                AppError::conflict(errors.conflict)
            }
            DaoLayerError::Db(db_err) => {
                let context = match op {
                    CrudOp::Create => errors.create_failed,
                    CrudOp::Find | CrudOp::List => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                    CrudOp::Delete => errors.delete_failed,
                };
                let message = format!("{context}. Please check the logs for more details");
                AppError::internal_with_source(message, db_err)
            }
            DaoLayerError::NotFound { .. } => AppError::not_found(errors.not_found),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn list_all(&self) -> Result<Vec<CrudModel<Self::Dao>>, AppError> {
        self.dao()
            .list_all()
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.dao()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use super::{CrudErrors, CrudOp, CrudService};
    use crate::db::dao::{DaoBase, DaoLayerError, TodoDao};
    use crate::error::AppError;

    struct NamedTodos {
        dao: TodoDao,
    }

    impl CrudService for NamedTodos {
        type Dao = TodoDao;

        fn dao(&self) -> &Self::Dao {
            &self.dao
        }

        fn errors(&self) -> CrudErrors {
            CrudErrors {
                not_found: "Todo not found",
                update_failed: "Todo update failed",
                ..CrudErrors::default()
            }
        }
    }

    fn service(db: MockDatabase) -> NamedTodos {
        NamedTodos {
            dao: TodoDao::new(&db.into_connection()),
        }
    }

    #[test]
    fn database_errors_become_opaque_internal_errors() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));
        let err = svc.map_error(
            CrudOp::Update,
            DaoLayerError::Db(DbErr::Custom("constraint todos_pkey".into())),
        );
        assert_eq!(
            err,
            AppError::internal("Todo update failed. Please check the logs for more details")
        );
    }

    #[tokio::test]
    async fn missing_rows_use_the_service_message() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<crate::db::entities::todo::Model>::new()]),
        );
        let err = svc
            .find_by_id(Uuid::new_v4())
            .await
            .expect_err("lookup should fail");
        assert_eq!(err, AppError::not_found("Todo not found"));
    }
}
