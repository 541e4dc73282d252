use tracing::info;
use uuid::Uuid;

use crate::{
    db::dao::{CategoryDao, DaoBase, UserDao},
    db::entities::category,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Clone)]
pub struct CategoryService {
    category_dao: CategoryDao,
    user_dao: UserDao,
}

impl CategoryService {
    pub fn new(category_dao: CategoryDao, user_dao: UserDao) -> Self {
        Self {
            category_dao,
            user_dao,
        }
    }

    pub async fn list(&self) -> Result<Vec<category::Model>, AppError> {
        CrudService::list_all(self).await
    }

    /// `name` must already be trimmed and non-empty. An owner, when given,
    /// must exist.
    pub async fn create(
        &self,
        name: &str,
        user_id: Option<Uuid>,
    ) -> Result<category::Model, AppError> {
        if let Some(user_id) = user_id {
            let owner_exists = self
                .user_dao
                .exists(user_id)
                .await
                .map_err(|err| self.map_error(CrudOp::Find, err))?;
            if !owner_exists {
                return Err(AppError::bad_request("User does not exist"));
            }
        }

        self.category_dao
            .create_category(name, user_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let detached = self
            .category_dao
            .delete_detaching_todos(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))?;
        info!(category_id = %id, detached, "category deleted");
        Ok(())
    }
}

impl CrudService for CategoryService {
    type Dao = CategoryDao;

    fn dao(&self) -> &Self::Dao {
        &self.category_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Error creating category",
            find_failed: "Error fetching categories",
            not_found: "Category not found",
            conflict: "Category already exists",
            update_failed: "Error updating category",
            delete_failed: "Error deleting category",
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::CategoryService;
    use crate::db::dao::DaoContext;
    use crate::db::entities::user;
    use crate::error::AppError;

    fn service(db: MockDatabase) -> CategoryService {
        let daos = DaoContext::new(&db.into_connection());
        CategoryService::new(daos.category(), daos.user())
    }

    #[tokio::test]
    async fn create_rejects_unknown_owner() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let err = svc
            .create("Work", Some(Uuid::new_v4()))
            .await
            .expect_err("unknown owner should be rejected");
        assert_eq!(err, AppError::bad_request("User does not exist"));
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ]));

        let err = svc
            .delete(Uuid::new_v4())
            .await
            .expect_err("delete should fail");
        assert_eq!(err, AppError::not_found("Category not found"));
    }
}
