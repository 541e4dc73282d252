use uuid::Uuid;

use crate::{
    db::dao::{CategoryDao, DaoBase, TodoDao, TodoFields},
    db::entities::todo,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
    category_dao: CategoryDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao, category_dao: CategoryDao) -> Self {
        Self {
            todo_dao,
            category_dao,
        }
    }

    pub async fn list(&self) -> Result<Vec<todo::Model>, AppError> {
        CrudService::list_all(self).await
    }

    pub async fn get(&self, id: Uuid) -> Result<todo::Model, AppError> {
        CrudService::find_by_id(self, id).await
    }

    pub async fn create(&self, fields: TodoFields) -> Result<todo::Model, AppError> {
        self.ensure_category(fields.category_id).await?;
        self.todo_dao
            .create_todo(fields)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    /// Overwrites every field, so a `None` category detaches the todo.
    pub async fn replace(&self, id: Uuid, fields: TodoFields) -> Result<todo::Model, AppError> {
        self.ensure_category(fields.category_id).await?;
        self.todo_dao
            .replace_todo(id, fields)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        CrudService::delete(self, id).await
    }

    async fn ensure_category(&self, category_id: Option<Uuid>) -> Result<(), AppError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        let exists = self
            .category_dao
            .exists(category_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if !exists {
            return Err(AppError::bad_request("Category does not exist"));
        }
        Ok(())
    }
}

impl CrudService for TodoService {
    type Dao = TodoDao;

    fn dao(&self) -> &Self::Dao {
        &self.todo_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Error creating todo",
            find_failed: "Error fetching todos",
            not_found: "Todo not found",
            conflict: "Todo already exists",
            update_failed: "Error updating todo",
            delete_failed: "Error deleting todo",
        }
    }
}
