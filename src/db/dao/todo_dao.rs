use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo::{self, TodoPriority, TodoStatus};

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

/// Every writable column of a todo. Creates and updates both write all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: TodoPriority,
    pub status: TodoStatus,
    pub category_id: Option<Uuid>,
}

impl TodoFields {
    fn write_to(self, active: &mut todo::ActiveModel) {
        active.title = Set(self.title);
        active.description = Set(self.description);
        active.due_date = Set(self.due_date);
        active.priority = Set(self.priority.as_str().to_string());
        active.status = Set(self.status.as_str().to_string());
        active.category_id = Set(self.category_id);
    }
}

impl DaoBase for TodoDao {
    type Entity = Todo;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    pub async fn create_todo(&self, fields: TodoFields) -> DaoResult<todo::Model> {
        let mut model = todo::ActiveModel::default();
        fields.write_to(&mut model);
        self.create(model).await
    }

    pub async fn replace_todo(&self, id: Uuid, fields: TodoFields) -> DaoResult<todo::Model> {
        self.update(id, move |active| fields.write_to(active)).await
    }
}
