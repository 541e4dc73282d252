use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{Category, Todo};
use crate::db::entities::{category, todo};

#[derive(Clone)]
pub struct CategoryDao {
    db: DatabaseConnection,
}

impl DaoBase for CategoryDao {
    type Entity = Category;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CategoryDao {
    pub async fn create_category(
        &self,
        name: &str,
        user_id: Option<Uuid>,
    ) -> DaoResult<category::Model> {
        let model = category::ActiveModel {
            name: Set(name.to_string()),
            user_id: Set(user_id),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Deletes the category after clearing `category_id` on its todos and
    /// returns how many todos were detached.
    pub async fn delete_detaching_todos(&self, id: Uuid) -> DaoResult<u64> {
        let txn = self.db.begin().await?;
        let detached = Todo::update_many()
            .col_expr(todo::Column::CategoryId, Expr::value(Option::<Uuid>::None))
            .filter(todo::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        let result = Category::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DaoLayerError::not_found::<Category>(id));
        }

        txn.commit().await?;
        Ok(detached.rows_affected)
    }
}
