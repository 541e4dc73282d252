use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{Category, User};
use crate::db::entities::{category, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

/// Result of a checked registration.
#[derive(Debug)]
pub enum Registration {
    Created(user::Model),
    AlreadyExists,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_one_where(user::Column::Email.eq(email)).await
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find_one_where(user::Column::Username.eq(username)).await
    }

    /// Another user already holding `email` or `username`, if any.
    pub async fn find_conflicting(
        &self,
        email: &str,
        username: &str,
        except: Option<Uuid>,
    ) -> DaoResult<Option<user::Model>> {
        let mut condition = Condition::all().add(identity_taken(email, username));
        if let Some(id) = except {
            condition = condition.add(user::Column::Id.ne(id));
        }
        self.find_one_where(condition).await
    }

    async fn find_one_where<F>(&self, filter: F) -> DaoResult<Option<user::Model>>
    where
        F: sea_orm::sea_query::IntoCondition + Send + 'static,
    {
        self.find_page(1, 1, None, move |query| query.filter(filter))
            .await
            .map(|page| page.items.into_iter().next())
    }

    /// Inserts `data` unless its email or username is already taken. The check
    /// and the insert share one transaction.
    pub async fn register(&self, data: user::ActiveModel) -> DaoResult<Registration> {
        let email = active_string(&data.email);
        let username = active_string(&data.username);

        let txn = self.db.begin().await?;
        let existing = User::find()
            .filter(identity_taken(&email, &username))
            .one(&txn)
            .await?;
        if existing.is_some() {
            txn.rollback().await?;
            return Ok(Registration::AlreadyExists);
        }

        let created = Self::stamped(data).insert(&txn).await?;
        txn.commit().await?;
        Ok(Registration::Created(created))
    }

    /// Deletes the user and clears ownership on their categories.
    pub async fn delete_detaching_categories(&self, id: Uuid) -> DaoResult<Uuid> {
        let txn = self.db.begin().await?;
        Category::update_many()
            .col_expr(category::Column::UserId, Expr::value(Option::<Uuid>::None))
            .filter(category::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        let result = User::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DaoLayerError::not_found::<User>(id));
        }

        txn.commit().await?;
        Ok(id)
    }
}

fn identity_taken(email: &str, username: &str) -> Condition {
    Condition::any()
        .add(user::Column::Email.eq(email))
        .add(user::Column::Username.eq(username))
}

fn active_string(value: &sea_orm::ActiveValue<String>) -> String {
    value.try_as_ref().cloned().unwrap_or_default()
}
