use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel, Order,
    PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{HasIdActiveModel, HasOrderColumns, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

type Model<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
type ActiveModel<D> = <<D as DaoBase>::Entity as EntityTrait>::ActiveModel;
type Column<D> = <<D as DaoBase>::Entity as EntityTrait>::Column;

/// One page of rows. `more` is set when a further page exists.
#[derive(Debug, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub more: bool,
}

/// Lazily fetches consecutive pages of the same query.
pub struct Pages<D, F>
where
    D: DaoBase,
{
    dao: D,
    next: Option<u64>,
    per_page: u64,
    order: Option<(Column<D>, Order)>,
    filter: F,
}

impl<D, F> Pages<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
    Column<D>: Clone,
{
    pub async fn next_page(&mut self) -> DaoResult<Option<Page<Model<D>>>> {
        let Some(page) = self.next else {
            return Ok(None);
        };
        let fetched = self
            .dao
            .find_page(page, self.per_page, self.order.clone(), self.filter.clone())
            .await?;
        self.next = fetched.more.then(|| page + 1);
        Ok(Some(fetched))
    }

    pub async fn collect_all(mut self) -> DaoResult<Vec<Model<D>>> {
        let mut rows = Vec::new();
        while let Some(page) = self.next_page().await? {
            rows.extend(page.items);
        }
        Ok(rows)
    }
}

/// Shared CRUD for entities declared with `#[base_entity]`.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    Model<Self>: FromQueryResult + IntoActiveModel<ActiveModel<Self>> + Send + Sync,
    ActiveModel<Self>:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: HasOrderColumns,
{
    type Entity: EntityTrait + Send + Sync;
    const PAGE_LIMIT: u64 = 100;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    /// Fresh id and timestamps, not yet saved. Lets callers insert inside
    /// their own transaction.
    fn stamped(data: impl IntoActiveModel<ActiveModel<Self>>) -> ActiveModel<Self> {
        let mut active = data.into_active_model();
        active.set_id(Uuid::new_v4());
        active.stamp_new(Utc::now().fixed_offset());
        active
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<ActiveModel<Self>> + Send,
    ) -> DaoResult<Model<Self>> {
        Ok(Self::stamped(data).insert(self.db()).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<Model<Self>> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| DaoLayerError::not_found::<Self::Entity>(id))
    }

    async fn exists(&self, id: Uuid) -> DaoResult<bool> {
        let found = Self::Entity::find_by_id(id).one(self.db()).await?;
        Ok(found.is_some())
    }

    /// `page` starts at 1. Without an explicit order rows come oldest first.
    /// Ties always fall back to the id so page boundaries stay stable.
    async fn find_page(
        &self,
        page: u64,
        per_page: u64,
        order: Option<(Column<Self>, Order)>,
        filter: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Page<Model<Self>>> {
        if page == 0 || !(1..=Self::PAGE_LIMIT).contains(&per_page) {
            return Err(DaoLayerError::InvalidPagination {
                page,
                page_size: per_page,
            });
        }

        let query = match order {
            Some((column, direction)) => filter(Self::Entity::find()).order_by(column, direction),
            None => filter(Self::Entity::find()).order_by_asc(Self::Entity::created_at_column()),
        }
        .order_by_asc(Self::Entity::id_column());
        // one extra row tells us whether another page exists
        let mut items = query
            .offset((page - 1).saturating_mul(per_page))
            .limit(per_page + 1)
            .all(self.db())
            .await?;
        let more = items.len() as u64 > per_page;
        items.truncate(per_page as usize);

        Ok(Page {
            items,
            page,
            per_page,
            more,
        })
    }

    fn pages<F>(
        &self,
        per_page: Option<u64>,
        order: Option<(Column<Self>, Order)>,
        filter: F,
    ) -> Pages<Self, F>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Clone + Send,
    {
        Pages {
            dao: self.clone(),
            next: Some(1),
            per_page: per_page.unwrap_or(Self::PAGE_LIMIT),
            order,
            filter,
        }
    }

    /// Every row, oldest first.
    async fn list_all(&self) -> DaoResult<Vec<Model<Self>>>
    where
        Column<Self>: Clone,
    {
        self.pages(None, None, |query| query).collect_all().await
    }

    /// Loads the row, lets `apply` edit it and bumps `updated_at`.
    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<Model<Self>>
    where
        F: for<'a> FnOnce(&'a mut ActiveModel<Self>) + Send,
    {
        let mut active = self.find_by_id(id).await?.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());
        Ok(active.update(self.db()).await?)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id).exec(self.db()).await?;
        if result.rows_affected == 0 {
            return Err(DaoLayerError::not_found::<Self::Entity>(id));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::DaoBase;
    use crate::db::dao::{DaoLayerError, TodoDao};
    use crate::db::entities::todo;

    fn row(title: &str) -> todo::Model {
        let ts = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        todo::Model {
            id: Uuid::new_v4(),
            created_at: ts,
            updated_at: ts,
            title: title.to_string(),
            description: None,
            due_date: None,
            priority: "medium".to_string(),
            status: "pending".to_string(),
            category_id: None,
        }
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let dao = TodoDao::new(&MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = dao
            .find_page(0, 10, None, |query| query)
            .await
            .expect_err("page 0 should be rejected");
        assert!(matches!(err, DaoLayerError::InvalidPagination { page: 0, .. }));
    }

    #[tokio::test]
    async fn extra_row_marks_another_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("a"), row("b"), row("c")]])
            .into_connection();
        let page = TodoDao::new(&db)
            .find_page(1, 2, None, |query| query)
            .await
            .expect("page should load");
        assert!(page.more);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn equal_timestamps_are_ordered_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("a")]])
            .into_connection();
        TodoDao::new(&db)
            .find_page(1, 10, None, |query| query)
            .await
            .expect("page should load");

        let log = db.into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        let order_by = sql.find("ORDER BY").expect("query should be ordered");
        let created = sql.find(r#""created_at" ASC"#).expect("created_at should sort first");
        let id = sql.find(r#""id" ASC"#).expect("id should break ties");
        assert!(order_by < created && created < id, "unexpected order in {sql}");
    }

    #[tokio::test]
    async fn pages_stop_after_a_short_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("a"), row("b"), row("c")], vec![row("d")]])
            .into_connection();
        let titles: Vec<String> = TodoDao::new(&db)
            .pages(Some(2), None, |query| query)
            .collect_all()
            .await
            .expect("pages should load")
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(titles, ["a", "b", "d"]);
    }
}
