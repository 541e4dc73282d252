//! Implemented for every entity by `#[base_entity]`.

/// Columns the DAO layer sorts on. `id` breaks ties between equal timestamps.
pub trait HasOrderColumns: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);

    fn stamp_new(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
        self.set_created_at(ts);
        self.set_updated_at(ts);
    }
}
