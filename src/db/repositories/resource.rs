//! Table-parametrized access to the resource tables.
//!
//! There is no update: a stale location is refreshed by
//! deleting all of its rows and inserting the new fetch.

use crate::domain::LocationId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// A resource table: rows keyed by `location_id`, read in insertion order.
pub trait ResourceTable: EntityTrait {
    fn location_column() -> Self::Column;

    fn order_column() -> Self::Column;
}

pub struct ResourceRepository {
    conn: DatabaseConnection,
}

impl ResourceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn select_by_location<E>(&self, location_id: LocationId) -> Result<Vec<E::Model>, DbErr>
    where
        E: ResourceTable,
    {
        E::find()
            .filter(E::location_column().eq(location_id.value()))
            .order_by_asc(E::order_column())
            .all(&self.conn)
            .await
    }

    /// Appends rows; an empty batch is a no-op.
    pub async fn insert_rows<A>(&self, rows: Vec<A>) -> Result<usize, DbErr>
    where
        A: ActiveModelTrait + Send,
    {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len();
        <A::Entity as EntityTrait>::insert_many(rows)
            .exec(&self.conn)
            .await?;

        Ok(count)
    }

    /// Removes every row for the location and returns how many went.
    pub async fn delete_by_location<E>(&self, location_id: LocationId) -> Result<u64, DbErr>
    where
        E: ResourceTable,
    {
        let result = E::delete_many()
            .filter(E::location_column().eq(location_id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
