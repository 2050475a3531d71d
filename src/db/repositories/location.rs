use crate::domain::LocationId;
use crate::entities::{locations, prelude::*};
use crate::models::location::{Location, NewLocation};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Exact, case-sensitive match on the original search string.
    pub async fn find_by_query(&self, query: &str) -> Result<Option<Location>, DbErr> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(query))
            .one(&self.conn)
            .await?;

        Ok(row.map(Location::from))
    }

    pub async fn get(&self, id: LocationId) -> Result<Option<Location>, DbErr> {
        let row = Locations::find_by_id(id.value()).one(&self.conn).await?;
        Ok(row.map(Location::from))
    }

    /// Inserts unless a row with the same `search_query` already exists.
    ///
    /// Returns whether a row was written. Callers re-read by query to get the
    /// id either way.
    pub async fn insert_ignoring_conflict(&self, location: &NewLocation) -> Result<bool, DbErr> {
        let active_model = locations::ActiveModel {
            search_query: Set(location.search_query.clone()),
            formatted_query: Set(location.formatted_query.clone()),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = Locations::insert(active_model)
            .on_conflict(
                OnConflict::column(locations::Column::SearchQuery)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        use sea_orm::PaginatorTrait;

        Locations::find().count(&self.conn).await
    }
}
