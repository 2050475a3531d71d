use crate::domain::LocationId;
use crate::models::location::{Location, NewLocation};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::resource::ResourceTable;

/// Handle to the relational store.
///
/// Cheap to clone; every clone shares one connection pool. Created with
/// [`Store::new`] or [`Store::with_pool_options`] and torn down with
/// [`Store::close`].
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every in-memory connection is a separate database, so the pool must
        // hold exactly one connection for its whole life.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            if in_memory { 1 } else { min_connections },
            if in_memory { 1 } else { max_connections }
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        info!("Database connection closed");
        Ok(())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn resource_repo(&self) -> repositories::resource::ResourceRepository {
        repositories::resource::ResourceRepository::new(self.conn.clone())
    }

    pub async fn find_location_by_query(&self, query: &str) -> Result<Option<Location>, DbErr> {
        self.location_repo().find_by_query(query).await
    }

    pub async fn get_location(&self, id: LocationId) -> Result<Option<Location>, DbErr> {
        self.location_repo().get(id).await
    }

    pub async fn insert_location_ignoring_conflict(
        &self,
        location: &NewLocation,
    ) -> Result<bool, DbErr> {
        self.location_repo().insert_ignoring_conflict(location).await
    }

    pub async fn location_count(&self) -> Result<u64, DbErr> {
        self.location_repo().count().await
    }

    pub async fn select_by_location<E: ResourceTable>(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<E::Model>, DbErr> {
        self.resource_repo().select_by_location::<E>(location_id).await
    }

    pub async fn insert_rows<A>(&self, rows: Vec<A>) -> Result<usize, DbErr>
    where
        A: ActiveModelTrait + Send,
    {
        self.resource_repo().insert_rows(rows).await
    }

    pub async fn delete_by_location<E: ResourceTable>(
        &self,
        location_id: LocationId,
    ) -> Result<u64, DbErr> {
        self.resource_repo().delete_by_location::<E>(location_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{prelude::*, weathers, yelps};
    use sea_orm::Set;

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    fn seattle() -> NewLocation {
        NewLocation {
            search_query: "seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.606_209,
            longitude: -122.332_071,
        }
    }

    fn weather_row(location_id: i32, forecast: &str) -> weathers::ActiveModel {
        weathers::ActiveModel {
            forecast: Set(forecast.to_string()),
            time: Set("Mon Jan 01 2001".to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            location_id: Set(location_id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn duplicate_location_insert_is_absorbed() {
        let store = memory_store().await;

        assert!(store.insert_location_ignoring_conflict(&seattle()).await.unwrap());
        assert!(!store.insert_location_ignoring_conflict(&seattle()).await.unwrap());

        assert_eq!(store.location_count().await.unwrap(), 1);
        let found = store.find_location_by_query("seattle").await.unwrap().unwrap();
        assert_eq!(found.formatted_query, "Seattle, WA, USA");
    }

    #[tokio::test]
    async fn location_lookup_is_case_sensitive() {
        let store = memory_store().await;
        store.insert_location_ignoring_conflict(&seattle()).await.unwrap();

        assert!(store.find_location_by_query("Seattle").await.unwrap().is_none());
        assert!(store.find_location_by_query("seattle ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rows_are_scoped_to_location_and_table() {
        let store = memory_store().await;
        store.insert_location_ignoring_conflict(&seattle()).await.unwrap();
        let mut other = seattle();
        other.search_query = "boise".to_string();
        store.insert_location_ignoring_conflict(&other).await.unwrap();

        let a = store.find_location_by_query("seattle").await.unwrap().unwrap().id;
        let b = store.find_location_by_query("boise").await.unwrap().unwrap().id;

        store
            .insert_rows(vec![weather_row(a.value(), "Rain"), weather_row(a.value(), "Drizzle")])
            .await
            .unwrap();
        store.insert_rows(vec![weather_row(b.value(), "Sun")]).await.unwrap();
        store
            .insert_rows(vec![yelps::ActiveModel {
                name: Set("Pike Place Chowder".to_string()),
                image_url: Set(None),
                rating: Set(Some(4.5)),
                price: Set(Some("$$".to_string())),
                url: Set(None),
                created_at: Set(chrono::Utc::now().to_rfc3339()),
                location_id: Set(a.value()),
                ..Default::default()
            }])
            .await
            .unwrap();

        let rows = store.select_by_location::<Weathers>(a).await.unwrap();
        let forecasts: Vec<_> = rows.iter().map(|r| r.forecast.as_str()).collect();
        assert_eq!(forecasts, vec!["Rain", "Drizzle"]);

        assert_eq!(store.delete_by_location::<Weathers>(a).await.unwrap(), 2);
        assert!(store.select_by_location::<Weathers>(a).await.unwrap().is_empty());
        assert_eq!(store.select_by_location::<Weathers>(b).await.unwrap().len(), 1);
        assert_eq!(store.select_by_location::<Yelps>(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_insert_is_a_no_op() {
        let store = memory_store().await;
        let inserted = store
            .insert_rows(Vec::<weathers::ActiveModel>::new())
            .await
            .unwrap();
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn ping_and_close() {
        let store = memory_store().await;
        store.ping().await.unwrap();
        store.close().await.unwrap();
    }
}
