use std::sync::Arc;

use sea_orm::DbErr;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::{Geocoder, ProviderError};
use crate::constants::limits::MAX_QUERY_LENGTH;
use crate::db::Store;
use crate::domain::LocationId;
use crate::models::Location;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid location query: {0}")]
    InvalidQuery(String),

    #[error("Could not resolve location '{query}'")]
    ResolutionFailed {
        query: String,
        #[source]
        source: ProviderError,
    },

    #[error("Database error: {0}")]
    Persistence(#[from] DbErr),
}

/// Maps free-text searches to stored, geocoded locations.
///
/// A search string is geocoded at most once; afterwards its row is served
/// from the store forever.
#[derive(Clone)]
pub struct LocationService {
    store: Store,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    #[must_use]
    pub fn new(store: Store, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    /// Finds the location stored for `query`, geocoding and storing it on
    /// first use. Lookup is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidQuery`] for an empty or oversized query
    /// - [`ResolveError::ResolutionFailed`] if the geocoder errors or finds nothing
    /// - [`ResolveError::Persistence`] if the store cannot be read or written
    pub async fn resolve(&self, query: &str) -> Result<Location, ResolveError> {
        if query.trim().is_empty() {
            return Err(ResolveError::InvalidQuery("query is empty".to_string()));
        }
        if query.len() > MAX_QUERY_LENGTH {
            return Err(ResolveError::InvalidQuery(format!(
                "query is longer than {MAX_QUERY_LENGTH} bytes"
            )));
        }

        if let Some(location) = self.store.find_location_by_query(query).await? {
            debug!(query, id = %location.id, "Location already known");
            return Ok(location);
        }

        let geocoded = self.geocoder.geocode(query).await.map_err(|source| {
            warn!(query, error = %source, "Geocoding failed");
            ResolveError::ResolutionFailed {
                query: query.to_string(),
                source,
            }
        })?;

        let inserted = self.store.insert_location_ignoring_conflict(&geocoded).await?;
        if !inserted {
            debug!(query, "Location inserted concurrently, using stored row");
        }

        let location = self
            .store
            .find_location_by_query(query)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("location '{query}' after insert")))?;

        if inserted {
            info!(
                query,
                id = %location.id,
                formatted = %location.formatted_query,
                "Resolved new location"
            );
        }

        Ok(location)
    }

    pub async fn get(&self, id: LocationId) -> Result<Option<Location>, ResolveError> {
        Ok(self.store.get_location(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::NewLocation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGeocoder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeGeocoder {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail {
                return Err(ProviderError::EmptyResult { provider: "fake" });
            }
            Ok(NewLocation {
                search_query: query.to_string(),
                formatted_query: format!("{query}, USA"),
                latitude: 47.6,
                longitude: -122.3,
            })
        }
    }

    async fn service(geocoder: Arc<FakeGeocoder>) -> (Store, LocationService) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        (store.clone(), LocationService::new(store, geocoder))
    }

    #[tokio::test]
    async fn known_query_is_not_geocoded_again() {
        let geocoder = FakeGeocoder::new(false);
        let (_store, locations) = service(geocoder.clone()).await;

        let first = locations.resolve("seattle").await.unwrap();
        let second = locations.resolve("seattle").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.formatted_query, "seattle, USA");
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn queries_differing_in_case_are_distinct() {
        let geocoder = FakeGeocoder::new(false);
        let (store, locations) = service(geocoder.clone()).await;

        let lower = locations.resolve("seattle").await.unwrap();
        let upper = locations.resolve("Seattle").await.unwrap();

        assert_ne!(lower.id, upper.id);
        assert_eq!(store.location_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn racing_resolves_store_one_row() {
        let geocoder = FakeGeocoder::new(false);
        let (store, locations) = service(geocoder).await;

        let (a, b, c) = tokio::join!(
            locations.resolve("boise"),
            locations.resolve("boise"),
            locations.resolve("boise")
        );

        let ids = [a.unwrap().id, b.unwrap().id, c.unwrap().id];
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.location_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn geocoder_failure_stores_nothing() {
        let (store, locations) = service(FakeGeocoder::new(true)).await;

        let err = locations.resolve("atlantis").await.unwrap_err();

        assert!(matches!(err, ResolveError::ResolutionFailed { .. }));
        assert_eq!(store.location_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_geocoding() {
        let geocoder = FakeGeocoder::new(false);
        let (_store, locations) = service(geocoder.clone()).await;

        assert!(matches!(
            locations.resolve("   ").await,
            Err(ResolveError::InvalidQuery(_))
        ));
        assert!(matches!(
            locations.resolve(&"x".repeat(MAX_QUERY_LENGTH + 1)).await,
            Err(ResolveError::InvalidQuery(_))
        ));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_by_id() {
        let (_store, locations) = service(FakeGeocoder::new(false)).await;
        let stored = locations.resolve("portland").await.unwrap();

        assert_eq!(locations.get(stored.id).await.unwrap(), Some(stored));
        assert!(locations.get(LocationId::new(999)).await.unwrap().is_none());
    }
}
