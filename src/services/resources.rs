//! Resource dispatch: picks the descriptor and provider for a
//! [`ResourceKind`] and runs it through the cache engine.

use std::future::Future;

use futures::future::join_all;
use serde::Serialize;

use super::registry::CachedResource;
use super::resource_cache::{CacheError, ResourceCache};
use crate::clients::{FetchParams, ProviderAdapter, ProviderError, ProviderSet};
use crate::domain::{FetchKey, LocationId, ResourceKind};
use crate::models::{Business, CachedRow, Event, Location, Movie, Trail, Weather};

/// Rows of one resource type, serialized as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourcePayload {
    Weather(Vec<CachedRow<Weather>>),
    Business(Vec<CachedRow<Business>>),
    Trail(Vec<CachedRow<Trail>>),
    Movie(Vec<CachedRow<Movie>>),
    Event(Vec<CachedRow<Event>>),
}

impl ResourcePayload {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Weather(_) => ResourceKind::Weather,
            Self::Business(_) => ResourceKind::Business,
            Self::Trail(_) => ResourceKind::Trail,
            Self::Movie(_) => ResourceKind::Movie,
            Self::Event(_) => ResourceKind::Event,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Weather(rows) => rows.len(),
            Self::Business(rows) => rows.len(),
            Self::Trail(rows) => rows.len(),
            Self::Movie(rows) => rows.len(),
            Self::Event(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct ResourceService {
    cache: ResourceCache,
    providers: ProviderSet,
}

impl ResourceService {
    #[must_use]
    pub const fn new(cache: ResourceCache, providers: ProviderSet) -> Self {
        Self { cache, providers }
    }

    /// Provider inputs for a location. Explicit coordinates replace the
    /// stored ones for the outbound call.
    #[must_use]
    pub fn params_for(location: &Location, coordinates: Option<(f64, f64)>) -> FetchParams {
        let (latitude, longitude) = coordinates.unwrap_or((location.latitude, location.longitude));
        FetchParams {
            search_query: location.search_query.clone(),
            latitude,
            longitude,
        }
    }

    /// Whether `kind` would be fetched with other inputs than the ones its
    /// cached rows for `location` were fetched with.
    #[must_use]
    pub fn bypasses_cache(
        kind: ResourceKind,
        location: &Location,
        coordinates: Option<(f64, f64)>,
    ) -> bool {
        match kind.fetch_key() {
            FetchKey::SearchQuery => false,
            FetchKey::Coordinates => coordinates
                .is_some_and(|(lat, lon)| lat != location.latitude || lon != location.longitude),
        }
    }

    /// Rows of `kind` for the location. Coordinate-keyed kinds asked for
    /// other coordinates than the stored ones are fetched live and never
    /// stored, so the location's cached rows stay those of its own
    /// coordinates.
    pub async fn fetch(
        &self,
        kind: ResourceKind,
        location: &Location,
        coordinates: Option<(f64, f64)>,
    ) -> Result<ResourcePayload, CacheError> {
        let params = Self::params_for(location, coordinates);
        let live = Self::bypasses_cache(kind, location, coordinates);
        let id = location.id;
        let p = &self.providers;

        match kind {
            ResourceKind::Weather => self
                .run::<Weather, _, _>(id, live, || p.weather.fetch(&params))
                .await
                .map(ResourcePayload::Weather),
            ResourceKind::Business => self
                .run::<Business, _, _>(id, live, || p.businesses.fetch(&params))
                .await
                .map(ResourcePayload::Business),
            ResourceKind::Trail => self
                .run::<Trail, _, _>(id, live, || p.trails.fetch(&params))
                .await
                .map(ResourcePayload::Trail),
            ResourceKind::Movie => self
                .run::<Movie, _, _>(id, live, || p.movies.fetch(&params))
                .await
                .map(ResourcePayload::Movie),
            ResourceKind::Event => self
                .run::<Event, _, _>(id, live, || p.events.fetch(&params))
                .await
                .map(ResourcePayload::Event),
        }
    }

    async fn run<R, F, Fut>(
        &self,
        location_id: LocationId,
        live: bool,
        fetch: F,
    ) -> Result<Vec<CachedRow<R>>, CacheError>
    where
        R: CachedResource,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<R::Raw>, ProviderError>>,
    {
        if live {
            self.cache.fetch_uncached::<R, _, _>(location_id, fetch).await
        } else {
            self.cache.fetch_or_cache::<R, _, _>(location_id, fetch).await
        }
    }

    /// Fetches several kinds concurrently. Each kind gets its own result, in
    /// the order requested; one failing provider does not affect the others.
    pub async fn fetch_many(
        &self,
        kinds: &[ResourceKind],
        location: &Location,
        coordinates: Option<(f64, f64)>,
    ) -> Vec<(ResourceKind, Result<ResourcePayload, CacheError>)> {
        join_all(kinds.iter().map(|&kind| async move {
            (kind, self.fetch(kind, location, coordinates).await)
        }))
        .await
    }
}
