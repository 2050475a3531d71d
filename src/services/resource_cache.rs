//! Cache-aside engine shared by every resource type.
//!
//! Rows are fresh while `now - created_at <= TTL` of their kind. A stale set
//! is evicted as a whole and replaced by one new fetch; rows are never
//! updated in place.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use super::registry::CachedResource;
use crate::clients::ProviderError;
use crate::db::Store;
use crate::domain::{LocationId, ResourceKind};
use crate::models::CachedRow;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{kind} provider unavailable: {source}")]
    ProviderUnavailable {
        kind: ResourceKind,
        #[source]
        source: ProviderError,
    },
}

impl CacheError {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::ProviderUnavailable { kind, .. } => *kind,
        }
    }
}

/// True while the row's fetch time is within `ttl` of `now`.
/// A timestamp that cannot be parsed is treated as stale.
#[must_use]
pub fn is_fresh<R>(row: &CachedRow<R>, ttl: Duration, now: DateTime<Utc>) -> bool {
    row.fetched_at().is_some_and(|fetched| now - fetched <= ttl)
}

type FlightKey = (LocationId, ResourceKind);
type FlightLock = Arc<tokio::sync::Mutex<()>>;

/// One async mutex per (location, kind) with a refresh in progress.
#[derive(Clone, Default)]
struct FlightLocks {
    inner: Arc<Mutex<HashMap<FlightKey, FlightLock>>>,
}

impl FlightLocks {
    async fn acquire(&self, key: FlightKey) -> FlightGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(key).or_default().clone()
        };

        let release = FlightRelease {
            locks: self.clone(),
            key,
            lock: Some(lock.clone()),
        };
        // `Waiting` drops `fut` before `release`, so a cancelled waiter lets
        // go of the lock before the map entry is checked.
        let mut waiting = Waiting {
            fut: Box::pin(lock.lock_owned()),
            release,
        };
        let guard = waiting.fut.as_mut().await;
        let Waiting { fut, release } = waiting;
        drop(fut);

        FlightGuard {
            _guard: guard,
            _release: release,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

struct Waiting<F> {
    fut: Pin<Box<F>>,
    release: FlightRelease,
}

/// Removes the map entry once the last holder or waiter lets go of it.
struct FlightRelease {
    locks: FlightLocks,
    key: FlightKey,
    lock: Option<FlightLock>,
}

impl Drop for FlightRelease {
    fn drop(&mut self) {
        let mut map = self.locks.inner.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.lock.take());

        if map
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.key);
        }
    }
}

/// Fields drop in order: the mutex is unlocked before the entry is released.
struct FlightGuard {
    _guard: OwnedMutexGuard<()>,
    _release: FlightRelease,
}

#[derive(Clone)]
pub struct ResourceCache {
    store: Store,
    flights: Option<FlightLocks>,
}

impl ResourceCache {
    #[must_use]
    pub fn new(store: Store, single_flight: bool) -> Self {
        Self {
            store,
            flights: single_flight.then(FlightLocks::default),
        }
    }

    /// Returns the cached rows of `R` for the location, or fetches, stores
    /// and returns new ones when there are none or they have expired.
    ///
    /// `fetch` is only called on a miss. Its failure is reported as
    /// [`CacheError::ProviderUnavailable`] and leaves the table untouched
    /// apart from an eviction that already happened.
    ///
    /// Store failures never fail the call: the fetched rows are returned
    /// without being persisted.
    pub async fn fetch_or_cache<R, F, Fut>(
        &self,
        location_id: LocationId,
        fetch: F,
    ) -> Result<Vec<CachedRow<R>>, CacheError>
    where
        R: CachedResource,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<R::Raw>, ProviderError>>,
    {
        let kind = R::KIND;
        let resource = kind.as_str();

        let _flight = match &self.flights {
            Some(flights) => Some(flights.acquire((location_id, kind)).await),
            None => None,
        };

        let mut persist = true;

        match self.store.select_by_location::<R::Entity>(location_id).await {
            Ok(models) if !models.is_empty() => {
                let rows: Vec<CachedRow<R>> = models.into_iter().map(R::from_model).collect();

                if is_fresh(&rows[0], kind.ttl(), Utc::now()) {
                    metrics::counter!("resource_cache_hits_total", "resource" => resource)
                        .increment(1);
                    debug!(resource, %location_id, rows = rows.len(), "Cache hit");
                    return Ok(rows);
                }

                metrics::counter!("resource_cache_evictions_total", "resource" => resource)
                    .increment(1);

                match self.store.delete_by_location::<R::Entity>(location_id).await {
                    Ok(removed) => {
                        info!(
                            resource,
                            table = kind.table_name(),
                            %location_id,
                            removed,
                            "Evicted stale rows"
                        );
                    }
                    Err(e) => {
                        warn!(resource, %location_id, error = %e, "Failed to evict stale rows");
                        persist = false;
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(resource, %location_id, error = %e, "Cache lookup failed, fetching uncached");
                persist = false;
            }
        }

        let rows = Self::call_provider::<R, _, _>(location_id, fetch).await?;

        if persist {
            let models = rows.iter().map(R::to_active_model).collect::<Vec<_>>();
            match self.store.insert_rows(models).await {
                Ok(inserted) => debug!(resource, %location_id, inserted, "Stored fetched rows"),
                Err(e) => warn!(resource, %location_id, error = %e, "Failed to store fetched rows"),
            }
        }

        Ok(rows)
    }

    /// Calls the provider and returns its rows without reading or writing
    /// the store. Used when the provider inputs differ from the ones the
    /// cached rows were fetched with.
    pub async fn fetch_uncached<R, F, Fut>(
        &self,
        location_id: LocationId,
        fetch: F,
    ) -> Result<Vec<CachedRow<R>>, CacheError>
    where
        R: CachedResource,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<R::Raw>, ProviderError>>,
    {
        debug!(resource = R::KIND.as_str(), %location_id, "Bypassing cache");
        Self::call_provider::<R, _, _>(location_id, fetch).await
    }

    async fn call_provider<R, F, Fut>(
        location_id: LocationId,
        fetch: F,
    ) -> Result<Vec<CachedRow<R>>, CacheError>
    where
        R: CachedResource,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<R::Raw>, ProviderError>>,
    {
        let kind = R::KIND;
        let resource = kind.as_str();

        metrics::counter!("resource_cache_misses_total", "resource" => resource).increment(1);
        debug!(resource, %location_id, "Calling provider");

        let raw = fetch().await.map_err(|source| {
            metrics::counter!("provider_failures_total", "resource" => resource).increment(1);
            warn!(resource, %location_id, error = %source, "Provider call failed");
            CacheError::ProviderUnavailable { kind, source }
        })?;

        let created_at = Utc::now().to_rfc3339();
        let rows: Vec<CachedRow<R>> = raw
            .into_iter()
            .map(|record| CachedRow {
                data: R::project(record),
                location_id,
                created_at: created_at.clone(),
            })
            .collect();

        Ok(rows)
    }
}
