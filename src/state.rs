use std::sync::Arc;

use crate::clients::geocode::GoogleGeocoder;
use crate::clients::{Geocoder, ProviderSet, build_shared_http_client};
use crate::config::Config;
use crate::db::Store;
use crate::services::{LocationService, ResourceCache, ResourceService};

/// Everything a request handler or CLI command needs, cloned per task.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub locations: LocationService,

    pub resources: ResourceService,
}

impl SharedState {
    /// Connects the store and wires the live providers.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One pooled client for every provider.
        let http_client = build_shared_http_client(config.providers.request_timeout_seconds)?;

        let geocoder = Arc::new(GoogleGeocoder::with_shared_client(
            http_client.clone(),
            &config.providers.geocode,
        ));
        let providers = ProviderSet::from_config(&config.providers, &http_client);

        Ok(Self::with_providers(config, store, geocoder, providers))
    }

    /// Wires the services around an existing store and provider set.
    #[must_use]
    pub fn with_providers(
        config: Config,
        store: Store,
        geocoder: Arc<dyn Geocoder>,
        providers: ProviderSet,
    ) -> Self {
        let cache = ResourceCache::new(store.clone(), config.cache.single_flight);

        Self {
            locations: LocationService::new(store.clone(), geocoder),
            resources: ResourceService::new(cache, providers),
            store,
            config: Arc::new(config),
        }
    }
}
