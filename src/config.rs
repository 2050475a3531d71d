use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/cityscout.db".to_string(),
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Where a provider lives and how to authenticate against it.
///
/// `base_url` falls back to the provider's public API root when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoint {
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Request timeout in seconds (default: 15)
    pub request_timeout_seconds: u64,

    pub geocode: ProviderEndpoint,

    pub weather: ProviderEndpoint,

    pub yelp: ProviderEndpoint,

    pub trails: ProviderEndpoint,

    pub movies: ProviderEndpoint,

    pub events: ProviderEndpoint,

    /// Search radius for the trail provider.
    pub trail_max_distance_miles: u32,

    pub events_page_size: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 15,
            geocode: ProviderEndpoint::default(),
            weather: ProviderEndpoint::default(),
            yelp: ProviderEndpoint::default(),
            trails: ProviderEndpoint::default(),
            movies: ProviderEndpoint::default(),
            events: ProviderEndpoint::default(),
            trail_max_distance_miles: 10,
            events_page_size: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serialize lookup/refresh per (location, resource) so concurrent
    /// misses share one provider call.
    pub single_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env` and
    /// environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `PORT`, `DATABASE_URL` and the provider `*_API_KEY` variables.
    ///
    /// Takes a lookup function so tests do not have to touch the process
    /// environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.general.database_path = url;
        }

        let p = &mut self.providers;
        for (name, endpoint) in [
            ("GEOCODE_API_KEY", &mut p.geocode),
            ("WEATHER_API_KEY", &mut p.weather),
            ("YELP_API_KEY", &mut p.yelp),
            ("TRAILS_API_KEY", &mut p.trails),
            ("MOVIES_API_KEY", &mut p.movies),
            ("EVENTS_API_KEY", &mut p.events),
        ] {
            if let Some(key) = lookup(name) {
                endpoint.api_key = key;
            }
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cityscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cityscout").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.providers.request_timeout_seconds == 0 {
            anyhow::bail!("Provider request timeout must be > 0");
        }

        let p = &self.providers;
        for (name, endpoint) in [
            ("geocode", &p.geocode),
            ("weather", &p.weather),
            ("yelp", &p.yelp),
            ("trails", &p.trails),
            ("movies", &p.movies),
            ("events", &p.events),
        ] {
            if let Some(base) = &endpoint.base_url {
                url::Url::parse(base)
                    .with_context(|| format!("Invalid base_url for provider {name}: {base}"))?;
            }
        }

        Ok(())
    }

    /// Providers that will be called without an API key.
    #[must_use]
    pub fn missing_api_keys(&self) -> Vec<&'static str> {
        let p = &self.providers;
        [
            ("geocode", &p.geocode),
            ("weather", &p.weather),
            ("yelp", &p.yelp),
            ("trails", &p.trails),
            ("movies", &p.movies),
            ("events", &p.events),
        ]
        .into_iter()
        .filter(|(_, endpoint)| endpoint.api_key.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
