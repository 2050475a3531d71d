//! Outbound provider adapters.
//!
//! Every adapter is a thin request/decode layer: it builds the provider URL,
//! checks the status and hands back raw records. Caching and projection live
//! in the services layer.

pub mod darksky;
pub mod geocode;
pub mod hiking;
pub mod meetup;
pub mod tmdb;
pub mod yelp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::ProvidersConfig;
use crate::constants::providers::USER_AGENT;
use crate::models::location::NewLocation;
use crate::models::{Business, Event, Movie, Trail, Weather};
use crate::services::registry::CachedResource;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}")]
    Status {
        provider: &'static str,
        status: StatusCode,
    },

    #[error("{provider} rejected the request: {status}")]
    Rejected {
        provider: &'static str,
        status: String,
    },

    #[error("{provider} returned an unreadable body: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned no results")]
    EmptyResult { provider: &'static str },
}

/// Inputs a provider may be keyed by. Each adapter reads only what it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchParams {
    pub search_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Fetches raw records for one resource type.
#[async_trait]
pub trait ProviderAdapter<R: CachedResource>: Send + Sync {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<R::Raw>, ProviderError>;
}

/// Turns free text into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError>;
}

/// One adapter per resource type, selected by the resource service.
#[derive(Clone)]
pub struct ProviderSet {
    pub weather: Arc<dyn ProviderAdapter<Weather>>,
    pub businesses: Arc<dyn ProviderAdapter<Business>>,
    pub trails: Arc<dyn ProviderAdapter<Trail>>,
    pub movies: Arc<dyn ProviderAdapter<Movie>>,
    pub events: Arc<dyn ProviderAdapter<Event>>,
}

impl ProviderSet {
    /// The live providers, all sharing one pooled HTTP client.
    #[must_use]
    pub fn from_config(config: &ProvidersConfig, http: &Client) -> Self {
        Self {
            weather: Arc::new(darksky::DarkSkyClient::with_shared_client(
                http.clone(),
                &config.weather,
            )),
            businesses: Arc::new(yelp::YelpClient::with_shared_client(
                http.clone(),
                &config.yelp,
            )),
            trails: Arc::new(hiking::HikingProjectClient::with_shared_client(
                http.clone(),
                &config.trails,
                config.trail_max_distance_miles,
            )),
            movies: Arc::new(tmdb::TmdbClient::with_shared_client(
                http.clone(),
                &config.movies,
            )),
            events: Arc::new(meetup::MeetupClient::with_shared_client(
                http.clone(),
                &config.events,
                config.events_page_size,
            )),
        }
    }
}

/// Build a shared HTTP client with reasonable defaults for provider calls.
/// Reused by every adapter for connection pooling.
pub fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Sends the request and decodes a JSON body.
///
/// URLs are stripped from transport errors since several providers take
/// their API key in the path or query.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Request {
            provider,
            source: e.without_url(),
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(
            provider,
            %status,
            body = %body.chars().take(200).collect::<String>(),
            "Provider returned error status"
        );
        return Err(ProviderError::Status { provider, status });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Decode {
            provider,
            message: e.without_url().to_string(),
        })
}

pub(crate) fn base_url(configured: Option<&str>, default: &str) -> String {
    configured
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        ok: bool,
    }

    #[tokio::test]
    async fn get_json_decodes_success_body() {
        let server = stub::spawn(StatusCode::OK, r#"{"ok": true}"#).await;
        let client = Client::new();

        let payload: Payload = get_json("stub", client.get(format!("{}/x", server.base_url)))
            .await
            .unwrap();
        assert!(payload.ok);
        assert_eq!(server.requests(), vec!["/x".to_string()]);
    }

    #[tokio::test]
    async fn get_json_maps_error_status() {
        let server = stub::spawn(StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"down"}"#).await;
        let client = Client::new();

        let err = get_json::<Payload>("stub", client.get(&server.base_url))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Status { provider: "stub", status }
                if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn get_json_reports_bad_body_as_decode_error() {
        let server = stub::spawn(StatusCode::OK, "<html>").await;
        let client = Client::new();

        let err = get_json::<Payload>("stub", client.get(&server.base_url))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn base_url_prefers_configured_and_trims_slash() {
        assert_eq!(base_url(None, "https://a.example"), "https://a.example");
        assert_eq!(
            base_url(Some("http://localhost:9/"), "https://a.example"),
            "http://localhost:9"
        );
    }
}
