use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchParams, ProviderAdapter, ProviderError, base_url, get_json};
use crate::config::ProviderEndpoint;
use crate::models::Trail;

const HIKING_PROJECT_API: &str = "https://www.hikingproject.com";
const PROVIDER: &str = "Hiking Project";

#[derive(Debug, Deserialize)]
struct TrailsResponse {
    #[serde(default)]
    trails: Vec<HikingTrail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HikingTrail {
    pub name: String,
    pub location: Option<String>,
    pub length: Option<f64>,
    /// `YYYY-MM-DD HH:MM:SS`, or a zeroed placeholder when never reported.
    pub condition_date: Option<String>,
    pub condition_status: Option<String>,
    pub stars: Option<f64>,
    pub star_votes: Option<i32>,
    pub summary: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone)]
pub struct HikingProjectClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_distance: u32,
}

impl HikingProjectClient {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: &ProviderEndpoint, max_distance: u32) -> Self {
        Self {
            client,
            base_url: base_url(endpoint.base_url.as_deref(), HIKING_PROJECT_API),
            api_key: endpoint.api_key.clone(),
            max_distance,
        }
    }
}

#[async_trait]
impl ProviderAdapter<Trail> for HikingProjectClient {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<HikingTrail>, ProviderError> {
        let url = format!(
            "{}/data/get-trails?lat={}&lon={}&maxDistance={}&key={}",
            self.base_url, params.latitude, params.longitude, self.max_distance, self.api_key
        );

        let response: TrailsResponse = get_json(PROVIDER, self.client.get(&url)).await?;

        Ok(response.trails)
    }
}
