use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchParams, ProviderAdapter, ProviderError, base_url, get_json};
use crate::config::ProviderEndpoint;
use crate::models::Weather;

const DARK_SKY_API: &str = "https://api.darksky.net";
const PROVIDER: &str = "Dark Sky";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<Daily>,
}

#[derive(Debug, Deserialize)]
struct Daily {
    #[serde(default)]
    data: Vec<DarkSkyDay>,
}

/// One day of the daily forecast block.
#[derive(Debug, Clone, Deserialize)]
pub struct DarkSkyDay {
    #[serde(default)]
    pub summary: String,
    /// Unix seconds at the start of the day.
    pub time: i64,
}

#[derive(Clone)]
pub struct DarkSkyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DarkSkyClient {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: base_url(endpoint.base_url.as_deref(), DARK_SKY_API),
            api_key: endpoint.api_key.clone(),
        }
    }
}

#[async_trait]
impl ProviderAdapter<Weather> for DarkSkyClient {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<DarkSkyDay>, ProviderError> {
        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, params.latitude, params.longitude
        );

        let response: ForecastResponse = get_json(PROVIDER, self.client.get(&url)).await?;

        Ok(response.daily.map(|d| d.data).unwrap_or_default())
    }
}
