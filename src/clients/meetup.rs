use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchParams, ProviderAdapter, ProviderError, base_url, get_json};
use crate::config::ProviderEndpoint;
use crate::models::Event;

const MEETUP_API: &str = "https://api.meetup.com";
const PROVIDER: &str = "Meetup";

#[derive(Debug, Deserialize)]
struct UpcomingResponse {
    #[serde(default)]
    events: Vec<MeetupEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetupEvent {
    pub link: Option<String>,
    pub name: String,
    pub group: Option<MeetupGroup>,
    /// Unix milliseconds at which the event was created.
    pub created: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetupGroup {
    pub name: String,
}

#[derive(Clone)]
pub struct MeetupClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl MeetupClient {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: &ProviderEndpoint, page_size: u32) -> Self {
        Self {
            client,
            base_url: base_url(endpoint.base_url.as_deref(), MEETUP_API),
            api_key: endpoint.api_key.clone(),
            page_size,
        }
    }
}

#[async_trait]
impl ProviderAdapter<Event> for MeetupClient {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<MeetupEvent>, ProviderError> {
        let url = format!(
            "{}/find/upcoming_events?lat={}&lon={}&page={}&key={}&sign=true",
            self.base_url, params.latitude, params.longitude, self.page_size, self.api_key
        );

        let response: UpcomingResponse = get_json(PROVIDER, self.client.get(&url)).await?;

        Ok(response.events)
    }
}
