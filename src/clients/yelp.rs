use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchParams, ProviderAdapter, ProviderError, base_url, get_json};
use crate::config::ProviderEndpoint;
use crate::models::Business;

const YELP_API: &str = "https://api.yelp.com";
const PROVIDER: &str = "Yelp";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YelpBusiness {
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YelpClient {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: base_url(endpoint.base_url.as_deref(), YELP_API),
            api_key: endpoint.api_key.clone(),
        }
    }
}

#[async_trait]
impl ProviderAdapter<Business> for YelpClient {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<YelpBusiness>, ProviderError> {
        let url = format!(
            "{}/v3/businesses/search?location={}",
            self.base_url,
            urlencoding::encode(&params.search_query)
        );

        let request = self.client.get(&url).bearer_auth(&self.api_key);
        let response: SearchResponse = get_json(PROVIDER, request).await?;

        Ok(response.businesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::stub;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn searches_by_query_with_bearer_token() {
        let server = stub::spawn(
            StatusCode::OK,
            r#"{"total":2,"businesses":[
                {"name":"Pike Place Chowder","image_url":"https://img/1.jpg","rating":4.5,"price":"$$","url":"https://yelp/1"},
                {"name":"Cash Only Diner","rating":3.0}
            ]}"#,
        )
        .await;
        let client = YelpClient::with_shared_client(
            Client::new(),
            &ProviderEndpoint {
                base_url: Some(server.base_url.clone()),
                api_key: "tok".to_string(),
            },
        );
        let params = FetchParams {
            search_query: "seattle wa".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };

        let businesses = client.fetch(&params).await.unwrap();

        assert_eq!(businesses.len(), 2);
        assert_eq!(businesses[0].price.as_deref(), Some("$$"));
        assert!(businesses[1].price.is_none());
        assert_eq!(
            server.requests(),
            vec!["/v3/businesses/search?location=seattle%20wa auth=Bearer tok".to_string()]
        );
    }

    #[tokio::test]
    async fn unauthorized_is_a_status_error() {
        let server = stub::spawn(StatusCode::UNAUTHORIZED, r#"{"error":{}}"#).await;
        let client = YelpClient::with_shared_client(
            Client::new(),
            &ProviderEndpoint {
                base_url: Some(server.base_url.clone()),
                api_key: "bad".to_string(),
            },
        );
        let params = FetchParams {
            search_query: "x".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };

        let err = client.fetch(&params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { provider: "Yelp", .. }));
    }
}
