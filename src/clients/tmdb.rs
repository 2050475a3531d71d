use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchParams, ProviderAdapter, ProviderError, base_url, get_json};
use crate::config::ProviderEndpoint;
use crate::models::Movie;

const TMDB_API: &str = "https://api.themoviedb.org";
const PROVIDER: &str = "TMDB";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub title: String,
    pub release_date: Option<String>,
    pub vote_count: Option<i32>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    /// Path fragment such as `/abc.jpg`; null for movies without a poster.
    pub poster_path: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: base_url(endpoint.base_url.as_deref(), TMDB_API),
            api_key: endpoint.api_key.clone(),
        }
    }
}

#[async_trait]
impl ProviderAdapter<Movie> for TmdbClient {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<TmdbMovie>, ProviderError> {
        let url = format!(
            "{}/3/search/movie?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(&params.search_query)
        );

        let response: SearchResponse = get_json(PROVIDER, self.client.get(&url)).await?;

        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::stub;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn searches_titles_by_location_query() {
        let server = stub::spawn(
            StatusCode::OK,
            r#"{"page":1,"results":[
                {"title":"Sleepless in Seattle","release_date":"1993-06-24","vote_count":1480,"vote_average":6.7,"overview":"A widower...","poster_path":"/iLWsLVrfkFvOXOG9PbUAYg7AK3E.jpg"},
                {"title":"Seattle Superstorm","release_date":"","vote_count":5,"vote_average":3.1,"overview":"","poster_path":null}
            ]}"#,
        )
        .await;
        let client = TmdbClient::with_shared_client(
            Client::new(),
            &ProviderEndpoint {
                base_url: Some(server.base_url.clone()),
                api_key: "m".to_string(),
            },
        );
        let params = FetchParams {
            search_query: "seattle".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };

        let movies = client.fetch(&params).await.unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].vote_count, Some(1480));
        assert!(movies[1].poster_path.is_none());
        assert_eq!(
            server.requests(),
            vec!["/3/search/movie?api_key=m&query=seattle".to_string()]
        );
    }
}
