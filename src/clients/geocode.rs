use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Geocoder, ProviderError, base_url, get_json};
use crate::config::ProviderEndpoint;
use crate::models::location::NewLocation;

const GOOGLE_MAPS_API: &str = "https://maps.googleapis.com";
const PROVIDER: &str = "Google Geocoding";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: base_url(endpoint.base_url.as_deref(), GOOGLE_MAPS_API),
            api_key: endpoint.api_key.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError> {
        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key
        );

        let response: GeocodeResponse = get_json(PROVIDER, self.client.get(&url)).await?;

        // Google answers 200 with a status field for quota and key problems.
        if !matches!(response.status.as_str(), "OK" | "ZERO_RESULTS" | "") {
            return Err(ProviderError::Rejected {
                provider: PROVIDER,
                status: response.status,
            });
        }

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResult { provider: PROVIDER })?;

        Ok(NewLocation {
            search_query: query.to_string(),
            formatted_query: first.formatted_address,
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::stub;
    use reqwest::StatusCode;

    const SEATTLE: &str = r#"{
        "status": "OK",
        "results": [
            {
                "formatted_address": "Seattle, WA, USA",
                "geometry": { "location": { "lat": 47.6062095, "lng": -122.3320708 } }
            },
            {
                "formatted_address": "Seattle Hill, WA, USA",
                "geometry": { "location": { "lat": 47.87, "lng": -122.15 } }
            }
        ]
    }"#;

    fn geocoder(base: &str) -> GoogleGeocoder {
        GoogleGeocoder::with_shared_client(
            Client::new(),
            &ProviderEndpoint {
                base_url: Some(base.to_string()),
                api_key: "k".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn takes_first_result_and_keeps_raw_query() {
        let server = stub::spawn(StatusCode::OK, SEATTLE).await;

        let location = geocoder(&server.base_url).geocode("seattle wa").await.unwrap();

        assert_eq!(location.search_query, "seattle wa");
        assert_eq!(location.formatted_query, "Seattle, WA, USA");
        assert!((location.latitude - 47.606_209_5).abs() < 1e-9);
        assert_eq!(
            server.requests(),
            vec!["/maps/api/geocode/json?address=seattle%20wa&key=k".to_string()]
        );
    }

    #[tokio::test]
    async fn zero_results_is_an_empty_result_error() {
        let server = stub::spawn(StatusCode::OK, r#"{"status":"ZERO_RESULTS","results":[]}"#).await;

        let err = geocoder(&server.base_url).geocode("zzzz").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResult { .. }));
    }

    #[tokio::test]
    async fn denied_status_is_rejected() {
        let server = stub::spawn(
            StatusCode::OK,
            r#"{"status":"REQUEST_DENIED","results":[]}"#,
        )
        .await;

        let err = geocoder(&server.base_url).geocode("seattle").await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { ref status, .. } if status == "REQUEST_DENIED"));
    }
}
