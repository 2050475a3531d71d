use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::location::locate;
use super::validation::validate_coordinates;
use super::{
    ApiError, ApiResponse, AppState, ExploreQuery, ExploreResponse, ResourceOutcome, ResourceQuery,
};
use crate::domain::{ResourceKind, parse_resource_list};
use crate::services::ResourcePayload;

/// `GET /api/{weather|yelp|trails|movies|events}`
pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    Query(params): Query<ResourceQuery>,
) -> Result<Json<ApiResponse<ResourcePayload>>, ApiError> {
    let kind: ResourceKind = resource
        .parse()
        .map_err(|_| ApiError::not_found("Resource", &resource))?;
    let coordinates = validate_coordinates(params.latitude, params.longitude)?;

    let location = locate(&state, &params).await?;

    let payload = state
        .shared
        .resources
        .fetch(kind, &location, coordinates)
        .await?;

    Ok(Json(ApiResponse::success(payload)))
}

/// `GET /api/explore?data=<query>&resources=weather,movies`
///
/// Resolves the location once and fetches every requested resource
/// concurrently. A failing provider shows up as an `error` entry for its
/// resource only.
pub async fn explore(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExploreQuery>,
) -> Result<Json<ApiResponse<ExploreResponse>>, ApiError> {
    let (params, resources) = query.into_parts();

    let kinds = match resources.as_deref() {
        Some(list) => parse_resource_list(list).map_err(|e| ApiError::validation(e.to_string()))?,
        None => ResourceKind::ALL.to_vec(),
    };
    if kinds.is_empty() {
        return Err(ApiError::validation("No resources requested"));
    }
    let coordinates = validate_coordinates(params.latitude, params.longitude)?;

    let location = locate(&state, &params).await?;

    let results = state
        .shared
        .resources
        .fetch_many(&kinds, &location, coordinates)
        .await;

    let resources = results
        .into_iter()
        .map(|(kind, result)| {
            let outcome = match result {
                Ok(data) => ResourceOutcome::Data { data },
                Err(e) => {
                    tracing::warn!(resource = kind.as_str(), error = %e, "Explore resource failed");
                    ResourceOutcome::Error {
                        error: format!("{kind} service is unavailable"),
                    }
                }
            };
            (kind.as_str(), outcome)
        })
        .collect::<BTreeMap<_, _>>();

    Ok(Json(ApiResponse::success(ExploreResponse {
        location,
        resources,
    })))
}
