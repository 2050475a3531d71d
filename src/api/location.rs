use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::validate_location_id;
use super::{ApiError, ApiResponse, AppState, LocationQuery, ResourceQuery};
use crate::models::Location;

/// `GET /api/location?data=<query>`
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Location>>, ApiError> {
    let query = params
        .data
        .ok_or_else(|| ApiError::validation("Missing 'data' query parameter"))?;

    let location = state.shared.locations.resolve(&query).await?;
    Ok(Json(ApiResponse::success(location)))
}

/// Finds the location a resource request refers to.
pub(super) async fn locate(state: &AppState, params: &ResourceQuery) -> Result<Location, ApiError> {
    if let Some(id) = params.location_id {
        let id = validate_location_id(id)?;
        return state
            .shared
            .locations
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Location", id));
    }

    match params.data.as_deref() {
        Some(query) => Ok(state.shared.locations.resolve(query).await?),
        None => Err(ApiError::validation(
            "Either 'location_id' or 'data' is required",
        )),
    }
}
