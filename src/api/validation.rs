use super::ApiError;
use crate::domain::LocationId;

pub fn validate_location_id(id: i32) -> Result<LocationId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid location ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(LocationId::new(id))
}

/// Both coordinates or neither; each within its range.
pub fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<(f64, f64)>, ApiError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ApiError::validation(format!(
                    "Invalid latitude: {lat}. Must be between -90 and 90"
                )));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::validation(format!(
                    "Invalid longitude: {lon}. Must be between -180 and 180"
                )));
            }
            Ok(Some((lat, lon)))
        }
        _ => Err(ApiError::validation(
            "latitude and longitude must be given together",
        )),
    }
}
