use serde::{Deserialize, Serialize};

use crate::domain::LocationId;
use crate::entities::locations;

/// A geocoded place, keyed by the exact text it was searched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: String,
}

/// A geocoding result that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<locations::Model> for Location {
    fn from(model: locations::Model) -> Self {
        Self {
            id: LocationId::new(model.id),
            search_query: model.search_query,
            formatted_query: model.formatted_query,
            latitude: model.latitude,
            longitude: model.longitude,
            created_at: model.created_at,
        }
    }
}
