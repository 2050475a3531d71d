//! Stored shapes of the cached resources.
//!
//! Each struct is the field projection of one provider record. The
//! [`CachedRow`] wrapper adds the bookkeeping columns every resource table
//! carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::LocationId;

/// A projected record plus its fetch timestamp and owning location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedRow<R> {
    #[serde(flatten)]
    pub data: R,
    pub location_id: LocationId,
    /// RFC 3339 fetch time; shared by every row inserted in one fetch.
    pub created_at: String,
}

impl<R> CachedRow<R> {
    /// Parsed fetch time, `None` when the stored value is not RFC 3339.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub forecast: String,
    /// Day-level display date, e.g. `Mon Jan 01 2001`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub name: String,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub condition_date: Option<String>,
    pub condition_time: Option<String>,
    pub conditions: Option<String>,
    pub stars: Option<f64>,
    pub star_votes: Option<i32>,
    pub summary: Option<String>,
    pub trail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub released_on: Option<String>,
    pub total_votes: Option<i32>,
    pub average_votes: Option<f64>,
    pub overview: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub link: Option<String>,
    pub name: String,
    pub host: Option<String>,
    pub event_date: Option<String>,
}
