//! Domain primitives shared by the resolver, the cache engine and the API.
//!
//! Newtypes keep location ids from mixing with row ids, and [`ResourceKind`]
//! is the tag that selects a resource's registry entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::cache;

/// Identifier of a resolved location row.
///
/// Every cached resource row references its location through this id.
///
/// # Examples
///
/// ```rust
/// use cityscout::domain::LocationId;
///
/// let id = LocationId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocationId(i32);

impl LocationId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "LocationId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<LocationId> for i32 {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl From<i32> for LocationId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for LocationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for LocationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Which input a provider is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKey {
    /// Latitude/longitude of the resolved location.
    Coordinates,
    /// The location's original free-text search string.
    SearchQuery,
}

/// The cacheable resource types.
///
/// Each variant owns a storage table, a TTL and a fetch keying. These are
/// fixed here so that the cache engine never has to look them up at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Weather,
    Business,
    Trail,
    Movie,
    Event,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Weather,
        Self::Business,
        Self::Trail,
        Self::Movie,
        Self::Event,
    ];

    /// Route segment and metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Business => "yelp",
            Self::Trail => "trails",
            Self::Movie => "movies",
            Self::Event => "events",
        }
    }

    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Weather => "weathers",
            Self::Business => "yelps",
            Self::Trail => "trails",
            Self::Movie => "movies",
            Self::Event => "events",
        }
    }

    #[must_use]
    pub const fn ttl_minutes(self) -> i64 {
        match self {
            Self::Weather => cache::WEATHER_TTL_MINUTES,
            Self::Business => cache::BUSINESS_TTL_MINUTES,
            Self::Trail => cache::TRAIL_TTL_MINUTES,
            Self::Movie => cache::MOVIE_TTL_MINUTES,
            Self::Event => cache::EVENT_TTL_MINUTES,
        }
    }

    #[must_use]
    pub fn ttl(self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes())
    }

    #[must_use]
    pub const fn fetch_key(self) -> FetchKey {
        match self {
            Self::Weather | Self::Trail | Self::Event => FetchKey::Coordinates,
            Self::Business | Self::Movie => FetchKey::SearchQuery,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weather" | "weathers" => Ok(Self::Weather),
            "yelp" | "yelps" | "business" | "businesses" => Ok(Self::Business),
            "trail" | "trails" => Ok(Self::Trail),
            "movie" | "movies" => Ok(Self::Movie),
            "event" | "events" | "meetups" => Ok(Self::Event),
            other => Err(UnknownResource(other.to_string())),
        }
    }
}

/// Parses a comma separated list such as `weather,yelp,movies`.
///
/// Duplicates are collapsed; order of first appearance is kept.
pub fn parse_resource_list(input: &str) -> Result<Vec<ResourceKind>, UnknownResource> {
    let mut kinds = Vec::new();
    for part in input.split(',').filter(|p| !p.trim().is_empty()) {
        let kind = part.parse::<ResourceKind>()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}
