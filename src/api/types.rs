use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Location;
use crate::services::ResourcePayload;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// `?data=<query>` for `/api/location`.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub data: Option<String>,
}

/// Location selector shared by the resource routes.
///
/// `location_id` wins over `data` when both are given.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub data: Option<String>,
    pub location_id: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Query strings are flat, so the selector fields are repeated here rather
/// than flattened from [`ResourceQuery`].
#[derive(Debug, Deserialize)]
pub struct ExploreQuery {
    pub data: Option<String>,
    pub location_id: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma separated resource names; every resource when absent.
    pub resources: Option<String>,
}

impl ExploreQuery {
    #[must_use]
    pub fn into_parts(self) -> (ResourceQuery, Option<String>) {
        (
            ResourceQuery {
                data: self.data,
                location_id: self.location_id,
                latitude: self.latitude,
                longitude: self.longitude,
            },
            self.resources,
        )
    }
}

/// Result of one resource inside an explore response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResourceOutcome {
    Data { data: ResourcePayload },
    Error { error: String },
}

#[derive(Debug, Serialize)]
pub struct ExploreResponse {
    pub location: Location,
    pub resources: BTreeMap<&'static str, ResourceOutcome>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
    pub version: &'static str,
}
