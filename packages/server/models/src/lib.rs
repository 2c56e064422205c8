#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the rescue dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the query engine's types to allow independent evolution of the API
//! contract.

use rescue_dashboard_incident_models::{FilterSelection, NeedFlag, TimeWindow};
use rescue_dashboard_query::chart::{DistrictCount, MapMarker};
use serde::{Deserialize, Serialize};

/// Query parameters shared by the map and bar endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotQueryParams {
    /// Comma-separated incident types (e.g. `needrescue,needmed`). Absent
    /// means `needrescue`; present but empty selects nothing.
    pub types: Option<String>,
    /// Time window wire name (e.g. `requested_today`). Absent means `All`.
    pub window: Option<String>,
}

/// One choice in a dashboard control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOption {
    /// Wire name sent back in queries.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// Choices and defaults for both dashboard controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Incident-type choices.
    pub incident_types: Vec<ApiOption>,
    /// Incident types selected on first load.
    pub default_incident_types: Vec<String>,
    /// Time-window choices.
    pub time_windows: Vec<ApiOption>,
    /// Time window selected on first load.
    pub default_time_window: String,
}

impl ApiOptions {
    /// Builds the option lists from the enum definitions.
    #[must_use]
    pub fn current() -> Self {
        let defaults = FilterSelection::default();
        Self {
            incident_types: NeedFlag::all()
                .iter()
                .map(|flag| ApiOption {
                    value: flag.to_string(),
                    label: flag.label().to_owned(),
                })
                .collect(),
            default_incident_types: defaults
                .incident_types
                .iter()
                .map(ToString::to_string)
                .collect(),
            time_windows: TimeWindow::all()
                .iter()
                .map(|window| ApiOption {
                    value: window.to_string(),
                    label: window.label().to_owned(),
                })
                .collect(),
            default_time_window: defaults.time_window.to_string(),
        }
    }
}

/// A plotted request on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMarker {
    /// Source row id.
    pub id: i64,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Hover text with `<br>` line breaks.
    pub text: String,
}

impl From<MapMarker> for ApiMarker {
    fn from(marker: MapMarker) -> Self {
        Self {
            id: marker.id,
            lat: marker.latitude,
            lon: marker.longitude,
            text: marker.text,
        }
    }
}

/// Response from the map endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    /// Markers for matching requests that have valid coordinates.
    pub markers: Vec<ApiMarker>,
    /// Number of matching requests, including those not plotted.
    pub total_count: u64,
    /// Number of markers.
    pub plotted_count: u64,
}

/// Bar height for one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistrictCount {
    /// District name.
    pub district: String,
    /// Number of matching requests.
    pub count: u64,
}

impl From<DistrictCount> for ApiDistrictCount {
    fn from(count: DistrictCount) -> Self {
        Self {
            district: count.district,
            count: count.count,
        }
    }
}

/// Response from the bar endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarResponse {
    /// Per-district counts, in order of first appearance in the table.
    pub districts: Vec<ApiDistrictCount>,
    /// Number of matching requests.
    pub total_count: u64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of requests in the loaded table.
    pub record_count: u64,
}

/// Error body returned with 4xx/5xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}
