#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record, need flag, and filter selection types.
//!
//! This crate defines the shared vocabulary of the rescue dashboard. The
//! reader produces [`IncidentRecord`]s, the query engine filters them with a
//! [`FilterSelection`], and the server and CLI parse user input into
//! selections through [`FilterSelection::parse`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of assistance a rescue request asks for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NeedFlag {
    /// People stranded and in need of evacuation
    NeedRescue,
    /// Medicines or medical attention
    NeedMed,
    /// Food and drinking water
    NeedFoodAndWater,
    /// Anything else, described in free text
    NeedOthers,
}

impl NeedFlag {
    /// Human-readable label shown in the dashboard's incident-type control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedRescue => "Need Rescue",
            Self::NeedMed => "Need Medicines",
            Self::NeedFoodAndWater => "Need Food & Water",
            Self::NeedOthers => "Need Others",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::NeedRescue,
            Self::NeedMed,
            Self::NeedFoodAndWater,
            Self::NeedOthers,
        ]
    }
}

/// Time bucket applied to [`IncidentRecord::requested_at`].
///
/// Calendar buckets are evaluated against a fixed UTC offset supplied by the
/// caller, never against the ambient process timezone.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimeWindow {
    /// No time restriction.
    #[default]
    #[serde(rename = "All")]
    #[strum(serialize = "All")]
    All,
    /// Requested no more than three hours ago.
    #[serde(rename = "requested_within_3_hours")]
    #[strum(serialize = "requested_within_3_hours")]
    Last3Hours,
    /// Requested on the current calendar date.
    #[serde(rename = "requested_today")]
    #[strum(serialize = "requested_today")]
    Today,
    /// Requested on the previous calendar date.
    #[serde(rename = "requested_yesterday")]
    #[strum(serialize = "requested_yesterday")]
    Yesterday,
    /// Requested on the calendar date two days before today.
    #[serde(rename = "2_days_back")]
    #[strum(serialize = "2_days_back")]
    TwoDaysBack,
}

impl TimeWindow {
    /// Human-readable label shown in the dashboard's time-window control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Last3Hours => "Requested within last 3 hours",
            Self::Today => "Requested Today",
            Self::Yesterday => "Requested Yesterday",
            Self::TwoDaysBack => "Request 2 days back",
        }
    }

    /// Number of calendar days before today this bucket targets, or `None`
    /// for buckets that are not a single calendar date.
    #[must_use]
    pub const fn days_back(self) -> Option<u32> {
        match self {
            Self::Today => Some(0),
            Self::Yesterday => Some(1),
            Self::TwoDaysBack => Some(2),
            Self::All | Self::Last3Hours => None,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::All,
            Self::Last3Hours,
            Self::Today,
            Self::Yesterday,
            Self::TwoDaysBack,
        ]
    }
}

/// Error returned when a user-supplied selection value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSelectionError {
    /// The incident type is not one of the known [`NeedFlag`] wire names.
    #[error("invalid selection: unknown incident type '{value}'")]
    IncidentType {
        /// The rejected value.
        value: String,
    },
    /// The time window is not one of the known [`TimeWindow`] wire names.
    #[error("invalid selection: unknown time window '{value}'")]
    TimeWindow {
        /// The rejected value.
        value: String,
    },
}

/// The two user selections that drive every dashboard refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Need flags to include. An empty set matches nothing.
    pub incident_types: BTreeSet<NeedFlag>,
    /// Time bucket to include.
    pub time_window: TimeWindow,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            incident_types: BTreeSet::from([NeedFlag::NeedRescue]),
            time_window: TimeWindow::All,
        }
    }
}

impl FilterSelection {
    /// Creates a selection from already-typed values.
    #[must_use]
    pub fn new(
        incident_types: impl IntoIterator<Item = NeedFlag>,
        time_window: TimeWindow,
    ) -> Self {
        Self {
            incident_types: incident_types.into_iter().collect(),
            time_window,
        }
    }

    /// Parses a selection from wire names.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelectionError`] if any incident type or the time
    /// window is not a recognized wire name.
    pub fn parse<'a>(
        incident_types: impl IntoIterator<Item = &'a str>,
        time_window: &str,
    ) -> Result<Self, InvalidSelectionError> {
        Ok(Self {
            incident_types: parse_incident_types(incident_types)?,
            time_window: parse_time_window(time_window)?,
        })
    }

    /// Parses a selection from the comma-separated form used in query
    /// strings and CLI flags.
    ///
    /// A missing `incident_types` falls back to `needrescue`; a present but
    /// empty one selects nothing. A missing `time_window` falls back to
    /// [`TimeWindow::All`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelectionError`] if any value is not recognized.
    pub fn from_query(
        incident_types: Option<&str>,
        time_window: Option<&str>,
    ) -> Result<Self, InvalidSelectionError> {
        let defaults = Self::default();
        let time_window = time_window.map_or(defaults.time_window.as_ref(), str::trim);

        match incident_types {
            Some(list) => Self::parse(split_list(list), time_window),
            None => Self::parse(
                defaults.incident_types.iter().map(|flag| flag.as_ref()),
                time_window,
            ),
        }
    }

    /// Whether any of `flags` is selected.
    #[must_use]
    pub fn matches_any(&self, flags: &BTreeSet<NeedFlag>) -> bool {
        !self.incident_types.is_disjoint(flags)
    }
}

fn parse_incident_types<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> Result<BTreeSet<NeedFlag>, InvalidSelectionError> {
    values
        .into_iter()
        .map(|value| {
            value
                .parse::<NeedFlag>()
                .map_err(|_| InvalidSelectionError::IncidentType {
                    value: value.to_owned(),
                })
        })
        .collect()
}

fn parse_time_window(value: &str) -> Result<TimeWindow, InvalidSelectionError> {
    value
        .parse::<TimeWindow>()
        .map_err(|_| InvalidSelectionError::TimeWindow {
            value: value.to_owned(),
        })
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// One reported rescue or aid request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Row id from the source table.
    pub id: i64,
    /// Free-text location as reported.
    pub location: String,
    /// Contact number of the person who filed the request.
    pub requestee_phone: String,
    /// District the request was filed under.
    pub district: String,
    /// Latitude (WGS84), if the source provided a usable one.
    pub latitude: Option<f64>,
    /// Longitude (WGS84), if the source provided a usable one.
    pub longitude: Option<f64>,
    /// When the request was filed.
    pub requested_at: DateTime<Utc>,
    /// Kinds of assistance requested. Never empty.
    pub need_flags: BTreeSet<NeedFlag>,
    /// Free-text description of other needs.
    pub need_others: Option<String>,
    /// Free-text medical details.
    pub detail_med: Option<String>,
    /// Free-text rescue details.
    pub detail_rescue: Option<String>,
}

impl IncidentRecord {
    /// Returns `(latitude, longitude)` if both are valid, `None` otherwise.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        valid_coordinates(self.latitude, self.longitude)
    }
}

/// Validates a lat/lng pair. Returns `None` if either is missing,
/// non-finite, out of WGS84 range, or the `0.0` placeholder.
#[must_use]
pub fn valid_coordinates(lat: Option<f64>, lng: Option<f64>) -> Option<(f64, f64)> {
    let latitude = lat?;
    let longitude = lng?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some((latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn need_flag_wire_names() {
        assert_eq!(NeedFlag::NeedRescue.to_string(), "needrescue");
        assert_eq!(NeedFlag::NeedFoodAndWater.as_ref(), "needfoodandwater");
        assert_eq!("needmed".parse::<NeedFlag>().unwrap(), NeedFlag::NeedMed);
        assert!("NeedRescue".parse::<NeedFlag>().is_err());
    }

    #[test]
    fn time_window_wire_names() {
        for window in TimeWindow::all() {
            let parsed: TimeWindow = window.to_string().parse().unwrap();
            assert_eq!(parsed, *window);
        }
        assert_eq!(TimeWindow::TwoDaysBack.as_ref(), "2_days_back");
        assert_eq!(
            "requested_within_3_hours".parse::<TimeWindow>().unwrap(),
            TimeWindow::Last3Hours
        );
    }

    #[test]
    fn default_selection_is_rescue_over_all_time() {
        let selection = FilterSelection::default();
        assert_eq!(
            selection.incident_types,
            BTreeSet::from([NeedFlag::NeedRescue])
        );
        assert_eq!(selection.time_window, TimeWindow::All);
    }

    #[test]
    fn parse_rejects_unknown_time_window() {
        let err = FilterSelection::parse(["needrescue"], "last_week").unwrap_err();
        assert_eq!(
            err,
            InvalidSelectionError::TimeWindow {
                value: "last_week".to_owned()
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_incident_type() {
        let err = FilterSelection::parse(["needrescue", "needboats"], "All").unwrap_err();
        assert!(matches!(
            err,
            InvalidSelectionError::IncidentType { value } if value == "needboats"
        ));
    }

    #[test]
    fn from_query_defaults_and_empty_list() {
        let defaulted = FilterSelection::from_query(None, None).unwrap();
        assert_eq!(defaulted, FilterSelection::default());

        let empty = FilterSelection::from_query(Some(""), Some("requested_today")).unwrap();
        assert!(empty.incident_types.is_empty());
        assert_eq!(empty.time_window, TimeWindow::Today);

        let listed = FilterSelection::from_query(Some("needmed, needothers"), None).unwrap();
        assert_eq!(
            listed.incident_types,
            BTreeSet::from([NeedFlag::NeedMed, NeedFlag::NeedOthers])
        );
    }

    #[test]
    fn from_query_validates_window_with_default_types() {
        assert!(FilterSelection::from_query(None, Some("bogus")).is_err());
    }

    #[test]
    fn rejects_invalid_coordinates() {
        assert!(valid_coordinates(Some(9.49), Some(76.33)).is_some());
        assert!(valid_coordinates(None, Some(76.33)).is_none());
        assert!(valid_coordinates(Some(0.0), Some(76.33)).is_none());
        assert!(valid_coordinates(Some(f64::NAN), Some(76.33)).is_none());
        assert!(valid_coordinates(Some(91.0), Some(76.33)).is_none());
    }
}
