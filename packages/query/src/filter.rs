//! Incident-type and time-window filtering.
//!
//! A record is kept when its need flags intersect the selected incident
//! types and its request time falls inside the selected window. The output
//! preserves the input order.

use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use rescue_dashboard_incident_models::{FilterSelection, IncidentRecord, TimeWindow};

use crate::chart::{DistrictCount, MapMarker, aggregate_by_district, map_markers};
use crate::clock::DashboardClock;

/// Width of the [`TimeWindow::Last3Hours`] window.
pub const RECENT_WINDOW_HOURS: i64 = 3;

/// A time window resolved against a single "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowMatcher {
    Any,
    Since(DateTime<Utc>),
    OnDate(NaiveDate),
    Nothing,
}

impl WindowMatcher {
    fn resolve(window: TimeWindow, clock: &DashboardClock) -> Self {
        let now = clock.now();
        match window {
            TimeWindow::All => Self::Any,
            TimeWindow::Last3Hours => Self::Since(now - TimeDelta::hours(RECENT_WINDOW_HOURS)),
            TimeWindow::Today | TimeWindow::Yesterday | TimeWindow::TwoDaysBack => {
                let days = u64::from(window.days_back().unwrap_or(0));
                clock
                    .local_date(now)
                    .checked_sub_days(Days::new(days))
                    .map_or(Self::Nothing, Self::OnDate)
            }
        }
    }

    fn accepts(self, requested_at: DateTime<Utc>, clock: &DashboardClock) -> bool {
        match self {
            Self::Any => true,
            Self::Since(start) => requested_at >= start,
            Self::OnDate(date) => clock.local_date(requested_at) == date,
            Self::Nothing => false,
        }
    }
}

/// Returns the records matching `selection`, in input order.
///
/// An empty `selection.incident_types` matches nothing. "Now" is read from
/// `clock` once per call so every record is judged against the same instant.
#[must_use]
pub fn filter<'a>(
    records: impl IntoIterator<Item = &'a IncidentRecord>,
    selection: &FilterSelection,
    clock: &DashboardClock,
) -> Vec<&'a IncidentRecord> {
    if selection.incident_types.is_empty() {
        return Vec::new();
    }

    let matcher = WindowMatcher::resolve(selection.time_window, clock);

    records
        .into_iter()
        .filter(|record| selection.matches_any(&record.need_flags))
        .filter(|record| matcher.accepts(record.requested_at, clock))
        .collect()
}

/// The rows behind one dashboard refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData<'a> {
    /// Matching records, in table order.
    pub records: Vec<&'a IncidentRecord>,
    /// Size of the table the records were selected from.
    pub source_count: usize,
}

impl PlotData<'_> {
    /// Per-district counts for the bar chart.
    #[must_use]
    pub fn district_counts(&self) -> Vec<DistrictCount> {
        aggregate_by_district(self.records.iter().copied())
    }

    /// Map markers for records with valid coordinates, with hover text
    /// joined by `separator`.
    #[must_use]
    pub fn markers(&self, separator: &str) -> Vec<MapMarker> {
        map_markers(self.records.iter().copied(), separator)
    }
}

/// Filters the full table for one refresh of the dashboard.
#[must_use]
pub fn plot_data<'a>(
    records: &'a [IncidentRecord],
    selection: &FilterSelection,
    clock: &DashboardClock,
) -> PlotData<'a> {
    let matched = filter(records, selection, clock);

    log::debug!(
        "Selected {}/{} records for types={:?} window={}",
        matched.len(),
        records.len(),
        selection.incident_types,
        selection.time_window,
    );

    PlotData {
        records: matched,
        source_count: records.len(),
    }
}
