//! Chart-ready shapes: map markers and per-district bar counts.

use std::collections::HashMap;

use rescue_dashboard_incident_models::IncidentRecord;

use crate::hover::format_hover_with;

/// Number of matching requests filed under one district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictCount {
    /// District name as it appears in the source table.
    pub district: String,
    /// Number of requests.
    pub count: u64,
}

/// One plotted request on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    /// Source row id.
    pub id: i64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Hover text.
    pub text: String,
}

/// Counts records per district.
///
/// Districts appear in the order they are first encountered in `records`,
/// so the bar chart is stable for a given table order.
#[must_use]
pub fn aggregate_by_district<'a>(
    records: impl IntoIterator<Item = &'a IncidentRecord>,
) -> Vec<DistrictCount> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<DistrictCount> = Vec::new();

    for record in records {
        let district = record.district.as_str();
        if let Some(&i) = index.get(district) {
            counts[i].count += 1;
        } else {
            index.insert(district, counts.len());
            counts.push(DistrictCount {
                district: district.to_owned(),
                count: 1,
            });
        }
    }

    counts
}

/// Builds a marker for every record with valid coordinates. Records without
/// them are left off the map but still count in the bar chart.
#[must_use]
pub fn map_markers<'a>(
    records: impl IntoIterator<Item = &'a IncidentRecord>,
    separator: &str,
) -> Vec<MapMarker> {
    records
        .into_iter()
        .filter_map(|record| {
            let (latitude, longitude) = record.coordinates()?;
            Some(MapMarker {
                id: record.id,
                latitude,
                longitude,
                text: format_hover_with(record, separator),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use rescue_dashboard_incident_models::NeedFlag;

    use super::*;
    use crate::fixtures::record;

    fn at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 8, 17, 6, 0, 0).unwrap()
    }

    #[test]
    fn counts_in_first_seen_order() {
        let records = vec![
            record(1, &[NeedFlag::NeedRescue], "Thrissur", at()),
            record(2, &[NeedFlag::NeedRescue], "Alappuzha", at()),
            record(3, &[NeedFlag::NeedRescue], "Thrissur", at()),
            record(4, &[NeedFlag::NeedRescue], "Ernakulam", at()),
            record(5, &[NeedFlag::NeedRescue], "Alappuzha", at()),
            record(6, &[NeedFlag::NeedRescue], "Thrissur", at()),
        ];

        let counts: Vec<(String, u64)> = aggregate_by_district(&records)
            .into_iter()
            .map(|c| (c.district, c.count))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("Thrissur".to_owned(), 3),
                ("Alappuzha".to_owned(), 2),
                ("Ernakulam".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn empty_table_has_no_bars() {
        assert!(aggregate_by_district(&Vec::<IncidentRecord>::new()).is_empty());
    }

    #[test]
    fn markers_skip_invalid_coordinates() {
        let mut missing = record(2, &[NeedFlag::NeedMed], "Kollam", at());
        missing.longitude = None;
        let mut placeholder = record(3, &[NeedFlag::NeedMed], "Kollam", at());
        placeholder.latitude = Some(0.0);
        let records = vec![
            record(1, &[NeedFlag::NeedMed], "Kollam", at()),
            missing,
            placeholder,
        ];

        let markers = map_markers(&records, "<br>");

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, 1);
        assert_eq!(markers[0].text, "Location 1<br>Phone:9847000001");
    }
}
