//! Terminal rendering of a filtered request table.

use std::fmt::Write as _;

use rescue_dashboard_incident_models::FilterSelection;
use rescue_dashboard_query::filter::PlotData;
use rescue_dashboard_query::hover::DEFAULT_SEPARATOR;

/// Renders the per-district counts for `data`, optionally followed by the
/// hover text of every plotted request.
pub fn render(data: &PlotData<'_>, selection: &FilterSelection, show_hover: bool) -> String {
    let mut out = String::new();

    let types: Vec<String> = selection
        .incident_types
        .iter()
        .map(ToString::to_string)
        .collect();
    let _ = writeln!(
        out,
        "Types: {}  Window: {}",
        if types.is_empty() {
            "(none)".to_string()
        } else {
            types.join(",")
        },
        selection.time_window.label()
    );
    let _ = writeln!(
        out,
        "Matched {} of {} requests",
        data.records.len(),
        data.source_count
    );

    let counts = data.district_counts();
    if !counts.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{:<24} COUNT", "DISTRICT");
        let _ = writeln!(out, "{}", "-".repeat(30));
        for count in &counts {
            let _ = writeln!(out, "{:<24} {}", count.district, count.count);
        }
    }

    if show_hover {
        let markers = data.markers(DEFAULT_SEPARATOR);
        let _ = writeln!(
            out,
            "\n{} of {} matching requests have map coordinates",
            markers.len(),
            data.records.len()
        );
        for marker in markers {
            let _ = writeln!(
                out,
                "\n[{}] ({:.5}, {:.5})\n{}",
                marker.id, marker.latitude, marker.longitude, marker.text
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use rescue_dashboard_incident_models::{IncidentRecord, NeedFlag, TimeWindow};
    use rescue_dashboard_query::clock::DashboardClock;
    use rescue_dashboard_query::filter::plot_data;

    use super::*;

    fn record(id: i64, flag: NeedFlag, district: &str, coords: bool) -> IncidentRecord {
        IncidentRecord {
            id,
            location: format!("Ward {id}"),
            requestee_phone: "123".to_owned(),
            district: district.to_owned(),
            latitude: coords.then_some(9.5),
            longitude: coords.then_some(76.3),
            requested_at: Utc.with_ymd_and_hms(2018, 8, 16, 10, 0, 0).unwrap(),
            need_flags: [flag].into(),
            need_others: None,
            detail_med: None,
            detail_rescue: Some("need boat".to_owned()),
        }
    }

    fn table() -> Vec<IncidentRecord> {
        vec![
            record(1, NeedFlag::NeedRescue, "Alappuzha", true),
            record(2, NeedFlag::NeedMed, "Kollam", true),
            record(3, NeedFlag::NeedRescue, "Thrissur", false),
            record(4, NeedFlag::NeedRescue, "Alappuzha", true),
        ]
    }

    #[test]
    fn lists_district_counts() {
        let table = table();
        let selection = FilterSelection::default();
        let data = plot_data(&table, &selection, &DashboardClock::utc());

        let out = render(&data, &selection, false);

        assert!(out.starts_with("Types: needrescue  Window: All\n"));
        assert!(out.contains("Matched 3 of 4 requests"));
        assert!(out.contains(&format!("{:<24} 2", "Alappuzha")));
        assert!(out.contains(&format!("{:<24} 1", "Thrissur")));
        assert!(!out.contains("Kollam"));
        assert!(!out.contains("Phone:"));
    }

    #[test]
    fn hover_lists_only_plotted_requests() {
        let table = table();
        let selection = FilterSelection::default();
        let data = plot_data(&table, &selection, &DashboardClock::utc());

        let out = render(&data, &selection, true);

        assert!(out.contains("2 of 3 matching requests have map coordinates"));
        assert!(out.contains("Ward 1\nPhone:123\ndetailrescue:need boat"));
        assert!(!out.contains("Ward 3"));
    }

    #[test]
    fn empty_selection_shows_no_table() {
        let table = table();
        let selection = FilterSelection::new([], TimeWindow::All);
        let data = plot_data(&table, &selection, &DashboardClock::utc());

        let out = render(&data, &selection, false);

        assert!(out.starts_with("Types: (none)"));
        assert!(out.contains("Matched 0 of 4 requests"));
        assert!(!out.contains("DISTRICT"));
    }
}
