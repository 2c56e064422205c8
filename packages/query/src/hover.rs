//! Hover text for map markers.
//!
//! The first two lines are always the location and `Phone:<number>`. After
//! them come `label:value` lines for whichever of the detail fields are
//! filled in, in a fixed order. The line break token is chosen by the
//! caller: `\n` for terminals, `<br>` for the Plotly map.

use rescue_dashboard_incident_models::IncidentRecord;

/// Line break used by [`format_hover`].
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Line break understood by Plotly hover labels.
pub const HTML_SEPARATOR: &str = "<br>";

/// Formats `record` with `\n` line breaks.
#[must_use]
pub fn format_hover(record: &IncidentRecord) -> String {
    format_hover_with(record, DEFAULT_SEPARATOR)
}

/// Formats `record` with `separator` between lines.
#[must_use]
pub fn format_hover_with(record: &IncidentRecord, separator: &str) -> String {
    let mut lines = vec![
        record.location.clone(),
        format!("Phone:{}", record.requestee_phone),
    ];

    let details = [
        ("needothers", record.need_others.as_deref()),
        ("detailmed", record.detail_med.as_deref()),
        ("detailrescue", record.detail_rescue.as_deref()),
    ];

    for (label, value) in details {
        if let Some(value) = value.map(str::trim)
            && !value.is_empty()
        {
            lines.push(format!("{label}:{value}"));
        }
    }

    lines.join(separator)
}

/// Formats every record independently.
#[must_use]
pub fn hover_texts<'a>(
    records: impl IntoIterator<Item = &'a IncidentRecord>,
    separator: &str,
) -> Vec<String> {
    records
        .into_iter()
        .map(|record| format_hover_with(record, separator))
        .collect()
}
