//! Dashboard colors and map layout.
//!
//! The defaults live in `theme.toml`, baked into the binary at compile time
//! via [`include_str!`]. An override file only needs the keys it changes;
//! everything else is taken from the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Theme TOML embedded at compile time.
const DEFAULT_THEME_TOML: &str = include_str!("theme.toml");

/// Page-level styling plus the settings for both charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), deny_unknown_fields)]
pub struct DashboardTheme {
    /// Page heading.
    pub title: String,
    /// Page background color.
    pub background: String,
    /// Heading and label color.
    pub text: String,
    /// Heading font.
    pub font_family: String,
    /// Map widget settings.
    pub map: MapTheme,
    /// Bar chart settings.
    pub bar: BarTheme,
}

/// Map widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), deny_unknown_fields)]
pub struct MapTheme {
    /// Initial map center latitude.
    pub center_lat: f64,
    /// Initial map center longitude.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Widget height in pixels.
    pub height: u32,
    /// Plotly map base style.
    pub style: String,
    /// Marker diameter in pixels.
    pub marker_size: f64,
    /// Marker fill color.
    pub marker_color: String,
}

/// Bar chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), deny_unknown_fields)]
pub struct BarTheme {
    /// Bar fill color.
    pub fill_color: String,
    /// Bar outline color.
    pub line_color: String,
    /// Bar outline width.
    pub line_width: f64,
    /// Gap between bar groups, as a fraction of the group width.
    pub group_gap: f64,
}

/// Loads the theme, layering the file at `overrides` (if any) on top of the
/// embedded defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the override file cannot be read, is not
/// valid TOML, or contains unknown keys or mistyped values.
pub fn load_theme(overrides: Option<&Path>) -> Result<DashboardTheme, ConfigError> {
    let mut table: toml::Table = DEFAULT_THEME_TOML.parse()?;

    if let Some(path) = overrides {
        log::info!("Loading theme overrides from {}", path.display());
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ThemeRead {
                path: path.to_path_buf(),
                source,
            })?;
        merge(&mut table, contents.parse()?);
    }

    Ok(toml::Value::Table(table).try_into()?)
}

/// Recursively copies `overlay` into `base`. Nested tables are merged key by
/// key; any other value replaces the base value.
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_child)), toml::Value::Table(overlay_child)) => {
                merge(base_child, overlay_child);
            }
            (Some(existing), value) => *existing = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let theme = load_theme(None).unwrap();
        assert_eq!(theme.title, "Kerala Rescue Dashboard");
        assert_eq!(theme.background, "#fff");
        assert_eq!(theme.map.height, 550);
        assert!((theme.bar.group_gap - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn overrides_merge_into_defaults() {
        let mut table: toml::Table = DEFAULT_THEME_TOML.parse().unwrap();
        merge(
            &mut table,
            "title = \"Relief Map\"\n[map]\nzoom = 9.0\n".parse().unwrap(),
        );
        let theme: DashboardTheme = toml::Value::Table(table).try_into().unwrap();

        assert_eq!(theme.title, "Relief Map");
        assert!((theme.map.zoom - 9.0).abs() < f64::EPSILON);
        assert_eq!(theme.map.marker_color, "rgba(255, 77, 77, 0.5)");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut table: toml::Table = DEFAULT_THEME_TOML.parse().unwrap();
        merge(&mut table, "colour = \"red\"\n".parse().unwrap());
        assert!(
            toml::Value::Table(table)
                .try_into::<DashboardTheme>()
                .is_err()
        );
    }

    #[test]
    fn serializes_camel_case_for_the_api() {
        let json = serde_json::to_value(load_theme(None).unwrap()).unwrap();
        assert_eq!(json["fontFamily"], "Poppins");
        assert_eq!(json["map"]["markerColor"], "rgba(255, 77, 77, 0.5)");
        assert_eq!(json["bar"]["lineColor"], "rgb(8,48,107)");
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let err = load_theme(Some(Path::new("/nonexistent/theme.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ThemeRead { .. }));
    }
}
