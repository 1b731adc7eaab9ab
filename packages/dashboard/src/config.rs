//! Presentation settings for the dashboard.
//!
//! The defaults live in `dashboard.toml` at the package root, embedded at
//! compile time via [`include_str!`]. A user config file is merged on top
//! of it key by key, so any key left out keeps its bundled value.

use std::collections::BTreeMap;
use std::path::Path;

use cbsd_map_case_models::Classification;
use cbsd_map_dashboard_models::{ChartKind, GeoPoint, MapLayout};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Environment variable naming an optional config file.
pub const CONFIG_ENV_VAR: &str = "DASHBOARD_CONFIG";

/// Bundled defaults.
const BUNDLED_TOML: &str = include_str!("../dashboard.toml");

/// Color used when neither the palette nor its fallback list has one.
const DEFAULT_COLOR: &str = "#756263";

/// Errors that can occur while loading the dashboard configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has wrongly typed values.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How the map presents the selected cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MapMode {
    /// One snapshot with magnitude encoding.
    Static,
    /// Cumulative year-by-year frames with a slider.
    Animated,
}

/// What the "cumulative" line chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CumulativeMode {
    /// The per-year counts, drawn as a line.
    PerYear,
    /// The running sum of the per-year counts.
    RunningTotal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Class selected by the toggle when the page opens.
    pub default_classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub mode: MapMode,
    pub center: GeoPoint,
    pub zoom: f64,
    pub style: Option<String>,
}

impl MapConfig {
    #[must_use]
    pub fn layout(&self) -> MapLayout {
        MapLayout {
            center: self.center,
            zoom: self.zoom,
            style: self.style.clone(),
        }
    }
}

/// Series colors per chart kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub bar: BTreeMap<Classification, String>,
    pub line: BTreeMap<Classification, String>,
    /// Colors cycled through for classes missing from the maps above.
    pub fallback: Vec<String>,
}

impl Palette {
    /// One color per class of `classes`, in order.
    ///
    /// Classes named in the map for `kind` get their color. The others take
    /// fallback colors in turn, counting only the unnamed classes, so naming
    /// a class never shifts the colors of the rest.
    #[must_use]
    pub fn colors<'a, I>(&self, kind: ChartKind, classes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Classification>,
    {
        let named = match kind {
            ChartKind::Bar => &self.bar,
            ChartKind::Line => &self.line,
        };
        let mut unnamed = 0;

        classes
            .into_iter()
            .map(|classification| {
                if let Some(color) = named.get(classification) {
                    return color.clone();
                }
                let color = if self.fallback.is_empty() {
                    DEFAULT_COLOR.to_owned()
                } else {
                    self.fallback[unnamed % self.fallback.len()].clone()
                };
                unnamed += 1;
                color
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub cumulative: CumulativeMode,
    pub palette: Palette,
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub filter: FilterConfig,
    pub map: MapConfig,
    pub charts: ChartConfig,
}

impl Default for DashboardConfig {
    /// The bundled `dashboard.toml`.
    ///
    /// # Panics
    ///
    /// Panics if the bundled TOML is malformed (this is a compile-time
    /// guarantee since the file is embedded and covered by tests).
    fn default() -> Self {
        Self::from_toml_str("")
            .unwrap_or_else(|e| panic!("Failed to parse bundled dashboard.toml: {e}"))
    }
}

/// Copies every key of `overrides` into `base`. Nested tables are merged
/// recursively; any other value replaces the base value.
fn merge(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(table)) => {
                merge(base_table, table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

impl DashboardConfig {
    /// Parses a configuration from TOML text, taking every missing key from
    /// the bundled defaults.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Toml`] if the text is not a valid configuration
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(BUNDLED_TOML)?;
        merge(&mut table, toml::from_str(text)?);
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file cannot be read
    /// * [`ConfigError::Toml`] if the file is not a valid configuration
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading dashboard config from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
