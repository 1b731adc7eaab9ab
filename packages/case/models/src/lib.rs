#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case record and classification types.
//!
//! A case is one geotagged, dated field observation of cassava plants,
//! classified by disease status. These types are shared by the dataset
//! loader, the dashboard engine, and the API server.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Stable case identifier, used as the join key between the map, the
/// detail panel, and every derived view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(String);

impl CaseId {
    /// Creates a case ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A classification label attached to every case.
///
/// Datasets use a small closed set of labels, but the set differs between
/// surveys (`Infected`/`Not Infected`, `Class A`/`Class B`/`Class C`, ...),
/// so the label is kept as an open string. The binary disease labels are
/// available through [`CaseStatus`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classification(String);

impl Classification {
    /// Creates a classification from a label. Surrounding whitespace is
    /// trimmed so that loader and UI input compare equal.
    #[must_use]
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_owned())
    }

    /// Returns the label as it appears in the dataset.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case phrase used in readouts, e.g. `"non-infected"` for
    /// `"Not Infected"`.
    #[must_use]
    pub fn phrase(&self) -> String {
        let lower = self.0.to_lowercase();
        lower
            .strip_prefix("not ")
            .map_or(lower.clone(), |rest| format!("non-{rest}"))
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Classification {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CaseStatus> for Classification {
    fn from(status: CaseStatus) -> Self {
        Self::new(status.as_ref())
    }
}

/// Binary disease status used by the toggle switch.
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
pub enum CaseStatus {
    /// Plant shows disease symptoms.
    #[serde(rename = "Infected")]
    #[strum(serialize = "Infected")]
    Infected,
    /// Plant was inspected and found clean.
    #[serde(rename = "Not Infected")]
    #[strum(serialize = "Not Infected")]
    NotInfected,
}

impl CaseStatus {
    /// Maps the toggle switch position to a status: on shows infected
    /// cases, off shows non-infected ones.
    #[must_use]
    pub const fn from_toggle(on: bool) -> Self {
        if on { Self::Infected } else { Self::NotInfected }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Infected, Self::NotInfected]
    }
}

/// One observation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Unique case number.
    pub id: CaseId,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Observation year.
    pub year: i32,
    /// Day/month part of the observation date, as recorded.
    pub date: String,
    /// Disease classification.
    pub classification: Classification,
    /// Optional severity weight, used for map marker encoding.
    pub magnitude: Option<f64>,
    /// Identifier of the surveyor who submitted the case.
    pub user_id: String,
}

impl CaseRecord {
    /// Full display date, `<date>-<year>`.
    #[must_use]
    pub fn display_date(&self) -> String {
        format!("{}-{}", self.date, self.year)
    }
}
