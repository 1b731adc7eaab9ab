#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the case map server.
//!
//! The frontend sends one [`FilterEvent`] per widget change. Events are
//! loose on purpose (every field optional, several shapes for the class
//! selector) and are normalized into a
//! [`cbsd_map_dashboard_models::FilterState`] before derivation.

use cbsd_map_case_models::{CaseId, CaseStatus, Classification};
use cbsd_map_dashboard_models::{
    CaseDetail, ClassificationSelector, FilterState, ViewId, YearRange,
};
use serde::{Deserialize, Serialize};

/// Class selector as sent by the different widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationMode {
    /// Toggle switch position (on = infected).
    Toggle(bool),
    /// Radio button or dropdown value.
    Single(String),
    /// Checklist values.
    Many(Vec<String>),
}

impl From<ClassificationMode> for ClassificationSelector {
    fn from(mode: ClassificationMode) -> Self {
        match mode {
            ClassificationMode::Toggle(on) => Self::from_toggle(on),
            ClassificationMode::Single(class) => Self::Single(Classification::new(class)),
            ClassificationMode::Many(classes) => Self::any_of(classes.iter().map(Classification::new)),
        }
    }
}

/// Widget state sent by the frontend on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEvent {
    /// Year slider as `[min, max]`.
    pub year_range: Option<[i32; 2]>,
    /// Class selector.
    pub classification_mode: Option<ClassificationMode>,
    /// Case id from the last map click.
    pub selected_id: Option<String>,
    /// Active chart tab id (`cum_graph` or `ind_graph`).
    pub active_view: Option<String>,
}

impl FilterEvent {
    /// Builds the filter state for this event, taking missing fields from
    /// `defaults`. An unrecognized tab id is ignored.
    ///
    /// The requested years are clamped to `defaults.year_range`, the span
    /// the year slider offers, so the size of every derived view stays
    /// bounded by the dataset rather than by the request.
    #[must_use]
    pub fn into_filter_state(self, defaults: FilterState) -> FilterState {
        FilterState {
            year_range: self.year_range.map_or(defaults.year_range, |[min, max]| {
                YearRange::new(min, max).clamp_to(defaults.year_range)
            }),
            selector: self
                .classification_mode
                .map_or(defaults.selector, ClassificationSelector::from),
            selected_id: self.selected_id.map(CaseId::new).or(defaults.selected_id),
            active_view: self
                .active_view
                .and_then(|view| view.parse::<ViewId>().ok())
                .or(defaults.active_view),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of cases loaded.
    pub case_count: u64,
}

/// Values for populating the filter widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterOptions {
    /// Distinct classes in the dataset, sorted.
    pub classifications: Vec<Classification>,
    /// Labels for the binary toggle switch, `[on, off]`.
    pub toggle_classes: Vec<CaseStatus>,
    /// Year slider marks.
    pub years: Vec<i32>,
    /// Tabs of the chart panel.
    pub views: Vec<ApiView>,
    /// State to show before any interaction.
    pub default_filter: FilterState,
}

/// A chart tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiView {
    pub id: ViewId,
    pub label: String,
}

/// Detail panel response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCaseDetail {
    /// Structured detail.
    pub detail: CaseDetail,
    /// Panel text, one entry per line.
    pub lines: Vec<String>,
}

impl From<CaseDetail> for ApiCaseDetail {
    fn from(detail: CaseDetail) -> Self {
        Self {
            lines: detail.lines(),
            detail,
        }
    }
}
