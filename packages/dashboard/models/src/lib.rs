#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and output types of the dashboard pipeline.
//!
//! [`FilterState`] is what the user controls; everything else here is a
//! plain, serializable description of a derived view (aggregate series,
//! map frames, chart specs) that a renderer turns into pixels.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use cbsd_map_case_models::{CaseId, CaseStatus, Classification};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Inclusive year range selected on the year slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First year shown.
    pub min: i32,
    /// Last year shown.
    pub max: i32,
}

impl YearRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range is valid when `min <= max`. Invalid ranges select nothing.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.min <= self.max
    }

    /// Whether `year` falls inside the inclusive range.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Narrows this range to `bounds`. A range entirely outside `bounds`
    /// comes back inverted, so it selects nothing.
    #[must_use]
    pub fn clamp_to(self, bounds: Self) -> Self {
        Self {
            min: self.min.max(bounds.min),
            max: self.max.min(bounds.max),
        }
    }

    /// Years on the chart x-axis: `min..max`, excluding `max`.
    ///
    /// Empty when `max <= min`.
    #[must_use]
    pub const fn axis_years(self) -> Range<i32> {
        self.min..self.max
    }
}

/// Which classifications the user has selected.
///
/// The toggle switch selects exactly one class; the checklist selects any
/// number of them. Both filter through [`Self::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode", content = "classes")]
pub enum ClassificationSelector {
    /// Toggle mode.
    Single(Classification),
    /// Checklist mode.
    AnyOf(BTreeSet<Classification>),
}

impl ClassificationSelector {
    /// Selector for the binary toggle switch.
    #[must_use]
    pub fn from_toggle(on: bool) -> Self {
        Self::Single(CaseStatus::from_toggle(on).into())
    }

    /// Checklist selector from any collection of labels.
    #[must_use]
    pub fn any_of<I, C>(classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Classification>,
    {
        Self::AnyOf(classes.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn matches(&self, classification: &Classification) -> bool {
        match self {
            Self::Single(selected) => selected == classification,
            Self::AnyOf(selected) => selected.contains(classification),
        }
    }

    /// Selected classes in sorted order.
    #[must_use]
    pub fn classes(&self) -> Vec<&Classification> {
        match self {
            Self::Single(selected) => vec![selected],
            Self::AnyOf(selected) => selected.iter().collect(),
        }
    }

    /// Readout shown next to the class selector, e.g.
    /// `"Showing non-infected cases"`.
    #[must_use]
    pub fn label(&self) -> String {
        let phrases: Vec<String> = self.classes().iter().map(|c| c.phrase()).collect();
        if phrases.is_empty() {
            "No classes selected".to_owned()
        } else {
            format!("Showing {} cases", phrases.join(", "))
        }
    }
}

impl Default for ClassificationSelector {
    fn default() -> Self {
        Self::from_toggle(true)
    }
}

/// Tabs of the chart panel.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewId {
    /// Line chart of cases by year.
    CumGraph,
    /// Bar chart of cases per year.
    IndGraph,
}

impl ViewId {
    /// Tab caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CumGraph => "Cumulative number of cases by year",
            Self::IndGraph => "Number of cases per year",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::CumGraph, Self::IndGraph]
    }
}

/// Everything the user currently has selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Year slider position.
    pub year_range: YearRange,
    /// Class toggle or checklist.
    pub selector: ClassificationSelector,
    /// Case clicked on the map, if any.
    pub selected_id: Option<CaseId>,
    /// Active chart tab, if any.
    pub active_view: Option<ViewId>,
}

impl FilterState {
    #[must_use]
    pub const fn new(year_range: YearRange, selector: ClassificationSelector) -> Self {
        Self {
            year_range,
            selector,
            selected_id: None,
            active_view: None,
        }
    }

    #[must_use]
    pub fn with_selected_id(mut self, id: impl Into<CaseId>) -> Self {
        self.selected_id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_active_view(mut self, view: ViewId) -> Self {
        self.active_view = Some(view);
        self
    }
}

/// Count for a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

/// Smallest and largest count across a set of series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u64,
    pub max: u64,
}

/// Zero-filled per-year counts for each requested classification.
///
/// Every series covers the same years, so series can share one x-axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSeries {
    /// Per-class counts, one entry per axis year.
    pub series: BTreeMap<Classification, Vec<YearCount>>,
    /// Shared y-axis bounds.
    pub count_range: CountRange,
}

impl YearSeries {
    /// The series for one classification.
    #[must_use]
    pub fn get(&self, classification: &Classification) -> Option<&[YearCount]> {
        self.series.get(classification).map(Vec::as_slice)
    }

    /// Count for one classification and year, if that year is on the axis.
    #[must_use]
    pub fn count(&self, classification: &Classification, year: i32) -> Option<u64> {
        self.get(classification)?
            .iter()
            .find(|point| point.year == year)
            .map(|point| point.count)
    }
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Case id, sent back by the map on click.
    pub id: CaseId,
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: Option<f64>,
}

/// Points shown at one step of the map animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFrame {
    /// Player address, `frame<year>`.
    pub name: String,
    /// Every point with `year <= year_cutoff` is included.
    pub year_cutoff: i32,
    pub points: Vec<MapPoint>,
}

impl MapFrame {
    /// Frame name used by the slider and player for `year`.
    #[must_use]
    pub fn name_for(year: i32) -> String {
        format!("frame{year}")
    }
}

/// Slider entry that jumps the animation to one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderStep {
    /// Text under the slider tick (the year).
    pub label: String,
    /// Name of the frame to show.
    pub frame: String,
}

/// Cumulative map animation over a year range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAnimation {
    /// Snapshot shown before playback starts. `None` for an invalid range.
    pub initial: Option<MapFrame>,
    /// One frame per year, ascending and contiguous.
    pub frames: Vec<MapFrame>,
    /// One slider step per frame.
    pub steps: Vec<SliderStep>,
}

/// Range of magnitudes on the map, used for color and size encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeScale {
    pub min: f64,
    pub max: f64,
}

impl MagnitudeScale {
    /// Position of `magnitude` in the scale, in `[0, 1]`. Points without a
    /// magnitude, and every point of a zero-width scale, sit in the middle.
    #[must_use]
    pub fn normalize(self, magnitude: Option<f64>) -> f64 {
        let width = self.max - self.min;
        match magnitude {
            Some(m) if width > 0.0 => ((m - self.min) / width).clamp(0.0, 1.0),
            _ => 0.5,
        }
    }
}

/// Geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Base map camera and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayout {
    pub center: GeoPoint,
    pub zoom: f64,
    /// Tile style URL. Credentials are the renderer's business.
    pub style: Option<String>,
}

/// Map view description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum MapSpec {
    /// All points of the current range at once.
    #[serde(rename_all = "camelCase")]
    Static {
        snapshot: MapFrame,
        /// `None` when no point carries a magnitude.
        scale: Option<MagnitudeScale>,
        layout: MapLayout,
    },
    /// Year-by-year cumulative playback.
    #[serde(rename_all = "camelCase")]
    Animated {
        animation: MapAnimation,
        layout: MapLayout,
    },
}

/// Chart geometry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

/// One chart axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub title: String,
    /// `[low, high]`.
    pub range: [f64; 2],
    /// Tick spacing, `None` for automatic.
    pub dtick: Option<f64>,
}

/// One named series on a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub x: Vec<i32>,
    pub y: Vec<u64>,
    /// Hex color, e.g. `#407438`.
    pub color: String,
}

/// Declarative chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub view: ViewId,
    pub title: String,
    pub kind: ChartKind,
    pub series: Vec<ChartSeries>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
}

/// Charts for every tab, built from the same year series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    pub cum_graph: ChartSpec,
    pub ind_graph: ChartSpec,
}

impl ChartSet {
    #[must_use]
    pub const fn get(&self, view: ViewId) -> &ChartSpec {
        match view {
            ViewId::CumGraph => &self.cum_graph,
            ViewId::IndGraph => &self.ind_graph,
        }
    }
}

/// What the chart panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "chart")]
pub enum RenderedView {
    Chart(ChartSpec),
    /// No tab chosen yet, or charts not computed.
    Empty,
}

/// Message shown in the detail panel when no case matches the click.
pub const NO_CASE_SELECTED: &str = "No case selected";

/// Detail panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum CaseDetail {
    #[serde(rename_all = "camelCase")]
    Found {
        number: CaseId,
        user_id: String,
        /// `<date>-<year>`.
        date: String,
        classification: Classification,
    },
    NotFound { message: String },
}

impl CaseDetail {
    #[must_use]
    pub fn not_found() -> Self {
        Self::NotFound {
            message: NO_CASE_SELECTED.to_owned(),
        }
    }

    /// Panel text, one entry per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Found {
                number,
                user_id,
                date,
                classification,
            } => vec![
                format!("Case #: {number}"),
                format!("User ID: {user_id}"),
                format!("Date: {date}"),
                format!("Status: {classification}"),
            ],
            Self::NotFound { message } => vec![message.clone()],
        }
    }
}

/// Every derived view for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Cases matching the year range and class selector.
    pub total_count: u64,
    pub toggle_label: String,
    pub detail: CaseDetail,
    pub map: MapSpec,
    pub charts: ChartSet,
    /// Chart for the active tab.
    pub active: RenderedView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_bounds() {
        let range = YearRange::new(2018, 2020);
        assert!(range.contains(2018));
        assert!(range.contains(2020));
        assert!(!range.contains(2021));
        assert_eq!(range.axis_years().collect::<Vec<_>>(), vec![2018, 2019]);
        assert!(YearRange::new(2019, 2019).axis_years().next().is_none());
        assert!(!YearRange::new(2020, 2019).is_valid());
    }

    #[test]
    fn clamping_narrows_to_bounds() {
        let bounds = YearRange::new(2018, 2019);
        assert_eq!(YearRange::new(i32::MIN, i32::MAX).clamp_to(bounds), bounds);
        assert_eq!(
            YearRange::new(2019, 2030).clamp_to(bounds),
            YearRange::new(2019, 2019)
        );
        assert!(!YearRange::new(2030, 2040).clamp_to(bounds).is_valid());
        assert!(!YearRange::new(2000, 2010).clamp_to(bounds).is_valid());
    }

    #[test]
    fn single_and_checklist_selectors_match() {
        let infected = Classification::from("Infected");
        let clean = Classification::from("Not Infected");

        let toggle = ClassificationSelector::from_toggle(true);
        assert!(toggle.matches(&infected));
        assert!(!toggle.matches(&clean));

        let checklist = ClassificationSelector::any_of(["Infected", "Not Infected"]);
        assert!(checklist.matches(&infected));
        assert!(checklist.matches(&clean));
        assert!(!ClassificationSelector::any_of(Vec::<&str>::new()).matches(&infected));
    }

    #[test]
    fn selector_labels() {
        assert_eq!(
            ClassificationSelector::from_toggle(true).label(),
            "Showing infected cases"
        );
        assert_eq!(
            ClassificationSelector::from_toggle(false).label(),
            "Showing non-infected cases"
        );
        assert_eq!(
            ClassificationSelector::any_of(["Class B", "Class A"]).label(),
            "Showing class a, class b cases"
        );
        assert_eq!(
            ClassificationSelector::any_of(Vec::<&str>::new()).label(),
            "No classes selected"
        );
    }

    #[test]
    fn view_ids_use_tab_ids() {
        assert_eq!("cum_graph".parse::<ViewId>().unwrap(), ViewId::CumGraph);
        assert_eq!(ViewId::IndGraph.to_string(), "ind_graph");
        assert_eq!(
            serde_json::to_string(&ViewId::CumGraph).unwrap(),
            "\"cum_graph\""
        );
        assert!("map".parse::<ViewId>().is_err());
    }

    #[test]
    fn magnitude_scale_normalizes() {
        let scale = MagnitudeScale { min: 1.0, max: 3.0 };
        assert!((scale.normalize(Some(2.0)) - 0.5).abs() < f64::EPSILON);
        assert!((scale.normalize(Some(5.0)) - 1.0).abs() < f64::EPSILON);
        assert!((scale.normalize(None) - 0.5).abs() < f64::EPSILON);
        let flat = MagnitudeScale { min: 2.0, max: 2.0 };
        assert!((flat.normalize(Some(2.0)) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn detail_lines() {
        let found = CaseDetail::Found {
            number: CaseId::from("1670"),
            user_id: "alice".to_owned(),
            date: "12-03-2018".to_owned(),
            classification: Classification::from("Infected"),
        };
        assert_eq!(
            found.lines(),
            vec![
                "Case #: 1670",
                "User ID: alice",
                "Date: 12-03-2018",
                "Status: Infected"
            ]
        );
        assert_eq!(CaseDetail::not_found().lines(), vec![NO_CASE_SELECTED]);
    }
}
