#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter, aggregation, and view-spec pipeline for the case dashboard.
//!
//! Every user interaction produces a new [`FilterState`]. [`Dashboard::derive`]
//! turns that state into a [`DashboardView`]: the totals readout, the toggle
//! label, the detail panel, the map spec, and the chart specs. Derivation is
//! a pure function of the dataset, the configuration, and the filter state,
//! so identical inputs always give identical outputs.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod detail;
pub mod dispatch;
pub mod frames;
pub mod subset;

use cbsd_map_dashboard_models::{
    ChartSet, ClassificationSelector, DashboardView, FilterState, MapSpec, YearRange,
};
use cbsd_map_dataset::DatasetStore;

use crate::config::{DashboardConfig, MapMode};
use crate::subset::Subset;

/// Derives dashboard views from a shared dataset and configuration.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    store: &'a DatasetStore,
    config: &'a DashboardConfig,
}

impl<'a> Dashboard<'a> {
    #[must_use]
    pub const fn new(store: &'a DatasetStore, config: &'a DashboardConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub const fn store(&self) -> &'a DatasetStore {
        self.store
    }

    /// State shown when the page first opens: the whole year span of the
    /// dataset with the configured default class.
    #[must_use]
    pub fn default_filter(&self) -> FilterState {
        let (min, max) = self.store.year_bounds().unwrap_or((0, 0));
        FilterState::new(
            YearRange::new(min, max),
            ClassificationSelector::Single(self.config.filter.default_classification.clone()),
        )
    }

    /// Computes every view for `state`.
    #[must_use]
    pub fn derive(&self, state: &FilterState) -> DashboardView {
        let subset = subset::filter(self.store, state);
        let charts = self.charts(state.year_range);

        log::debug!(
            "Derived dashboard for {}..={}: {} of {} cases",
            state.year_range.min,
            state.year_range.max,
            subset.len(),
            self.store.len()
        );

        DashboardView {
            total_count: subset.len() as u64,
            toggle_label: state.selector.label(),
            detail: detail::lookup_selected(self.store, state.selected_id.as_ref()).detail(),
            map: self.map(&subset, state.year_range),
            active: dispatch::select(state.active_view, Some(&charts)),
            charts,
        }
    }

    /// Map view of `subset` in the configured mode.
    #[must_use]
    pub fn map(&self, subset: &Subset<'_>, range: YearRange) -> MapSpec {
        let layout = self.config.map.layout();
        match self.config.map.mode {
            MapMode::Static => {
                let (snapshot, scale) = frames::snapshot(subset, range.max);
                MapSpec::Static {
                    snapshot,
                    scale,
                    layout,
                }
            }
            MapMode::Animated => MapSpec::Animated {
                animation: frames::build_frames(subset, range),
                layout,
            },
        }
    }

    /// Charts for the chart panel.
    ///
    /// Only the year range narrows the charts: every class in the dataset
    /// gets a series whatever the class selector says, so the charts can
    /// compare classes.
    #[must_use]
    pub fn charts(&self, range: YearRange) -> ChartSet {
        let classes = self.store.classifications();
        let subset = subset::filter_by(
            self.store,
            range,
            &ClassificationSelector::any_of(classes.iter().cloned()),
        );
        charts::build_charts(
            &aggregate::aggregate(&subset, classes, range),
            range,
            &self.config.charts.palette,
            self.config.charts.cumulative,
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use cbsd_map_case_models::{CaseId, CaseRecord, Classification};
    use cbsd_map_dataset::DatasetStore;

    pub fn case(id: &str, year: i32, class: &str) -> CaseRecord {
        CaseRecord {
            id: CaseId::from(id),
            latitude: -4.0,
            longitude: 36.0,
            year,
            date: "01-01".to_owned(),
            classification: Classification::from(class),
            magnitude: None,
            user_id: "surveyor".to_owned(),
        }
    }

    /// Three cases: 2018 infected, 2018 not infected, 2019 infected.
    pub fn scenario_store() -> DatasetStore {
        vec![
            case("1", 2018, "Infected"),
            case("2", 2018, "Not Infected"),
            case("3", 2019, "Infected"),
        ]
        .into_iter()
        .collect()
    }
}
