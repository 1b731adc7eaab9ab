//! Chooses what the chart panel shows for the active tab.

use cbsd_map_dashboard_models::{ChartSet, RenderedView, ViewId};

/// Returns the chart for `active_view`, or [`RenderedView::Empty`] while no
/// tab is chosen or the charts have not been computed yet.
#[must_use]
pub fn select(active_view: Option<ViewId>, charts: Option<&ChartSet>) -> RenderedView {
    match (active_view, charts) {
        (Some(view), Some(charts)) => RenderedView::Chart(charts.get(view).clone()),
        _ => RenderedView::Empty,
    }
}
