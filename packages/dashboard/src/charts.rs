//! Declarative chart descriptions built from [`YearSeries`].

use cbsd_map_dashboard_models::{
    AxisSpec, ChartKind, ChartSeries, ChartSet, ChartSpec, CountRange, ViewId, YearRange,
    YearSeries,
};

use crate::config::{CumulativeMode, Palette};

const X_AXIS_TITLE: &str = "year";
const Y_AXIS_TITLE: &str = "Number of Cases";

/// Y-axis range for `counts`. A zero-width range is widened by one so
/// renderers never divide by zero.
#[allow(clippy::cast_precision_loss)]
fn y_axis(counts: CountRange) -> AxisSpec {
    let low = counts.min as f64;
    let high = counts.max as f64;
    AxisSpec {
        title: Y_AXIS_TITLE.to_owned(),
        range: if high > low { [low, high] } else { [low, low + 1.0] },
        dtick: None,
    }
}

fn x_axis(range: YearRange) -> AxisSpec {
    AxisSpec {
        title: X_AXIS_TITLE.to_owned(),
        range: [f64::from(range.min), f64::from(range.max)],
        dtick: Some(1.0),
    }
}

fn chart(
    view: ViewId,
    kind: ChartKind,
    series: &YearSeries,
    range: YearRange,
    palette: &Palette,
    shared_counts: Option<CountRange>,
    transform: impl Fn(Vec<u64>) -> Vec<u64>,
) -> ChartSpec {
    let x: Vec<i32> = range.axis_years().collect();
    let colors = palette.colors(kind, series.series.keys());

    let series: Vec<ChartSeries> = series
        .series
        .iter()
        .zip(colors)
        .map(|((classification, points), color)| ChartSeries {
            name: classification.to_string(),
            x: x.clone(),
            y: transform(points.iter().map(|p| p.count).collect()),
            color,
        })
        .collect();

    let counts = shared_counts.unwrap_or_else(|| {
        series
            .iter()
            .flat_map(|s| s.y.iter().copied())
            .fold(None, |acc: Option<CountRange>, c| {
                Some(acc.map_or(CountRange { min: c, max: c }, |r| CountRange {
                    min: r.min.min(c),
                    max: r.max.max(c),
                }))
            })
            .unwrap_or_default()
    });

    ChartSpec {
        view,
        title: view.label().to_owned(),
        kind,
        series,
        x_axis: x_axis(range),
        y_axis: y_axis(counts),
    }
}

fn running_total(counts: Vec<u64>) -> Vec<u64> {
    counts
        .into_iter()
        .scan(0_u64, |total, c| {
            *total += c;
            Some(*total)
        })
        .collect()
}

/// Builds the per-year bar chart and the line chart from one series.
///
/// Both charts share the x-axis `[range.min, range.max]`. With
/// [`CumulativeMode::PerYear`] the line chart plots the same counts as the
/// bars, and both take their y-axis from [`YearSeries::count_range`]. With
/// [`CumulativeMode::RunningTotal`] it plots running sums on its own
/// y-axis.
#[must_use]
pub fn build_charts(
    series: &YearSeries,
    range: YearRange,
    palette: &Palette,
    mode: CumulativeMode,
) -> ChartSet {
    let ind_graph = chart(
        ViewId::IndGraph,
        ChartKind::Bar,
        series,
        range,
        palette,
        Some(series.count_range),
        std::convert::identity,
    );
    let cum_graph = match mode {
        CumulativeMode::PerYear => chart(
            ViewId::CumGraph,
            ChartKind::Line,
            series,
            range,
            palette,
            Some(series.count_range),
            std::convert::identity,
        ),
        CumulativeMode::RunningTotal => chart(
            ViewId::CumGraph,
            ChartKind::Line,
            series,
            range,
            palette,
            None,
            running_total,
        ),
    };

    ChartSet {
        cum_graph,
        ind_graph,
    }
}
