//! Per-year, per-classification case counts.

use std::collections::BTreeMap;

use cbsd_map_case_models::Classification;
use cbsd_map_dashboard_models::{CountRange, YearCount, YearRange, YearSeries};

use crate::subset::Subset;

/// Counts `subset` by `(year, classification)` and lays the counts out on
/// the chart axis `range.min..range.max`.
///
/// Every requested class gets one entry per axis year, with `0` for years
/// that have no matching case, so all series line up on one x-axis. The
/// returned [`CountRange`] spans every emitted value and is `(0, 0)` when
/// nothing is emitted.
#[must_use]
pub fn aggregate(
    subset: &Subset<'_>,
    classifications: &[Classification],
    range: YearRange,
) -> YearSeries {
    let mut groups: BTreeMap<(i32, &Classification), u64> = BTreeMap::new();
    for record in subset.iter() {
        *groups.entry((record.year, &record.classification)).or_default() += 1;
    }

    let mut series = BTreeMap::new();
    let mut count_range: Option<CountRange> = None;

    for classification in classifications {
        let counts: Vec<YearCount> = range
            .axis_years()
            .map(|year| YearCount {
                year,
                count: groups.get(&(year, classification)).copied().unwrap_or(0),
            })
            .collect();

        for point in &counts {
            count_range = Some(count_range.map_or(
                CountRange {
                    min: point.count,
                    max: point.count,
                },
                |r| CountRange {
                    min: r.min.min(point.count),
                    max: r.max.max(point.count),
                },
            ));
        }

        series.insert(classification.clone(), counts);
    }

    log::trace!(
        "Aggregated {} cases into {} series over {}..{}",
        subset.len(),
        series.len(),
        range.min,
        range.max
    );

    YearSeries {
        series,
        count_range: count_range.unwrap_or_default(),
    }
}
