//! Filtering of the dataset by year range and classification.

use cbsd_map_case_models::CaseRecord;
use cbsd_map_dashboard_models::{ClassificationSelector, FilterState, YearRange};
use cbsd_map_dataset::DatasetStore;

/// Records matching a filter, in dataset order.
///
/// Borrows from the [`DatasetStore`]; a new subset is built for every
/// filter change rather than edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subset<'a> {
    records: Vec<&'a CaseRecord>,
}

impl<'a> Subset<'a> {
    #[must_use]
    pub fn records(&self) -> &[&'a CaseRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CaseRecord> + '_ {
        self.records.iter().copied()
    }
}

impl<'a> FromIterator<&'a CaseRecord> for Subset<'a> {
    fn from_iter<I: IntoIterator<Item = &'a CaseRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Applies the year range and class selector of `state`.
#[must_use]
pub fn filter<'a>(store: &'a DatasetStore, state: &FilterState) -> Subset<'a> {
    filter_by(store, state.year_range, &state.selector)
}

/// Keeps every record with `range.min <= year <= range.max` whose class
/// matches `selector`.
///
/// An inverted range selects nothing.
#[must_use]
pub fn filter_by<'a>(
    store: &'a DatasetStore,
    range: YearRange,
    selector: &ClassificationSelector,
) -> Subset<'a> {
    if !range.is_valid() {
        log::debug!(
            "Inverted year range {}..={}, selecting nothing",
            range.min,
            range.max
        );
        return Subset::default();
    }

    let subset: Subset<'a> = store
        .records()
        .iter()
        .filter(|record| range.contains(record.year) && selector.matches(&record.classification))
        .collect();

    log::trace!(
        "Filtered {} of {} cases for {}..={}",
        subset.len(),
        store.len(),
        range.min,
        range.max
    );

    subset
}

/// Number of cases shown in the totals readout.
#[must_use]
pub fn total_count(store: &DatasetStore, state: &FilterState) -> u64 {
    filter(store, state).len() as u64
}
