#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable in-memory case dataset.
//!
//! The [`DatasetStore`] is built once at startup (usually through
//! [`loader::load_csv`]) and is only ever read afterwards. It owns the
//! records in file order together with an id index, so every consumer can
//! hold a shared reference without locking.

pub mod loader;

use std::collections::{BTreeSet, HashMap};

use cbsd_map_case_models::{CaseId, CaseRecord, Classification};

pub use loader::{LoadReport, load_csv, load_from_reader};

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited file is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// Canonical name of the missing column.
        column: &'static str,
    },
}

/// Read-only table of cases plus lookup structures derived from it.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    records: Vec<CaseRecord>,
    index: HashMap<CaseId, usize>,
    classifications: Vec<Classification>,
    years: BTreeSet<i32>,
}

impl DatasetStore {
    /// Builds a store from records in dataset order.
    ///
    /// Ids must be unique; when the same id appears again the first record
    /// is kept and later ones are discarded with a warning.
    #[must_use]
    pub fn new(records: Vec<CaseRecord>) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        let mut classifications = BTreeSet::new();
        let mut years = BTreeSet::new();

        for record in records {
            if index.contains_key(&record.id) {
                log::warn!("Dropping case with duplicate id {}", record.id);
                continue;
            }
            index.insert(record.id.clone(), kept.len());
            classifications.insert(record.classification.clone());
            years.insert(record.year);
            kept.push(record);
        }

        Self {
            records: kept,
            index,
            classifications: classifications.into_iter().collect(),
            years,
        }
    }

    /// All records in dataset order.
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record survived loading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id in constant time.
    #[must_use]
    pub fn get(&self, id: &CaseId) -> Option<&CaseRecord> {
        self.index.get(id).map(|&idx| &self.records[idx])
    }

    /// Distinct classifications present in the dataset, sorted.
    #[must_use]
    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    /// Distinct years present in the dataset, ascending. These are the
    /// marks of the year slider.
    #[must_use]
    pub const fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Smallest and largest year in the dataset, or `None` when empty.
    #[must_use]
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }
}

impl FromIterator<CaseRecord> for DatasetStore {
    fn from_iter<I: IntoIterator<Item = CaseRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: &str, year: i32, class: &str) -> CaseRecord {
        CaseRecord {
            id: CaseId::from(id),
            latitude: -4.0,
            longitude: 36.0,
            year,
            date: "01-01".to_owned(),
            classification: Classification::from(class),
            magnitude: None,
            user_id: "u".to_owned(),
        }
    }

    #[test]
    fn lookup_round_trips_every_record() {
        let store = DatasetStore::new(vec![
            case("1", 2018, "Infected"),
            case("2", 2018, "Not Infected"),
            case("3", 2019, "Infected"),
        ]);
        for record in store.records() {
            assert_eq!(store.get(&record.id), Some(record));
        }
        assert!(store.get(&CaseId::from("missing")).is_none());
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let store = DatasetStore::new(vec![
            case("1", 2018, "Infected"),
            case("1", 2020, "Not Infected"),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&CaseId::from("1")).unwrap().year, 2018);
    }

    #[test]
    fn derived_metadata() {
        let store: DatasetStore = vec![
            case("1", 2019, "Not Infected"),
            case("2", 2017, "Infected"),
            case("3", 2019, "Infected"),
        ]
        .into_iter()
        .collect();
        assert_eq!(store.year_bounds(), Some((2017, 2019)));
        assert_eq!(
            store.classifications(),
            &[Classification::from("Infected"), Classification::from("Not Infected")]
        );
        assert_eq!(store.years().iter().copied().collect::<Vec<_>>(), vec![2017, 2019]);
    }

    #[test]
    fn empty_store_has_no_bounds() {
        let store = DatasetStore::default();
        assert!(store.is_empty());
        assert_eq!(store.year_bounds(), None);
        assert!(store.classifications().is_empty());
    }
}
