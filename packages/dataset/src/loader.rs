//! Delimited-file loader for case datasets.
//!
//! Reads a header row, resolves the known column names (with a few
//! aliases), and converts every data row into a [`CaseRecord`]. Rows with
//! an empty or unparsable field are dropped and counted in the
//! [`LoadReport`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use cbsd_map_case_models::{CaseId, CaseRecord, Classification};
use csv::StringRecord;

use crate::{DatasetError, DatasetStore};

/// Summary of a dataset load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read from the file (header excluded).
    pub rows_read: u64,
    /// Rows discarded because a field was missing or unparsable.
    pub rows_dropped: u64,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    latitude: usize,
    longitude: usize,
    year: usize,
    classification: usize,
    date: usize,
    user_id: usize,
    magnitude: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase().replace('_', " "))
            .collect();

        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));
        let require = |column: &'static str, aliases: &[&str]| {
            find(aliases).ok_or(DatasetError::MissingColumn { column })
        };

        Ok(Self {
            id: require("number", &["number", "id"])?,
            latitude: require("latitude", &["latitude", "lat"])?,
            longitude: require("longitude", &["longitude", "lon", "lng"])?,
            year: require("year", &["year"])?,
            classification: require("classification", &["classification", "class"])?,
            date: require("date", &["date"])?,
            user_id: require("user id", &["user id", "userid"])?,
            magnitude: find(&["magnitude"]),
        })
    }

    fn parse(&self, row: &StringRecord) -> Option<CaseRecord> {
        let field = |idx: usize| row.get(idx).map(str::trim).filter(|v| !v.is_empty());

        let magnitude = match self.magnitude {
            Some(idx) => Some(field(idx)?.parse().ok()?),
            None => None,
        };

        Some(CaseRecord {
            id: CaseId::new(field(self.id)?),
            latitude: field(self.latitude)?.parse().ok()?,
            longitude: field(self.longitude)?.parse().ok()?,
            year: parse_year(field(self.year)?)?,
            date: field(self.date)?.to_owned(),
            classification: Classification::new(field(self.classification)?),
            magnitude,
            user_id: field(self.user_id)?.to_owned(),
        })
    }
}

/// Accepts integral years written either as `2018` or `2018.0`.
#[allow(clippy::cast_possible_truncation)]
fn parse_year(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().or_else(|| {
        let float: f64 = value.parse().ok()?;
        (float.fract() == 0.0 && float.is_finite()).then_some(float as i32)
    })
}

/// Loads a comma-separated dataset file.
///
/// # Errors
///
/// * [`DatasetError::Io`] if the file cannot be opened
/// * [`DatasetError::Csv`] if the file is not valid CSV
/// * [`DatasetError::MissingColumn`] if a required column is absent
pub fn load_csv(path: &Path) -> Result<(DatasetStore, LoadReport), DatasetError> {
    log::info!("Loading case dataset from {}", path.display());
    let file = File::open(path)?;
    load_from_reader(file, b',')
}

/// Loads a dataset from any reader using the given field delimiter.
///
/// # Errors
///
/// * [`DatasetError::Csv`] if the input is not valid delimited text
/// * [`DatasetError::MissingColumn`] if a required column is absent
pub fn load_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<(DatasetStore, LoadReport), DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        report.rows_read += 1;
        if let Some(record) = columns.parse(&row) {
            records.push(record);
        } else {
            report.rows_dropped += 1;
            log::debug!("Dropping incomplete row {}", report.rows_read);
        }
    }

    if report.rows_dropped > 0 {
        log::warn!(
            "Dropped {} of {} rows with missing fields",
            report.rows_dropped,
            report.rows_read
        );
    }

    let store = DatasetStore::new(records);
    if store.is_empty() {
        log::warn!("No cases survived loading; all views will be empty");
    }
    log::info!("Loaded {} cases", store.len());

    Ok((store, report))
}
