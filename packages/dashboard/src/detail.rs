//! Resolution of a clicked case id to its details.

use cbsd_map_case_models::{CaseId, CaseRecord};
use cbsd_map_dashboard_models::CaseDetail;
use cbsd_map_dataset::DatasetStore;

/// Result of looking up a case id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaseLookup<'a> {
    Found(&'a CaseRecord),
    /// The id is unknown, or nothing was clicked yet.
    NotFound,
}

impl CaseLookup<'_> {
    /// Detail panel contents for this result.
    #[must_use]
    pub fn detail(self) -> CaseDetail {
        match self {
            Self::Found(record) => CaseDetail::Found {
                number: record.id.clone(),
                user_id: record.user_id.clone(),
                date: record.display_date(),
                classification: record.classification.clone(),
            },
            Self::NotFound => CaseDetail::not_found(),
        }
    }
}

/// Finds a case by id through the store's index.
#[must_use]
pub fn lookup<'a>(store: &'a DatasetStore, id: &CaseId) -> CaseLookup<'a> {
    store.get(id).map_or_else(
        || {
            log::debug!("No case with id {id}");
            CaseLookup::NotFound
        },
        CaseLookup::Found,
    )
}

/// Like [`lookup`], treating "nothing selected" as not found.
#[must_use]
pub fn lookup_selected<'a>(store: &'a DatasetStore, id: Option<&CaseId>) -> CaseLookup<'a> {
    id.map_or(CaseLookup::NotFound, |id| lookup(store, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scenario_store;
    use cbsd_map_dashboard_models::NO_CASE_SELECTED;

    #[test]
    fn every_record_round_trips() {
        let store = scenario_store();
        for record in store.records() {
            assert_eq!(lookup(&store, &record.id), CaseLookup::Found(record));
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = scenario_store();
        let result = lookup(&store, &CaseId::from("9999"));
        assert_eq!(result, CaseLookup::NotFound);
        assert_eq!(result.detail().lines(), vec![NO_CASE_SELECTED]);
    }

    #[test]
    fn no_selection_is_not_found() {
        let store = scenario_store();
        assert_eq!(lookup_selected(&store, None), CaseLookup::NotFound);
    }

    #[test]
    fn found_detail_formats_panel() {
        let store = scenario_store();
        let detail = lookup(&store, &CaseId::from("2")).detail();
        assert_eq!(
            detail.lines(),
            vec![
                "Case #: 2",
                "User ID: surveyor",
                "Date: 01-01-2018",
                "Status: Not Infected"
            ]
        );
    }
}
