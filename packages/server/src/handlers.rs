//! HTTP handler functions for the case map API.

use actix_web::{HttpResponse, web};
use cbsd_map_case_models::{CaseId, CaseStatus};
use cbsd_map_dashboard::{Dashboard, detail};
use cbsd_map_dashboard_models::{FilterState, ViewId};
use cbsd_map_server_models::{ApiCaseDetail, ApiFilterOptions, ApiHealth, ApiView, FilterEvent};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        case_count: state.store.len() as u64,
    })
}

/// `GET /api/filters`
///
/// Returns the values the filter widgets are populated with.
pub async fn filter_options(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = state.dashboard();

    HttpResponse::Ok().json(ApiFilterOptions {
        classifications: state.store.classifications().to_vec(),
        toggle_classes: CaseStatus::all().to_vec(),
        years: state.store.years().iter().copied().collect(),
        views: ViewId::all()
            .iter()
            .map(|view| ApiView {
                id: *view,
                label: view.label().to_string(),
            })
            .collect(),
        default_filter: dashboard.default_filter(),
    })
}

/// `GET /api/dashboard`
///
/// Returns the view for the initial filter state.
pub async fn default_dashboard(state: web::Data<AppState>) -> HttpResponse {
    let filter = state.dashboard().default_filter();
    derive_response(&state, filter).await
}

/// `POST /api/dashboard`
///
/// Derives every dashboard view for the posted widget state. Fields the
/// event leaves out fall back to the initial filter state.
pub async fn dashboard(
    state: web::Data<AppState>,
    event: web::Json<FilterEvent>,
) -> HttpResponse {
    let filter = event
        .into_inner()
        .into_filter_state(state.dashboard().default_filter());
    derive_response(&state, filter).await
}

/// `GET /api/cases/{id}`
///
/// Returns the detail panel for one case. Unknown ids answer with the
/// "No case selected" panel rather than a 404.
pub async fn case_detail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = CaseId::new(path.into_inner());
    let detail = detail::lookup(&state.store, &id).detail();
    HttpResponse::Ok().json(ApiCaseDetail::from(detail))
}

/// Runs derivation on the blocking pool so large datasets do not stall
/// the worker's event loop.
async fn derive_response(state: &web::Data<AppState>, filter: FilterState) -> HttpResponse {
    let store = state.store.clone();
    let config = state.config.clone();

    let result = web::block(move || Dashboard::new(&store, &config).derive(&filter)).await;

    match result {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => {
            log::error!("Dashboard derivation failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Dashboard derivation failed"
            }))
        }
    }
}
