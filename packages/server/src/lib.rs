#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the case map dashboard.
//!
//! Loads the case dataset once at startup, then answers every filter
//! change from the frontend with a freshly derived
//! [`cbsd_map_dashboard_models::DashboardView`]. The dataset is shared
//! read-only between workers, so requests never lock. The frontend's
//! static files are served from the same process.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use cbsd_map_dashboard::Dashboard;
use cbsd_map_dashboard::config::{ConfigError, DashboardConfig};
use cbsd_map_dataset::{DatasetError, DatasetStore};

/// Default dataset file, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "testdata.csv";

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The dataset could not be loaded.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// The dashboard configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP server failed to bind or crashed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Case dataset, loaded once and never modified.
    pub store: Arc<DatasetStore>,
    /// Presentation settings.
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: DatasetStore, config: DashboardConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Dashboard over this state's dataset and configuration.
    #[must_use]
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(&self.store, &self.config)
    }
}

/// Where the server reads its inputs and listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Case dataset (CSV).
    pub dataset_path: PathBuf,
    /// Optional dashboard config (TOML).
    pub config_path: Option<PathBuf>,
    pub bind_addr: String,
    pub port: u16,
    /// Directory with the built frontend.
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            config_path: None,
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

impl ServerSettings {
    /// Reads `DATASET_PATH`, `DASHBOARD_CONFIG`, `BIND_ADDR`, `PORT` and
    /// `STATIC_DIR`, falling back to the defaults for unset variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dataset_path: std::env::var("DATASET_PATH")
                .map_or(defaults.dataset_path, PathBuf::from),
            config_path: std::env::var(cbsd_map_dashboard::config::CONFIG_ENV_VAR)
                .ok()
                .map(PathBuf::from),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            static_dir: std::env::var("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        }
    }
}

/// Loads the dataset and dashboard configuration named by `settings`.
///
/// # Errors
///
/// * [`ServerError::Dataset`] if the dataset file cannot be loaded
/// * [`ServerError::Config`] if the config file cannot be loaded
pub fn load_state(settings: &ServerSettings) -> Result<AppState, ServerError> {
    let (store, report) = cbsd_map_dataset::load_csv(&settings.dataset_path)?;
    log::info!(
        "Dataset ready: {} cases ({} rows dropped)",
        store.len(),
        report.rows_dropped
    );

    let config = match &settings.config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    Ok(AppState::new(store, config))
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/filters", web::get().to(handlers::filter_options))
            .route("/dashboard", web::get().to(handlers::default_dashboard))
            .route("/dashboard", web::post().to(handlers::dashboard))
            .route("/cases/{id}", web::get().to(handlers::case_detail)),
    );
}

/// Starts the case map API server.
///
/// Loads the dataset and configuration, then starts the Actix-Web HTTP
/// server. The caller is responsible for providing the async runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// * [`ServerError::Dataset`] / [`ServerError::Config`] if loading fails
/// * [`ServerError::Io`] if the HTTP server fails to bind or encounters a
///   runtime error
#[allow(clippy::future_not_send)]
pub async fn run_server(settings: ServerSettings) -> Result<(), ServerError> {
    let state = web::Data::new(load_state(&settings)?);
    let static_dir = settings.static_dir.clone();

    log::info!("Starting server on {}:{}", settings.bind_addr, settings.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            // Serve frontend static files (production)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((settings.bind_addr, settings.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use cbsd_map_case_models::{CaseId, CaseRecord, Classification};
    use cbsd_map_dashboard::config::MapMode;
    use cbsd_map_dashboard_models::{CaseDetail, DashboardView, MapSpec, RenderedView, ViewId};
    use cbsd_map_server_models::{ApiCaseDetail, ApiFilterOptions, ApiHealth, FilterEvent};

    fn case(id: &str, year: i32, class: &str) -> CaseRecord {
        CaseRecord {
            id: CaseId::from(id),
            latitude: -4.0,
            longitude: 36.0,
            year,
            date: "12-03".to_owned(),
            classification: Classification::from(class),
            magnitude: None,
            user_id: "surveyor".to_owned(),
        }
    }

    fn state() -> web::Data<AppState> {
        let store = DatasetStore::new(vec![
            case("1", 2018, "Infected"),
            case("2", 2018, "Not Infected"),
            case("3", 2019, "Infected"),
        ]);
        web::Data::new(AppState::new(store, DashboardConfig::default()))
    }

    #[actix_web::test]
    async fn health_reports_case_count() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let health: ApiHealth = test::call_and_read_body_json(&app, req).await;
        assert!(health.healthy);
        assert_eq!(health.case_count, 3);
    }

    #[actix_web::test]
    async fn filter_options_list_classes_and_years() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/filters").to_request();
        let options: ApiFilterOptions = test::call_and_read_body_json(&app, req).await;
        assert_eq!(options.years, vec![2018, 2019]);
        assert_eq!(options.classifications.len(), 2);
        assert_eq!(options.views.len(), 2);
    }

    #[actix_web::test]
    async fn filter_event_derives_view() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let event = FilterEvent {
            year_range: Some([2018, 2019]),
            classification_mode: None,
            selected_id: Some("404".to_owned()),
            active_view: Some("cum_graph".to_owned()),
        };
        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(&event)
            .to_request();
        let view: DashboardView = test::call_and_read_body_json(&app, req).await;

        assert_eq!(view.total_count, 2);
        assert_eq!(view.toggle_label, "Showing infected cases");
        assert_eq!(view.detail, CaseDetail::not_found());
        let RenderedView::Chart(chart) = view.active else {
            panic!("expected the line chart");
        };
        assert_eq!(chart.view, ViewId::CumGraph);
    }

    #[actix_web::test]
    async fn extreme_year_range_is_clamped_to_dataset() {
        let store = DatasetStore::new(vec![
            case("1", 2018, "Infected"),
            case("2", 2018, "Not Infected"),
            case("3", 2019, "Infected"),
        ]);
        let mut config = DashboardConfig::default();
        config.map.mode = MapMode::Animated;
        let state = web::Data::new(AppState::new(store, config));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(serde_json::json!({ "yearRange": [i32::MIN, i32::MAX] }))
            .to_request();
        let view: DashboardView = test::call_and_read_body_json(&app, req).await;

        assert_eq!(view.total_count, 2);
        assert_eq!(view.charts.ind_graph.x_axis.range, [2018.0, 2019.0]);
        assert!(view.charts.ind_graph.series.iter().all(|s| s.x == vec![2018]));
        let MapSpec::Animated { animation, .. } = view.map else {
            panic!("expected an animated map");
        };
        assert_eq!(animation.frames.len(), 2);
    }

    #[actix_web::test]
    async fn default_view_has_no_tab() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let view: DashboardView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.total_count, 2);
        assert_eq!(view.active, RenderedView::Empty);
    }

    #[actix_web::test]
    async fn case_detail_lines() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/cases/1").to_request();
        let found: ApiCaseDetail = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.lines[0], "Case #: 1");
        assert_eq!(found.lines[2], "Date: 12-03-2018");

        let req = test::TestRequest::get().uri("/api/cases/1670").to_request();
        let missing: ApiCaseDetail = test::call_and_read_body_json(&app, req).await;
        assert_eq!(missing.lines, vec!["No case selected"]);
    }

    #[::core::prelude::v1::test]
    fn settings_default_to_local_dataset() {
        let settings = ServerSettings::default();
        assert_eq!(settings.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(settings.port, 8080);
        assert!(settings.config_path.is_none());
    }
}
