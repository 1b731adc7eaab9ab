#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case map dashboard server and command-line tools.
//!
//! Without a subcommand, prompts for the server settings interactively.

use std::path::PathBuf;

use cbsd_map_dashboard::Dashboard;
use cbsd_map_dashboard::config::DashboardConfig;
use cbsd_map_server::{ServerError, ServerSettings, interactive, run_server};
use cbsd_map_server_models::{ClassificationMode, FilterEvent};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cbsd_map_server", about = "Case map dashboard server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),
    /// Derive one dashboard view and print it as JSON.
    Derive(DeriveArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Case dataset (CSV). Defaults to `DATASET_PATH` or `testdata.csv`.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Dashboard config (TOML). Defaults to `DASHBOARD_CONFIG`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind. Defaults to `BIND_ADDR` or 127.0.0.1.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on. Defaults to `PORT` or 8080.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args)]
struct DeriveArgs {
    /// Case dataset (CSV). Defaults to `DATASET_PATH` or `testdata.csv`.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Dashboard config (TOML). Defaults to `DASHBOARD_CONFIG`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Year range, inclusive. Defaults to the dataset's full span.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    years: Option<Vec<i32>>,

    /// Classification to show. Repeat to show several.
    #[arg(long = "class")]
    classes: Vec<String>,

    /// Case id to show in the detail panel.
    #[arg(long)]
    selected: Option<String>,

    /// Chart tab (`cum_graph` or `ind_graph`).
    #[arg(long)]
    view: Option<String>,
}

impl ServeArgs {
    fn into_settings(self) -> ServerSettings {
        let mut settings = ServerSettings::from_env();
        if let Some(dataset) = self.dataset {
            settings.dataset_path = dataset;
        }
        if let Some(config) = self.config {
            settings.config_path = Some(config);
        }
        if let Some(bind) = self.bind {
            settings.bind_addr = bind;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        settings
    }
}

impl DeriveArgs {
    fn event(&self) -> FilterEvent {
        let classification_mode = match self.classes.as_slice() {
            [] => None,
            [single] => Some(ClassificationMode::Single(single.clone())),
            many => Some(ClassificationMode::Many(many.to_vec())),
        };

        FilterEvent {
            year_range: self
                .years
                .as_deref()
                .and_then(|years| <[i32; 2]>::try_from(years).ok()),
            classification_mode,
            selected_id: self.selected.clone(),
            active_view: self.view.clone(),
        }
    }
}

fn derive(args: DeriveArgs) -> Result<(), ServerError> {
    let event = args.event();
    let settings = ServeArgs {
        dataset: args.dataset,
        config: args.config,
        bind: None,
        port: None,
    }
    .into_settings();

    let (store, _) = cbsd_map_dataset::load_csv(&settings.dataset_path)?;
    let config = match &settings.config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    let dashboard = Dashboard::new(&store, &config);
    let view = dashboard.derive(&event.into_filter_state(dashboard.default_filter()));

    let json = serde_json::to_string_pretty(&view).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => run_server(args.into_settings()).await,
        Some(Commands::Derive(args)) => derive(args),
        None => interactive::run().await,
    }
}
