//! Interactive mode for the server.
//!
//! Prompts the user for the dataset, bind address, and port before
//! starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::{ServerError, ServerSettings};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Prompts start from [`ServerSettings::from_env`], so environment
/// variables become the suggested answers. The confirmed settings are
/// passed to [`super::run_server`].
///
/// # Errors
///
/// Returns a [`ServerError`] if the dataset cannot be loaded or the
/// server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("Case Map Server");
    println!();

    let mut settings = ServerSettings::from_env();

    let dataset: String = Input::new()
        .with_prompt("Dataset file")
        .default(settings.dataset_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| settings.dataset_path.display().to_string());
    settings.dataset_path = PathBuf::from(dataset);

    settings.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(settings.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| settings.bind_addr.clone());

    settings.port = Input::new()
        .with_prompt("Port")
        .default(settings.port)
        .interact_text()
        .unwrap_or(settings.port);

    if !Confirm::new()
        .with_prompt(format!(
            "Serve {} on {}:{}?",
            settings.dataset_path.display(),
            settings.bind_addr,
            settings.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(settings).await
}
