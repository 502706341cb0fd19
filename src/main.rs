mod api;
mod app;
mod browse;
mod config;
mod error;
mod image_cache;
mod player;
mod ui;

use std::sync::Arc;

use ratatui_image::picker::Picker;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::api::SamehadakuClient;
use crate::app::App;
use crate::config::Config;
use crate::error::Result;

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "nonton.log");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nonton=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

/// Ask the terminal which graphics protocol it speaks, falling back to half blocks.
fn detect_picker() -> Picker {
    match Picker::from_query_stdio() {
        Ok(picker) => picker,
        Err(e) => {
            warn!(error = %e, "Terminal graphics query failed, using half blocks");
            Picker::halfblocks()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file; the TUI owns the terminal
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    info!("Starting nonton");

    let config = Config::load()?;
    info!(base_url = %config.api.base_url, "Loaded config");

    let client = SamehadakuClient::new(&config.api)?;

    let mut terminal = app::init_terminal()?;
    let picker = detect_picker();

    let mut app = App::new(&config, Arc::new(client), picker);
    let result = app.run(&mut terminal).await;

    app::restore_terminal()?;

    result
}
