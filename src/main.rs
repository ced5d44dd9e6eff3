//! Worker binary: polls the document queue and processes each document
//! through the pipeline until terminated.

use std::fs;
use std::sync::mpsc;

use tracing_subscriber::EnvFilter;

use lexpipe::config::{self, Settings};
use lexpipe::db::sqlite::open_database;
use lexpipe::queue::start_worker;
use lexpipe::{build_processor, config::APP_VERSION};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("lexpipe worker starting v{}", APP_VERSION);

    let settings = Settings::from_env();

    if let Err(e) = fs::create_dir_all(&settings.upload_dir) {
        tracing::warn!(error = %e, dir = %settings.upload_dir.display(), "Could not create upload directory");
    }
    if let Some(parent) = settings.database_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::error!(error = %e, dir = %parent.display(), "Could not create data directory");
            std::process::exit(1);
        }
    }

    // Open once up front so migration failures surface at startup, not
    // inside the worker thread.
    match open_database(&settings.database_path) {
        Ok(_) => tracing::info!(path = %settings.database_path.display(), "Database ready"),
        Err(e) => {
            tracing::error!(error = %e, "Database initialization failed");
            std::process::exit(1);
        }
    }

    let processor = build_processor(&settings);
    let worker = start_worker(settings, processor);

    // Block until SIGINT/SIGTERM, then drop the worker handle: the flag
    // is set, the join waits, and the in-flight document finishes before
    // the process exits.
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    }) {
        tracing::error!(error = %e, "Could not install shutdown handler");
        std::process::exit(1);
    }
    let _ = stop_rx.recv();
    tracing::info!("Shutdown signal received; finishing in-flight work");
    drop(worker);
}
