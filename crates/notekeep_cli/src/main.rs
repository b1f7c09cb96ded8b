//! Notes HTTP server entry point.
//!
//! # Responsibility
//! - Parse host/port/cache configuration from argv and environment.
//! - Open the note store once and share it with every request handler.
//! - Serve the notes API until the process is stopped.

mod config;
mod docs;
mod error;
mod routes;

use clap::Parser;
use config::Config;
use log::{error, info};
use notekeep_core::{JsonFileNoteRepository, NoteStore};
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(err) = notekeep_core::init_logging(config.log_level(), config.log_dir.as_deref()) {
        eprintln!("failed to initialize logging: {err}");
        std::process::exit(1);
    }

    info!(
        "event=server_config module=cli host={} port={} cache={} version={}",
        config.host,
        config.port,
        config.cache.display(),
        notekeep_core::core_version()
    );

    let store = match NoteStore::open(JsonFileNoteRepository::new(&config.cache)) {
        Ok(store) => store,
        Err(err) => {
            error!(
                "event=server_start module=cli status=error error_code={} error={}",
                err.code(),
                err
            );
            eprintln!("failed to open note store `{}`: {err}", config.cache.display());
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        store,
        api_doc: docs::openapi_document(&config.server_url()),
    });
    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(
                "event=server_start module=cli status=error error_code=bind_failed addr={} error={}",
                addr, err
            );
            eprintln!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!("event=server_start module=cli status=ok url={}", config.server_url());

    if let Err(err) = axum::serve(listener, app).await {
        error!("event=server_stop module=cli status=error error={}", err);
        std::process::exit(1);
    }
}
