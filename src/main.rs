// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chirpy_server::{
    api::router,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::Store,
};

/// Chirpy HTTP server.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Wipe the database file before starting
    #[arg(long)]
    debug: bool,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenv::dotenv();
    let config = AppConfig::from_env().expect("Invalid configuration");
    init_tracing(config.log_format);

    let store = Store::open(&config.db_path).expect("Failed to initialize database file");
    if cli.debug {
        store.reset().expect("Failed to reset database file");
    }
    if let (Ok(db), Ok(assets)) = (config.db_path.canonicalize(), config.assets_dir.canonicalize()) {
        if db.starts_with(&assets) {
            tracing::info!(
                db = %db.display(),
                "Database file is inside ASSETS_DIR; /app will refuse to serve it"
            );
        }
    }

    let addr = config.bind_addr().expect("Failed to parse bind address");
    let state = AppState::new(config, Arc::new(store));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Chirpy server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
