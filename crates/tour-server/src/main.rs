//! Tour service daemon
//!
//! Reads its configuration from flags and environment, opens the tour
//! database and serves the HTTP API until interrupted.

mod args;

use std::time::Duration;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use log::info;
use tokio::net::TcpListener;
use tour_core::{GateUnavailablePolicy, TourServiceBuilder};
use tour_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        bind,
        blog_url,
        purchase_url,
        collaborator_timeout_secs,
        allow_start_when_gate_unavailable,
    } = Args::parse();

    let gate_policy = if allow_start_when_gate_unavailable {
        GateUnavailablePolicy::Allow
    } else {
        GateUnavailablePolicy::Block
    };

    let service = TourServiceBuilder::new()
        .with_database_path(database_file)
        .with_blog_url(blog_url)
        .with_purchase_url(purchase_url)
        .with_collaborator_timeout(Duration::from_secs(collaborator_timeout_secs))
        .with_gate_unavailable_policy(gate_policy)
        .build()
        .await
        .context("Failed to initialize tour service")?;

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    info!("Tour service listening on {bind}");
    tour_server::serve(listener, AppState::new(service))
        .await
        .context("HTTP server failed")
}
