use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Tour service daemon
///
/// Serves tour authoring, publication and tour execution over HTTP. Callers
/// are identified by the `x-username` and `x-user-role` headers set by the
/// API gateway. Publishing creates a companion post on the blog service;
/// starting a tour is gated by the purchase service.
#[derive(Parser, Debug)]
#[command(version, about, name = "tourd")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/tourd/tours.db
    #[arg(long, env = "TOURD_DATABASE_FILE")]
    pub database_file: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "TOURD_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Base URL of the blog service
    #[arg(long, env = "BLOG_SERVICE_URL", default_value = "http://blog-service:3002")]
    pub blog_url: String,

    /// Base URL of the purchase service
    #[arg(
        long,
        env = "PURCHASE_SERVICE_URL",
        default_value = "http://purchase-service:8084"
    )]
    pub purchase_url: String,

    /// Upper bound in seconds on each blog or purchase service call
    #[arg(long, env = "TOURD_COLLABORATOR_TIMEOUT_SECS", default_value_t = 10)]
    pub collaborator_timeout_secs: u64,

    /// Let tourists start a tour when the purchase service is unreachable
    #[arg(long, env = "TOURD_ALLOW_START_WHEN_GATE_UNAVAILABLE")]
    pub allow_start_when_gate_unavailable: bool,
}
