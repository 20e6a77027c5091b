//! HTTP surface of the tour service.
//!
//! Builds the axum [`Router`] over a [`TourService`]. Identity comes from
//! the API gateway's `x-username` / `x-user-role` headers (see
//! [`identity`]); core errors become JSON error responses through
//! [`error::ApiError`].

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tour_core::TourService;

pub mod error;
pub mod extract;
pub mod handlers;
pub mod identity;

use handlers::{executions, health, tours};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: TourService,
}

impl AppState {
    pub fn new(service: TourService) -> Self {
        Self { service }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/internal/ping", get(health::ping))
        .route("/tours", post(tours::create_tour).get(tours::list_published))
        .route("/tours/mine", get(tours::list_mine))
        .route("/tours/purchased", get(tours::list_purchased))
        .route("/tours/executions", post(executions::start_execution))
        .route("/tours/executions/active", get(executions::active_execution))
        .route(
            "/tours/executions/:id/check-proximity",
            post(executions::check_proximity),
        )
        .route("/tours/executions/:id/end", put(executions::end_execution))
        .route("/tours/:id", get(tours::get_tour).put(tours::update_tour))
        .route("/tours/:id/key-points", post(tours::add_key_point))
        .route("/tours/:id/publish", put(tours::publish_tour))
        .route("/tours/:id/archive", put(tours::archive_tour))
        .route("/tours/:id/unarchive", put(tours::unarchive_tour))
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
