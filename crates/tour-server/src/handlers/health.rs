//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

/// Name reported by the liveness endpoint.
pub const SERVICE_NAME: &str = "tour-service";

#[derive(Debug, Serialize)]
pub struct Pong {
    message: &'static str,
    service: &'static str,
}

/// `GET /internal/ping`
pub async fn ping() -> Json<Pong> {
    Json(Pong {
        message: "pong",
        service: SERVICE_NAME,
    })
}
