//! Outbound collaborators of the tour service.
//!
//! The service talks to two other services: the blog service, which
//! receives a companion post whenever a tour is published, and the purchase
//! service, which decides whether a tourist may execute a tour. Both are
//! behind traits so the service can be wired with the HTTP clients in
//! production and with in-memory doubles in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::error::{Result as TourResult, TourError};

pub mod blog;
pub mod purchase;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use blog::HttpBlogPublisher;
pub use purchase::HttpPurchaseGate;

/// Default bound on a single collaborator call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure talking to a collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// The request could not be sent or no response arrived in time
    #[error("request to {service} service failed: {reason}")]
    Transport { service: String, reason: String },
    /// The collaborator answered with an unexpected status
    #[error("{service} service responded with status {status}")]
    Status { service: String, status: u16 },
    /// The collaborator answered with a body that could not be decoded
    #[error("{service} service sent an invalid response: {reason}")]
    InvalidResponse { service: String, reason: String },
}

impl CollaboratorError {
    pub(crate) fn transport(service: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            service: service.to_string(),
            reason: err.to_string(),
        }
    }
}

/// The blog post created alongside a newly published tour.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompanionPost {
    pub title: String,
    pub description: String,
    /// Username of the guide publishing the tour
    pub author: String,
    pub tour_id: u64,
    /// Tour tags, comma separated
    pub tags: String,
}

/// Creates companion blog posts for published tours.
#[async_trait]
pub trait BlogPublisher: Send + Sync {
    async fn create_companion_post(&self, post: &CompanionPost) -> Result<(), CollaboratorError>;
}

/// Outcome of asking the purchase service about one tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseCheck {
    /// The tourist holds a valid token for the tour
    Allowed,
    /// The purchase service answered that no token exists
    NotPurchased,
    /// The purchase service could not give an answer
    GateUnavailable,
}

/// Answers whether a tourist purchased a tour.
#[async_trait]
pub trait PurchaseGate: Send + Sync {
    /// Checks a single tour. Never fails; outages surface as
    /// [`PurchaseCheck::GateUnavailable`].
    async fn check_purchased(&self, tourist: &str, tour_id: u64) -> PurchaseCheck;

    /// IDs of every tour the tourist holds an active token for.
    async fn purchased_tour_ids(&self, tourist: &str) -> Result<Vec<u64>, CollaboratorError>;
}

/// Joins a base URL and a path without doubling the slash.
/// Builds the HTTP client shared by a collaborator's calls.
pub(crate) fn http_client(service: &str, timeout: Duration) -> TourResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TourError::Configuration {
            message: format!("Failed to build {service} service client: {e}"),
        })
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
