//! HTTP client for the purchase service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{endpoint, http_client, CollaboratorError, PurchaseCheck, PurchaseGate, DEFAULT_TIMEOUT};

const SERVICE: &str = "purchase";

/// A purchase token as listed by the purchase service.
#[derive(Debug, Clone, Deserialize)]
struct PurchaseToken {
    tour_id: u64,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    #[serde(default)]
    tokens: Vec<PurchaseToken>,
}

/// [`PurchaseGate`] backed by the purchase service's REST API.
#[derive(Clone, Debug)]
pub struct HttpPurchaseGate {
    base_url: String,
    http_client: Client,
}

impl HttpPurchaseGate {
    /// Creates a client for the service at `base_url`, with the default
    /// request timeout.
    pub fn new(base_url: impl Into<String>) -> crate::error::Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// `Configuration` when the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> crate::error::Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            http_client: http_client(SERVICE, timeout)?,
        })
    }
}

#[async_trait]
impl PurchaseGate for HttpPurchaseGate {
    async fn check_purchased(&self, tourist: &str, tour_id: u64) -> PurchaseCheck {
        let url = endpoint(&self.base_url, &format!("validate/{tour_id}"));
        let response = match self
            .http_client
            .get(&url)
            .header("x-username", tourist)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Purchase validation for tour {tour_id} failed: {e}");
                return PurchaseCheck::GateUnavailable;
            }
        };

        match response.status() {
            status if status.is_success() => {
                log::debug!("Purchase of tour {tour_id} validated for '{tourist}'");
                PurchaseCheck::Allowed
            }
            StatusCode::NOT_FOUND => PurchaseCheck::NotPurchased,
            status => {
                log::warn!("Purchase service returned {status} validating tour {tour_id}");
                PurchaseCheck::GateUnavailable
            }
        }
    }

    async fn purchased_tour_ids(&self, tourist: &str) -> Result<Vec<u64>, CollaboratorError> {
        let url = endpoint(&self.base_url, "tokens");
        let response = self
            .http_client
            .get(&url)
            .header("x-username", tourist)
            .send()
            .await
            .map_err(|e| CollaboratorError::transport(SERVICE, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }

        let body: TokensResponse =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::InvalidResponse {
                    service: SERVICE.to_string(),
                    reason: e.to_string(),
                })?;

        let ids = body
            .tokens
            .into_iter()
            .filter(|token| token.status == "active")
            .map(|token| token.tour_id)
            .collect::<Vec<_>>();
        log::debug!("Found {} purchased tours for '{tourist}'", ids.len());
        Ok(ids)
    }
}
