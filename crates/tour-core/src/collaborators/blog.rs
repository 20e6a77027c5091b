//! HTTP client for the blog service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{endpoint, http_client, BlogPublisher, CollaboratorError, CompanionPost, DEFAULT_TIMEOUT};

const SERVICE: &str = "blog";

/// [`BlogPublisher`] backed by the blog service's REST API.
///
/// Posts are created as the publishing guide, so the request carries the
/// same identity headers the gateway would add.
#[derive(Clone, Debug)]
pub struct HttpBlogPublisher {
    base_url: String,
    http_client: Client,
}

impl HttpBlogPublisher {
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
impl BlogPublisher for HttpBlogPublisher {
    async fn create_companion_post(&self, post: &CompanionPost) -> Result<(), CollaboratorError> {
        let url = endpoint(&self.base_url, "/");
        let response = self
            .http_client
            .post(&url)
            .header("x-username", &post.author)
            .header("x-user-role", "guide")
            .json(post)
            .send()
            .await
            .map_err(|e| CollaboratorError::transport(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }

        log::info!("Companion blog post created for tour {}", post.tour_id);
        Ok(())
    }
}
