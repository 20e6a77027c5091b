//! Builder for creating and configuring TourService instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tokio::task;

use super::{GateUnavailablePolicy, ServiceConfig, TourService};
use crate::{
    collaborators::{BlogPublisher, HttpBlogPublisher, HttpPurchaseGate, PurchaseGate},
    db::Database,
    error::{Result, TourError},
    retry::RetryPolicy,
};

/// Default base URL of the blog service.
pub const DEFAULT_BLOG_URL: &str = "http://blog-service:3002";

/// Default base URL of the purchase service.
pub const DEFAULT_PURCHASE_URL: &str = "http://purchase-service:8084";

/// Builder for creating and configuring TourService instances.
#[derive(Clone, Default)]
pub struct TourServiceBuilder {
    database_path: Option<PathBuf>,
    blog_url: Option<String>,
    purchase_url: Option<String>,
    blog: Option<Arc<dyn BlogPublisher>>,
    purchases: Option<Arc<dyn PurchaseGate>>,
    config: ServiceConfig,
}

impl TourServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tourd/tours.db` or `~/.local/share/tourd/tours.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Base URL for the HTTP blog client. Ignored when a publisher is set
    /// with [`Self::with_blog_publisher`].
    pub fn with_blog_url(mut self, url: impl Into<String>) -> Self {
        self.blog_url = Some(url.into());
        self
    }

    /// Base URL for the HTTP purchase client. Ignored when a gate is set
    /// with [`Self::with_purchase_gate`].
    pub fn with_purchase_url(mut self, url: impl Into<String>) -> Self {
        self.purchase_url = Some(url.into());
        self
    }

    pub fn with_blog_publisher(mut self, blog: Arc<dyn BlogPublisher>) -> Self {
        self.blog = Some(blog);
        self
    }

    pub fn with_purchase_gate(mut self, purchases: Arc<dyn PurchaseGate>) -> Self {
        self.purchases = Some(purchases);
        self
    }

    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.config.collaborator_timeout = timeout;
        self
    }

    pub fn with_compensation_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.compensation_retry = policy;
        self
    }

    pub fn with_gate_unavailable_policy(mut self, policy: GateUnavailablePolicy) -> Self {
        self.config.gate_unavailable_policy = policy;
        self
    }

    /// Replaces the whole service configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the configured service, creating the database and its schema
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `TourError::FileSystem` if the database directory cannot be created
    /// Returns `TourError::Database` if database initialization fails
    /// Returns `TourError::Configuration` if a collaborator HTTP client cannot be built
    pub async fn build(self) -> Result<TourService> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| TourError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), TourError>(())
        })
        .await
        .map_err(TourError::join)??;

        let timeout = self.config.collaborator_timeout;
        let blog: Arc<dyn BlogPublisher> = match self.blog {
            Some(blog) => blog,
            None => {
                let url = self.blog_url.unwrap_or_else(|| DEFAULT_BLOG_URL.to_string());
                Arc::new(HttpBlogPublisher::with_timeout(url, timeout)?)
            }
        };
        let purchases: Arc<dyn PurchaseGate> = match self.purchases {
            Some(gate) => gate,
            None => {
                let url = self
                    .purchase_url
                    .unwrap_or_else(|| DEFAULT_PURCHASE_URL.to_string());
                Arc::new(HttpPurchaseGate::with_timeout(url, timeout)?)
            }
        };

        log::debug!("Tour service using database {}", db_path.display());
        Ok(TourService::new(db_path, blog, purchases, self.config))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tourd")
            .place_data_file("tours.db")
            .map_err(|e| TourError::XdgDirectory(e.to_string()))
    }
}
