//! High-level service API for tours and tour executions.
//!
//! [`TourService`] coordinates the database and the outbound collaborators.
//! Every operation opens its own connection on the blocking pool and runs
//! its reads and writes in a single [`UnitOfWork`](crate::db::UnitOfWork),
//! so concurrent requests for the same tour or tourist are serialized by
//! SQLite's write lock rather than by in-process locking.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   lifecycle     │    │   UnitOfWork    │    │     SQLite      │
//! │   saga          │───▶│ (tour_queries,  │───▶│                 │
//! │   execution     │    │  execution_q.)  │    │                 │
//! └────────┬────────┘    └─────────────────┘    └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  BlogPublisher  │
//! │  PurchaseGate   │
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tour_core::{params::CreateTour, TourServiceBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TourServiceBuilder::new()
//!     .with_database_path(Some("/tmp/tours.db"))
//!     .with_blog_url("http://blog-service:3002")
//!     .with_purchase_url("http://purchase-service:8084")
//!     .build()
//!     .await?;
//!
//! let tour = service
//!     .create_tour(
//!         &CreateTour {
//!             name: "Old town".to_string(),
//!             difficulty: "easy".to_string(),
//!             ..Default::default()
//!         },
//!         "guide1",
//!     )
//!     .await?;
//! assert_eq!(tour.price, 0.0);
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::task;

use crate::{
    collaborators::{BlogPublisher, PurchaseGate, DEFAULT_TIMEOUT},
    db::{Database, UnitOfWork},
    error::{Result, TourError},
    retry::RetryPolicy,
    validation::Validator,
};

pub mod builder;
pub mod execution;
pub mod lifecycle;
pub mod saga;


pub use builder::TourServiceBuilder;

/// What to do when the purchase service cannot answer at execution start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateUnavailablePolicy {
    /// Refuse to start with `DependencyUnavailable`
    #[default]
    Block,
    /// Start anyway and log a warning
    Allow,
}

/// Tunables for collaborator calls.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upper bound on a single blog or purchase call
    pub collaborator_timeout: Duration,
    /// Backoff for reverting a tour after a failed companion post
    pub compensation_retry: RetryPolicy,
    pub gate_unavailable_policy: GateUnavailablePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            collaborator_timeout: DEFAULT_TIMEOUT,
            compensation_retry: RetryPolicy::default(),
            gate_unavailable_policy: GateUnavailablePolicy::default(),
        }
    }
}

/// Main service interface for tours and tour executions.
#[derive(Clone)]
pub struct TourService {
    pub(crate) db_path: PathBuf,
    pub(crate) blog: Arc<dyn BlogPublisher>,
    pub(crate) purchases: Arc<dyn PurchaseGate>,
    pub(crate) config: ServiceConfig,
    pub(crate) validator: Validator,
}

impl TourService {
    pub(crate) fn new(
        db_path: PathBuf,
        blog: Arc<dyn BlogPublisher>,
        purchases: Arc<dyn PurchaseGate>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db_path,
            blog,
            purchases,
            config,
            validator: Validator::new(),
        }
    }

    /// The configuration the service was built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Runs `work` in a write-locking unit of work on the blocking pool.
    pub(crate) async fn write<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&UnitOfWork<'_>) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::open(&db_path)?;
            db.unit_of_work(work)
        })
        .await
        .map_err(TourError::join)?
    }

    /// Runs read-only `work` in a snapshot on the blocking pool.
    pub(crate) async fn read<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&UnitOfWork<'_>) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::open(&db_path)?;
            db.snapshot(work)
        })
        .await
        .map_err(TourError::join)?
    }
}
