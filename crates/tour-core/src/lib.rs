//! Core library for the tour service.
//!
//! This crate holds the business logic behind tour authoring and tour
//! execution: the draft/published/archived lifecycle, the publish saga with
//! its blog companion post, the purchase gate in front of tour execution,
//! and proximity-based key point detection while a tourist walks a tour.
//!
//! # Layout
//!
//! - **Models** ([`models`]): tours, key points, executions, completions
//! - **Persistence** ([`db`]): SQLite store accessed through units of work
//! - **Service** ([`service`]): the operations, coordinating store and
//!   collaborators
//! - **Collaborators** ([`collaborators`]): blog and purchase service clients
//! - **Geo** ([`geo`]): haversine distances and the proximity threshold
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tour_core::{params::{CreateTour, Id}, TourServiceBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TourServiceBuilder::new()
//!     .with_database_path(Some("tours.db"))
//!     .build()
//!     .await?;
//!
//! let tour = service
//!     .create_tour(
//!         &CreateTour {
//!             name: "Danube promenade".to_string(),
//!             difficulty: "easy".to_string(),
//!             ..Default::default()
//!         },
//!         "guide1",
//!     )
//!     .await?;
//!
//! // Fails with NotPublishable until the tour has key points, tags and transport
//! let outcome = service.publish_tour(&Id { id: tour.id }, "guide1").await;
//! assert!(outcome.is_err());
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod db;
pub mod error;
pub mod geo;
pub mod models;
pub mod params;
pub mod retry;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use collaborators::{
    BlogPublisher, CollaboratorError, CompanionPost, HttpBlogPublisher, HttpPurchaseGate,
    PurchaseCheck, PurchaseGate,
};
pub use db::Database;
pub use error::{Result, TourError};
pub use models::{
    Difficulty, ExecutionStatus, KeyPoint, KeyPointCompletion, ProximityResult, Tour, TourFilter,
    TourExecution, TourStatus, TransportDetail, TransportMode,
};
pub use params::{
    CreateTour, EndExecution, Id, KeyPointInput, Position, StartExecution, TransportInput,
    UpdateTour,
};
pub use retry::RetryPolicy;
pub use service::{GateUnavailablePolicy, ServiceConfig, TourService, TourServiceBuilder};
