//! Data models for tours, key points and tour executions.
//!
//! A [`Tour`] exclusively owns its ordered [`KeyPoint`]s; a
//! [`TourExecution`] references a tour and accumulates
//! [`KeyPointCompletion`]s as the tourist reaches key points.
//!
//! # Examples
//!
//! ```rust
//! use tour_core::models::TourStatus;
//!
//! let status: TourStatus = "published".parse().unwrap();
//! assert_eq!(status.archived(), Some(TourStatus::Archived));
//! assert_eq!(TourStatus::Draft.archived(), None);
//! ```

pub mod execution;
pub mod filters;
pub mod status;
pub mod tour;

#[cfg(test)]
mod tests;

pub use execution::{KeyPointCompletion, ProximityResult, TourExecution};
pub use filters::TourFilter;
pub use status::{Difficulty, ExecutionStatus, TourStatus, TransportMode};
pub use tour::{KeyPoint, Tour, TransportDetail, MIN_PUBLISHABLE_KEY_POINTS};
