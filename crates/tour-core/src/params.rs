//! Parameter structures for tour service operations
//!
//! These are the shapes accepted at the edge of the service (HTTP bodies in
//! `tour-server`, direct calls in tests). They stay loosely typed where the
//! input is user supplied: difficulty, transport types and end statuses
//! arrive as strings and are checked by [`crate::validation::Validator`],
//! so a bad value surfaces as [`crate::TourError::InvalidInput`] rather than
//! as a deserialization failure.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  HTTP body      │    │  Core params    │    │  Validated      │
//! │ (serde derives) │───▶│ (this module)   │───▶│  domain values  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// A key point as submitted by a guide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyPointInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Position in the path; the array index is used when absent
    #[serde(default)]
    pub order: Option<i64>,
}

/// A transport entry as submitted by a guide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportInput {
    /// Estimated duration in minutes
    pub duration: u32,
    /// One of `walking`, `biking`, `driving`
    pub transport_type: String,
}

/// Parameters for creating a new tour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTour {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// One of `easy`, `medium`, `hard`
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Requested price; the effective price stays 0 while the tour is a draft
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub transport_details: Vec<TransportInput>,
    #[serde(default)]
    pub key_points: Vec<KeyPointInput>,
}

/// Parameters for replacing the editable content of a draft tour.
///
/// Every field is replaced, key points included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTour {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub transport_details: Vec<TransportInput>,
    #[serde(default)]
    pub key_points: Vec<KeyPointInput>,
}

/// Parameters for starting a tour execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartExecution {
    pub tour_id: u64,
    /// Tourist's position when starting
    pub latitude: f64,
    pub longitude: f64,
}

/// A position report from a tourist in the field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Parameters for ending a tour execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndExecution {
    /// `completed` or `abandoned`
    pub status: String,
}
