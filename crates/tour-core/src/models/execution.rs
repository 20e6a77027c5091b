//! Tour execution model definitions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ExecutionStatus, KeyPoint};

/// One tourist's live attempt at traversing a tour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourExecution {
    pub id: u64,

    pub tour_id: u64,

    /// Username of the tourist running the tour
    pub tourist: String,

    pub status: ExecutionStatus,

    pub start_latitude: f64,

    pub start_longitude: f64,

    pub start_time: Timestamp,

    /// Set once the execution reaches a terminal status
    pub end_time: Option<Timestamp>,

    /// Bumped on every proximity check
    pub last_activity: Timestamp,

    /// Key points reached so far
    #[serde(default)]
    pub completions: Vec<KeyPointCompletion>,
}

impl TourExecution {
    /// Whether the key point was already reached during this execution.
    pub fn has_completed(&self, key_point_id: u64) -> bool {
        self.completions
            .iter()
            .any(|completion| completion.key_point_id == key_point_id)
    }
}

/// Evidence that an execution reached a key point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyPointCompletion {
    pub id: u64,

    pub execution_id: u64,

    pub key_point_id: u64,

    /// Reported position at the time of detection
    pub latitude: f64,

    pub longitude: f64,

    pub completed_at: Timestamp,
}

/// Outcome of a proximity check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProximityResult {
    pub key_point_reached: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_point: Option<KeyPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<KeyPointCompletion>,

    pub last_activity: Timestamp,

    /// Human-readable summary for the tourist
    pub message: String,
}

impl ProximityResult {
    pub(crate) fn reached(
        key_point: KeyPoint,
        completion: KeyPointCompletion,
        last_activity: Timestamp,
    ) -> Self {
        Self {
            key_point_reached: true,
            message: format!("Key point '{}' reached!", key_point.name),
            key_point: Some(key_point),
            completion: Some(completion),
            last_activity,
        }
    }

    pub(crate) fn nothing_nearby(last_activity: Timestamp) -> Self {
        Self {
            key_point_reached: false,
            key_point: None,
            completion: None,
            last_activity,
            message: "No key points nearby".to_string(),
        }
    }
}
