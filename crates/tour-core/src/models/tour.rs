//! Tour and key point model definitions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Difficulty, TourStatus, TransportMode};

/// Minimum number of key points a tour needs before it can be published.
pub const MIN_PUBLISHABLE_KEY_POINTS: usize = 2;

/// An authored, ordered itinerary of key points with a publication lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tour {
    /// Unique identifier for the tour
    pub id: u64,

    pub name: String,

    pub description: String,

    pub difficulty: Difficulty,

    /// Free-form tags, stored comma separated
    #[serde(default)]
    pub tags: Vec<String>,

    pub status: TourStatus,

    /// Effective price; always 0 while the tour is a draft
    pub price: f64,

    /// Price requested by the author, applied once the tour leaves draft
    pub list_price: f64,

    #[serde(default)]
    pub transport_details: Vec<TransportDetail>,

    /// Total path length over the ordered key points, in kilometers
    pub distance_km: f64,

    /// Username of the guide who authored the tour
    pub author: String,

    /// Key points sorted by `order`, ties in insertion order
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,

    /// Timestamp when the tour was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the tour was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Tour {
    /// Whether `username` authored this tour.
    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author == username
    }

    /// Returns the first unmet publication precondition, if any.
    pub fn publish_blocker(&self) -> Option<String> {
        if self.status != TourStatus::Draft {
            return Some(format!("tour is {}, only drafts can be published", self.status));
        }
        if self.name.trim().is_empty() {
            return Some("name is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Some("description is required".to_string());
        }
        if self.tags.iter().all(|tag| tag.trim().is_empty()) {
            return Some("at least one tag is required".to_string());
        }
        if self.key_points.len() < MIN_PUBLISHABLE_KEY_POINTS {
            return Some(format!(
                "at least {MIN_PUBLISHABLE_KEY_POINTS} key points are required, found {}",
                self.key_points.len()
            ));
        }
        if self.transport_details.is_empty() {
            return Some("at least one transport detail is required".to_string());
        }
        None
    }

    /// Tags joined the way they are stored and sent to the blog service.
    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}

/// Travel time for one means of transport along the whole tour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransportDetail {
    /// Estimated duration in minutes
    pub duration_minutes: u32,

    pub mode: TransportMode,
}

/// A single geolocated waypoint within a tour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyPoint {
    pub id: u64,

    /// ID of the owning tour
    pub tour_id: u64,

    pub name: String,

    pub description: String,

    pub latitude: f64,

    pub longitude: f64,

    pub image_url: Option<String>,

    /// Position in the tour path
    pub order: i64,
}
