//! Filter types for querying tours.

use super::TourStatus;

/// Filter criteria for listing tours. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourFilter {
    /// Keep tours in any of these statuses
    pub statuses: Vec<TourStatus>,

    /// Keep tours written by this guide
    pub author: Option<String>,

    /// Keep only these tour IDs
    pub ids: Option<Vec<u64>>,
}

impl TourFilter {
    /// Tours visible in the public catalogue.
    pub fn published() -> Self {
        Self {
            statuses: vec![TourStatus::Published],
            ..Default::default()
        }
    }

    /// All tours by one guide, in every status.
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Default::default()
        }
    }

    /// Executable tours among the given IDs.
    pub fn executable_among(ids: Vec<u64>) -> Self {
        Self {
            statuses: vec![TourStatus::Published, TourStatus::Archived],
            ids: Some(ids),
            ..Default::default()
        }
    }
}
