//! Request handlers, one module per resource.

use serde::Serialize;
use tour_core::Tour;

pub mod executions;
pub mod health;
pub mod tours;

/// Body of every tour listing.
#[derive(Debug, Serialize)]
pub struct TourList {
    pub tours: Vec<Tour>,
    pub count: usize,
}

impl From<Vec<Tour>> for TourList {
    fn from(tours: Vec<Tour>) -> Self {
        Self {
            count: tours.len(),
            tours,
        }
    }
}
