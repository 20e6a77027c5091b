//! Status and classification enumerations for tours and executions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Publication status of a tour.
///
/// ```text
/// draft --publish--> published --archive--> archived --unarchive--> published
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    /// Tour is being authored; the only editable state
    #[default]
    Draft,

    /// Tour is visible and executable
    Published,

    /// Tour is hidden from listings but still executable by buyers
    Archived,
}

impl FromStr for TourStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(TourStatus::Draft),
            "published" => Ok(TourStatus::Published),
            "archived" => Ok(TourStatus::Archived),
            _ => Err(format!("Invalid tour status: {s}")),
        }
    }
}

impl TourStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Draft => "draft",
            TourStatus::Published => "published",
            TourStatus::Archived => "archived",
        }
    }

    /// Whether tourists may start an execution of a tour in this status.
    pub fn is_executable(&self) -> bool {
        matches!(self, TourStatus::Published | TourStatus::Archived)
    }

    /// Target of the archive transition, if legal from this status.
    pub fn archived(self) -> Option<Self> {
        (self == TourStatus::Published).then_some(TourStatus::Archived)
    }

    /// Target of the unarchive transition, if legal from this status.
    pub fn unarchived(self) -> Option<Self> {
        (self == TourStatus::Archived).then_some(TourStatus::Published)
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty rating chosen by the tour author.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {s}")),
        }
    }
}

impl Difficulty {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Means of travel between key points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    Biking,
    Driving,
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walking" => Ok(TransportMode::Walking),
            "biking" => Ok(TransportMode::Biking),
            "driving" => Ok(TransportMode::Driving),
            _ => Err(format!("Invalid transport type: {s}")),
        }
    }
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::Biking => "biking",
            TransportMode::Driving => "driving",
        }
    }
}

/// Status of a tourist's traversal of a tour.
///
/// `Active` is the only non-terminal status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ExecutionStatus::Active),
            "completed" => Ok(ExecutionStatus::Completed),
            "abandoned" => Ok(ExecutionStatus::Abandoned),
            _ => Err(format!("Invalid execution status: {s}")),
        }
    }
}

impl ExecutionStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Active => "active",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Abandoned => "abandoned",
        }
    }

    /// Whether no further transitions are permitted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Active)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
