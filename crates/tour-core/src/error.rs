//! Error types for the tour service library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{ExecutionStatus, TourStatus};

/// Comprehensive error type for all tour and execution operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Tour not found for the given ID
    #[error("Tour with ID {id} not found")]
    TourNotFound { id: u64 },
    /// Tour execution not found for the given ID
    #[error("Tour execution with ID {id} not found")]
    ExecutionNotFound { id: u64 },
    /// The tourist has no execution in progress
    #[error("No active tour execution found for '{tourist}'")]
    NoActiveExecution { tourist: String },
    /// The caller does not own the resource
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },
    /// Edits are only accepted while a tour is a draft
    #[error("Tour {id} is not editable while {status}")]
    NotEditable { id: u64, status: TourStatus },
    /// Publication preconditions are not met
    #[error("Tour {id} cannot be published: {reason}")]
    NotPublishable { id: u64, reason: String },
    /// Only published tours can be archived
    #[error("Tour {id} cannot be archived while {status}")]
    NotArchivable { id: u64, status: TourStatus },
    /// Only archived tours can be unarchived
    #[error("Tour {id} cannot be unarchived while {status}")]
    NotUnarchivable { id: u64, status: TourStatus },
    /// Only published or archived tours can be executed
    #[error("Tour {id} is not available for execution while {status}")]
    NotExecutable { id: u64, status: TourStatus },
    /// The tourist already has an execution in progress
    #[error("Tourist '{tourist}' already has an active tour execution")]
    ActiveExecutionExists { tourist: String },
    /// The execution already reached a terminal status
    #[error("Tour execution {id} is not active (status: {status})")]
    ExecutionNotActive { id: u64, status: ExecutionStatus },
    /// The purchase service has no valid token for the tour
    #[error("Tour {tour_id} must be purchased before execution")]
    PaymentRequired { tour_id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The companion blog post failed and the tour was reverted to draft
    #[error("Failed to create blog post for published tour {tour_id} (SAGA rollback): {reason}")]
    SagaRollback { tour_id: u64, reason: String },
    /// The companion blog post failed and reverting the tour failed too
    #[error("Tour {tour_id} could not be reverted to draft after a failed publish: {reason}")]
    CompensationFailed { tour_id: u64, reason: String },
    /// A collaborator service could not be reached or answered with an error
    #[error("{service} service unavailable: {reason}")]
    DependencyUnavailable { service: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TourError {
        TourError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TourError {
        TourError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TourError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates an ownership error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Creates a collaborator outage error.
    pub fn dependency_unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DependencyUnavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(err: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {err}"),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TourError::database(message).with_source(e))
    }
}

/// Result type alias for tour service operations
pub type Result<T> = std::result::Result<T, TourError>;
