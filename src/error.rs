//! Error types and handling
//!
//! Each layer has its own error enum: [`ValidationError`] for rejected input,
//! [`StoreError`] for store and checkpoint commands and [`FeedError`] for the
//! simulation feed. [`ErrorHandler`] decides whether the feed keeps going
//! after a failed operation.

use crate::checkpoint::Transition;
use crate::types::{ConfigError, ConfigValidationError, Location, RecordId, VehicleType};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Kind of entity named in a not-found error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A registered driver
    Driver,
    /// A registered vehicle
    Vehicle,
    /// An access record
    AccessRecord,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Driver => write!(f, "driver"),
            EntityKind::Vehicle => write!(f, "vehicle"),
            EntityKind::AccessRecord => write!(f, "access record"),
        }
    }
}

/// Input rejected before it reaches the store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace
    #[error("Field '{field}' must not be blank")]
    BlankField {
        /// Name of the blank field
        field: &'static str,
    },

    /// Document does not have a CPF or CNPJ digit count
    #[error("Document must have 11 (CPF) or 14 (CNPJ) digits, got {digits}")]
    InvalidDocument {
        /// Number of digits found
        digits: usize,
    },

    /// Average speed is negative or not a number
    #[error("Invalid average speed: {0} km/h")]
    InvalidSpeed(f64),

    /// Record cannot be created in the requested location
    #[error("A {vehicle_type} record cannot start at '{location}'")]
    IllegalInitialLocation {
        /// Requested initial location
        location: Location,
        /// Vehicle type of the record
        vehicle_type: VehicleType,
    },

    /// A stage timestamp was supplied for a stage the location has not reached
    #[error("Stage '{stage}' cannot be set on a record at '{location}'")]
    UnexpectedStage {
        /// Name of the stage
        stage: &'static str,
        /// Location of the record
        location: Location,
    },

    /// A stage the location implies was not supplied
    #[error("A record at '{location}' needs stage '{stage}'")]
    MissingStage {
        /// Name of the stage
        stage: &'static str,
        /// Location of the record
        location: Location,
    },

    /// A later stage timestamp precedes an earlier one
    #[error("Stage '{later}' at {later_at} precedes stage '{earlier}' at {earlier_at}")]
    StageOrder {
        /// Name of the earlier stage
        earlier: &'static str,
        /// Timestamp of the earlier stage
        earlier_at: DateTime<Utc>,
        /// Name of the later stage
        later: &'static str,
        /// Timestamp of the later stage
        later_at: DateTime<Utc>,
    },
}

/// Errors returned by store and checkpoint commands
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No entity with the given id exists
    #[error("No {entity} with id {id}")]
    NotFound {
        /// Kind of entity looked up
        entity: EntityKind,
        /// Textual id that was not found
        id: String,
    },

    /// Transition is not legal from the record's current location
    #[error("Cannot apply '{attempted}' to record {record} at '{current}'")]
    InvalidTransition {
        /// Record the transition targeted
        record: RecordId,
        /// Location the record was in
        current: Location,
        /// Transition that was attempted
        attempted: Transition,
    },

    /// Record has exited and is read-only
    #[error("Access record {0} is closed")]
    RecordClosed(RecordId),
}

impl StoreError {
    /// Create a not-found error for any displayable id
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    /// Check if the caller can carry on after this error
    ///
    /// Rejected transitions and closed records are expected races between a
    /// ticker and manual checkpoint input; bad input is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Validation(_) => false,
            StoreError::NotFound { .. } => true,
            StoreError::InvalidTransition { .. } => true,
            StoreError::RecordClosed(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "Validation",
            StoreError::NotFound { .. } => "Not Found",
            StoreError::InvalidTransition { .. } => "Invalid Transition",
            StoreError::RecordClosed(_) => "Record Closed",
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while running the simulation feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// A store command failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration is invalid
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(#[from] ConfigValidationError),

    /// Time management error
    #[error("Time management error: {0}")]
    Time(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FeedError {
    /// Create a time management error
    pub fn time_error(msg: impl Into<String>) -> Self {
        Self::Time(msg.into())
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            FeedError::Store(inner) => inner.is_recoverable(),
            FeedError::Config(_) => false,
            FeedError::ConfigValidation(_) => false,
            FeedError::Time(_) => true,
            FeedError::Io(_) => true,
            FeedError::Serialization(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            FeedError::Store(inner) => inner.category(),
            FeedError::Config(_) | FeedError::ConfigValidation(_) => "Configuration",
            FeedError::Time(_) => "Time Management",
            FeedError::Io(_) => "IO",
            FeedError::Serialization(_) => "Serialization",
        }
    }
}

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// What the feed does after a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Skip the current operation and continue
    Skip,
    /// Stop the run and surface the error
    Abort,
}

/// Error handler for graceful recovery inside the feed loop
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    /// Whether to continue on recoverable errors
    pub continue_on_recoverable: bool,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self { continue_on_recoverable: true }
    }
}

impl ErrorHandler {
    /// Create a new error handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that aborts on every error
    pub fn strict() -> Self {
        Self { continue_on_recoverable: false }
    }

    /// Log the error and pick a recovery strategy
    pub fn handle_error(&self, error: &FeedError, context: &str) -> RecoveryStrategy {
        if error.is_recoverable() {
            warn!("Recoverable error in {}: {}", error.category(), error);
        } else {
            error!("Critical error in {}: {}", error.category(), error);
        }
        if !context.is_empty() {
            debug!("Error context: {}", context);
        }

        if error.is_recoverable() && self.continue_on_recoverable {
            RecoveryStrategy::Skip
        } else {
            RecoveryStrategy::Abort
        }
    }

    /// Run an operation, turning recoverable failures into `Ok(None)`
    pub fn execute<T, F>(&self, context: &str, operation: F) -> FeedResult<Option<T>>
    where
        F: FnOnce() -> FeedResult<T>,
    {
        match operation() {
            Ok(value) => Ok(Some(value)),
            Err(error) => match self.handle_error(&error, context) {
                RecoveryStrategy::Skip => Ok(None),
                RecoveryStrategy::Abort => Err(error),
            },
        }
    }
}
