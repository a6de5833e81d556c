use thiserror::Error;
use workout_core::{VersionedWorkout, WorkoutId};

/// An operation in a batch that cannot be applied.
///
/// Errors raised locally always name the operation; a store may report a
/// rejected batch without saying which operation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {}", describe_operation(.operation_index, .op), .detail)]
pub struct OperationError {
    /// Position of the offending operation in its batch
    pub operation_index: Option<usize>,
    /// Tag of the offending operation, e.g. "delete_block"
    pub op: Option<String>,
    pub detail: String,
}

impl OperationError {
    pub fn new(operation_index: usize, op: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation_index: Some(operation_index),
            op: Some(op.into()),
            detail: detail.into(),
        }
    }

    /// A rejection that does not point at a specific operation
    pub fn unattributed(detail: impl Into<String>) -> Self {
        Self {
            operation_index: None,
            op: None,
            detail: detail.into(),
        }
    }
}

fn describe_operation(operation_index: &Option<usize>, op: &Option<String>) -> String {
    match (operation_index, op) {
        (Some(index), Some(op)) => format!("operation {} ({})", index, op),
        (Some(index), None) => format!("operation {}", index),
        (None, Some(op)) => format!("operation ({})", op),
        (None, None) => "operation".to_string(),
    }
}

/// Outcome of a failed store call
#[derive(Error, Debug)]
pub enum StoreError {
    /// The expected version is stale; carries the store's current snapshot
    #[error("version conflict: workout is now at {}", .current.updated_at)]
    Conflict { current: Box<VersionedWorkout> },

    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] OperationError),

    #[error("invalid selection: {detail}")]
    InvalidSelection {
        workout_id: Option<WorkoutId>,
        detail: String,
    },

    /// A mix source does not exist
    #[error("source workout {workout_id} not found")]
    SourceNotFound { workout_id: WorkoutId },

    #[error("workout {workout_id} not found")]
    WorkoutNotFound { workout_id: WorkoutId },

    #[error("network failure: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The store answered with something outside its contract
    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

impl StoreError {
    pub fn invalid_selection(workout_id: Option<WorkoutId>, detail: impl Into<String>) -> Self {
        StoreError::InvalidSelection {
            workout_id,
            detail: detail.into(),
        }
    }

    /// HTTP status the store uses for this outcome
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Conflict { .. } => Some(409),
            StoreError::InvalidOperation(_) | StoreError::InvalidSelection { .. } => Some(422),
            StoreError::SourceNotFound { .. } | StoreError::WorkoutNotFound { .. } => Some(404),
            StoreError::Network(_) => None,
            StoreError::UnexpectedResponse { status, .. } => Some(*status),
        }
    }

    /// Whether the same request can succeed later without being corrected.
    ///
    /// A conflict only succeeds after the caller re-derives its operations
    /// from the fresh snapshot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict { .. } | StoreError::Network(_))
    }
}
