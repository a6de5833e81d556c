//! Request and response bodies of the workout store HTTP contract

use serde::{Deserialize, Serialize};
use workout_core::{
    MixPreview, MixSelection, VersionToken, VersionedWorkout, Workout, WorkoutId, WorkoutSummary,
};
use workout_ops::{Operation, OperationError, StoreError};

/// `error` code of a 422 caused by an operation
pub const OPERATION_INVALID: &str = "operation_invalid";
/// `error` code of a 422 caused by a mix selection
pub const SELECTION_INVALID: &str = "selection_invalid";

/// `POST /workouts/{id}/operations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOperationsRequest {
    pub operations: Vec<Operation>,
    pub updated_at: VersionToken,
}

/// `POST /workouts/mix`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixRequest {
    pub sources: Vec<MixSelection>,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixResponse {
    pub preview: MixPreview,
}

/// `GET /workouts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutListResponse {
    pub workouts: Vec<WorkoutSummary>,
}

/// `detail` of an error body: a message, or the workout that was not found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Missing { workout_id: WorkoutId },
}

/// `current_workout` of a 409: the store's document, usually with its version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictWorkout {
    #[serde(flatten)]
    pub workout: Workout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<VersionToken>,
}

/// Body of every non-2xx store response.
///
/// Which fields are present depends on the status: 409 carries
/// `current_workout` (its version inside it or next to it), 422 carries
/// `error` and `detail` (optionally `operation_index`/`op` for operations),
/// 404 carries `detail.workout_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<WorkoutId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_workout: Option<ConflictWorkout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<VersionToken>,
}

impl ErrorBody {
    /// Encode a store outcome the way the store reports it
    pub fn from_error(err: &StoreError) -> Self {
        match err {
            StoreError::Conflict { current } => ErrorBody {
                current_workout: Some(ConflictWorkout {
                    workout: current.workout.clone(),
                    updated_at: Some(current.updated_at.clone()),
                }),
                updated_at: Some(current.updated_at.clone()),
                ..Default::default()
            },
            StoreError::InvalidOperation(e) => ErrorBody {
                error: Some(OPERATION_INVALID.to_string()),
                detail: Some(ErrorDetail::Message(e.detail.clone())),
                operation_index: e.operation_index,
                op: e.op.clone(),
                ..Default::default()
            },
            StoreError::InvalidSelection { workout_id, detail } => ErrorBody {
                error: Some(SELECTION_INVALID.to_string()),
                detail: Some(ErrorDetail::Message(detail.clone())),
                workout_id: workout_id.clone(),
                ..Default::default()
            },
            StoreError::SourceNotFound { workout_id }
            | StoreError::WorkoutNotFound { workout_id } => ErrorBody {
                detail: Some(ErrorDetail::Missing {
                    workout_id: workout_id.clone(),
                }),
                ..Default::default()
            },
            other => ErrorBody {
                error: Some("internal".to_string()),
                detail: Some(ErrorDetail::Message(other.to_string())),
                ..Default::default()
            },
        }
    }

    fn message(&self) -> String {
        match &self.detail {
            Some(ErrorDetail::Message(message)) => message.clone(),
            Some(ErrorDetail::Missing { workout_id }) => format!("workout {} not found", workout_id),
            None => String::new(),
        }
    }

    fn missing_workout(&self) -> Option<&WorkoutId> {
        match &self.detail {
            Some(ErrorDetail::Missing { workout_id }) => Some(workout_id),
            _ => self.workout_id.as_ref(),
        }
    }
}

/// Which call an error response belongs to; decides how a 404 reads
#[derive(Debug, Clone, Copy)]
pub(crate) enum Call<'a> {
    Read(&'a WorkoutId),
    List,
    Apply(&'a WorkoutId),
    Mix,
}

/// Turn a non-2xx response into the matching store outcome
pub(crate) fn decode_error(status: u16, text: String, call: Call<'_>) -> StoreError {
    let body: Option<ErrorBody> = serde_json::from_str(&text).ok();

    let decoded = body.and_then(|body| match status {
        409 => {
            let current = body.current_workout?;
            let updated_at = body.updated_at.or(current.updated_at)?;
            Some(StoreError::Conflict {
                current: Box::new(VersionedWorkout::new(current.workout, updated_at)),
            })
        }
        422 => match body.error.as_deref() {
            Some(OPERATION_INVALID) => Some(StoreError::InvalidOperation(OperationError {
                operation_index: body.operation_index,
                op: body.op.clone(),
                detail: body.message(),
            })),
            Some(SELECTION_INVALID) => Some(StoreError::InvalidSelection {
                workout_id: body.workout_id.clone(),
                detail: body.message(),
            }),
            _ => None,
        },
        404 => match call {
            Call::Read(id) | Call::Apply(id) => Some(StoreError::WorkoutNotFound {
                workout_id: body.missing_workout().unwrap_or(id).clone(),
            }),
            Call::Mix => body
                .missing_workout()
                .map(|workout_id| StoreError::SourceNotFound {
                    workout_id: workout_id.clone(),
                }),
            Call::List => None,
        },
        _ => None,
    });

    decoded.unwrap_or(StoreError::UnexpectedResponse { status, body: text })
}
