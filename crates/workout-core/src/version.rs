use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workout::{Workout, WorkoutId};

/// Opaque marker of a document state (the store's `updated_at`).
///
/// Tokens are only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VersionToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for VersionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A workout together with the version it was read at.
///
/// This pair is the unit of optimistic concurrency: edits are submitted
/// against `updated_at`, so the two must travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedWorkout {
    pub workout: Workout,
    pub updated_at: VersionToken,
}

impl VersionedWorkout {
    pub fn new(workout: Workout, updated_at: VersionToken) -> Self {
        Self {
            workout,
            updated_at,
        }
    }

    pub fn id(&self) -> &WorkoutId {
        &self.workout.id
    }

    /// Whether this snapshot was taken at `version`
    pub fn is_at(&self, version: &VersionToken) -> bool {
        &self.updated_at == version
    }
}
