use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::RwLock;
use uuid::Uuid;
use workout_core::{
    MixPreview, MixSelection, VersionToken, VersionedWorkout, Workout, WorkoutId, WorkoutStructure,
    WorkoutSummary,
};

use crate::batch::apply_batch;
use crate::error::StoreError;
use crate::mixer::mix_workouts;
use crate::operation::Operation;

/// A document store for workouts with optimistic concurrency.
///
/// Every read returns the document together with its version, and every
/// write is checked against the version the caller last saw.
pub trait WorkoutStore: Send + Sync {
    /// Read a workout and the version it is at
    fn get_workout(
        &self,
        id: &WorkoutId,
    ) -> impl Future<Output = Result<VersionedWorkout, StoreError>> + Send;

    /// Workout history, most recently updated first
    fn list_workouts(&self) -> impl Future<Output = Result<Vec<WorkoutSummary>, StoreError>> + Send;

    /// Apply a batch of operations as one unit against `expected_version`
    fn apply_operations(
        &self,
        id: &WorkoutId,
        operations: &[Operation],
        expected_version: &VersionToken,
    ) -> impl Future<Output = Result<VersionedWorkout, StoreError>> + Send;

    /// Compose a new, unsaved workout from blocks of existing ones
    fn mix(
        &self,
        selections: &[MixSelection],
        title: &str,
    ) -> impl Future<Output = Result<MixPreview, StoreError>> + Send;
}

struct Record {
    workout: Workout,
    updated_at: DateTime<Utc>,
}

impl Record {
    fn token(&self) -> VersionToken {
        version_token(self.updated_at)
    }

    fn snapshot(&self) -> VersionedWorkout {
        VersionedWorkout::new(self.workout.clone(), self.token())
    }
}

/// Render a timestamp as a version token ("2026-01-01T00:00:00Z")
pub fn version_token(at: DateTime<Utc>) -> VersionToken {
    VersionToken::new(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// In-process workout store.
///
/// A single lock guards all records; a batch holds the write guard from the
/// version check until the new document is stored.
pub struct MemoryStore {
    records: RwLock<HashMap<WorkoutId, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Store a workout stamped with the current time
    pub async fn insert(&self, workout: Workout) -> VersionedWorkout {
        self.insert_at(workout, Utc::now()).await
    }

    /// Store a workout stamped with `updated_at`, replacing any previous one
    pub async fn insert_at(&self, workout: Workout, updated_at: DateTime<Utc>) -> VersionedWorkout {
        let record = Record {
            workout,
            updated_at,
        };
        let snapshot = record.snapshot();

        let mut records = self.records.write().await;
        records.insert(record.workout.id.clone(), record);
        snapshot
    }

    /// Remove a workout from the store
    pub async fn remove(&self, id: &WorkoutId) -> Option<Workout> {
        let mut records = self.records.write().await;
        records.remove(id).map(|r| r.workout)
    }

    /// Get workout count
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Next version after `previous`, strictly later even within one clock tick
fn next_version(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

impl WorkoutStore for MemoryStore {
    async fn get_workout(&self, id: &WorkoutId) -> Result<VersionedWorkout, StoreError> {
        let records = self.records.read().await;
        records
            .get(id)
            .map(Record::snapshot)
            .ok_or_else(|| StoreError::WorkoutNotFound {
                workout_id: id.clone(),
            })
    }

    async fn list_workouts(&self) -> Result<Vec<WorkoutSummary>, StoreError> {
        let records = self.records.read().await;
        let mut rows: Vec<(&DateTime<Utc>, WorkoutSummary)> = records
            .values()
            .map(|r| (&r.updated_at, WorkoutSummary::of(&r.workout, r.token())))
            .collect();
        rows.sort_by(|a, b| b.0.cmp(a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        Ok(rows.into_iter().map(|(_, summary)| summary).collect())
    }

    async fn apply_operations(
        &self,
        id: &WorkoutId,
        operations: &[Operation],
        expected_version: &VersionToken,
    ) -> Result<VersionedWorkout, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::WorkoutNotFound {
                workout_id: id.clone(),
            })?;

        if &record.token() != expected_version {
            tracing::warn!(
                "Version conflict on workout {}: expected {}, store is at {}",
                id,
                expected_version,
                record.token()
            );
            return Err(StoreError::Conflict {
                current: Box::new(record.snapshot()),
            });
        }

        let structure: WorkoutStructure = apply_batch(&record.workout.structure, operations)?;

        record.workout.structure = structure;
        record.updated_at = next_version(record.updated_at);

        tracing::info!(
            "Applied {} operations to workout {} (now at {})",
            operations.len(),
            id,
            record.token()
        );

        Ok(record.snapshot())
    }

    async fn mix(
        &self,
        selections: &[MixSelection],
        title: &str,
    ) -> Result<MixPreview, StoreError> {
        let guard = self.records.read().await;
        let records: &HashMap<WorkoutId, Record> = &guard;

        let mixed = mix_workouts(selections, title, |id| {
            records.get(id).map(|r| &r.workout.structure)
        })?;

        Ok(MixPreview::new(format!("mix-{}", Uuid::new_v4()), mixed))
    }
}
