use workout_core::{VersionedWorkout, WorkoutStructure};

use crate::error::StoreError;
use crate::operation::Operation;
use crate::store::WorkoutStore;

/// Derive operations from `snapshot` and submit them, rebasing on conflict.
///
/// On a version conflict the operations are derived again from the fresh
/// snapshot carried by the conflict and resubmitted. At least one attempt is
/// made and at most `max_attempts`; the last conflict is returned as is.
/// Any other failure is returned immediately.
pub async fn apply_with_rebase<S, F>(
    store: &S,
    snapshot: VersionedWorkout,
    max_attempts: usize,
    mut derive: F,
) -> Result<VersionedWorkout, StoreError>
where
    S: WorkoutStore,
    F: FnMut(&WorkoutStructure) -> Vec<Operation>,
{
    let mut snapshot = snapshot;
    let mut attempt = 1;

    loop {
        let operations = derive(&snapshot.workout.structure);
        let result = store
            .apply_operations(snapshot.id(), &operations, &snapshot.updated_at)
            .await;

        match result {
            Err(StoreError::Conflict { current }) if attempt < max_attempts => {
                tracing::debug!(
                    "Rebasing edit of workout {} onto {} (attempt {})",
                    current.id(),
                    current.updated_at,
                    attempt
                );
                snapshot = *current;
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use workout_core::{Block, BlockStructure, Exercise, Workout};

    fn workout() -> Workout {
        Workout::new(
            "wk-1",
            WorkoutStructure::new("Base", "manual").with_block(
                Block::new("Main", BlockStructure::Sets)
                    .with_exercise(Exercise::reps("Squat", 5, 5)),
            ),
        )
    }

    fn append_to_last_block(w: &WorkoutStructure) -> Vec<Operation> {
        vec![Operation::AddExercise {
            block_index: w.blocks.len() - 1,
            exercise: Exercise::reps("Calf raise", 3, 15),
            position: None,
        }]
    }

    #[tokio::test]
    async fn test_rebases_after_conflict() {
        let store = MemoryStore::new();
        let stale = store.insert(workout()).await;

        // someone else adds a block in the meantime
        store
            .apply_operations(
                stale.id(),
                &[Operation::AddBlock {
                    block: Block::new("Accessories", BlockStructure::Circuit),
                    position: None,
                }],
                &stale.updated_at,
            )
            .await
            .unwrap();

        let mut derived = 0;
        let result = apply_with_rebase(&store, stale, 3, |w| {
            derived += 1;
            append_to_last_block(w)
        })
        .await
        .unwrap();

        assert_eq!(derived, 2);
        let blocks = &result.workout.structure.blocks;
        assert_eq!(blocks[1].label, "Accessories");
        assert_eq!(blocks[1].exercises[0].name, "Calf raise");
        assert_eq!(blocks[0].exercises.len(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = MemoryStore::new();
        let stale = store.insert(workout()).await;
        store
            .apply_operations(stale.id(), &[], &stale.updated_at)
            .await
            .unwrap();

        let result = apply_with_rebase(&store, stale, 1, append_to_last_block).await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
    }
}
