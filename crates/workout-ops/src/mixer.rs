use std::collections::HashSet;

use workout_core::{BlockProvenance, MixSelection, MixedWorkout, WorkoutId, WorkoutStructure};

use crate::error::StoreError;

/// Build a composite workout from selected blocks of existing workouts.
///
/// `resolve` looks up a source by id. Every selection is resolved and every
/// index checked before anything is copied, so a failure yields no partial
/// mix. Blocks are cloned in selection order, then `block_indices` order,
/// and each one records where it came from. Sources are only read.
pub fn mix_workouts<'a, F>(
    selections: &[MixSelection],
    title: &str,
    mut resolve: F,
) -> Result<MixedWorkout, StoreError>
where
    F: FnMut(&WorkoutId) -> Option<&'a WorkoutStructure>,
{
    if selections.is_empty() {
        return Err(StoreError::invalid_selection(
            None,
            "a mix needs at least one source",
        ));
    }

    let mut resolved = Vec::with_capacity(selections.len());
    for selection in selections {
        let source = resolve(&selection.workout_id).ok_or_else(|| StoreError::SourceNotFound {
            workout_id: selection.workout_id.clone(),
        })?;
        validate_selection(selection, source)?;
        resolved.push((selection, source));
    }

    let mut mixed = MixedWorkout::new(title);
    for (selection, source) in resolved {
        for &index in &selection.block_indices {
            mixed.push_block(
                source.blocks[index].clone(),
                BlockProvenance {
                    source_workout_id: selection.workout_id.clone(),
                    source_block_index: index,
                },
            );
        }
    }

    tracing::debug!(
        "Mixed {} blocks from {} sources into '{}'",
        mixed.block_count(),
        selections.len(),
        title
    );

    Ok(mixed)
}

fn validate_selection(selection: &MixSelection, source: &WorkoutStructure) -> Result<(), StoreError> {
    let workout_id = Some(selection.workout_id.clone());

    if selection.block_indices.is_empty() {
        return Err(StoreError::invalid_selection(
            workout_id,
            format!("no blocks selected from workout {}", selection.workout_id),
        ));
    }

    let mut seen = HashSet::new();
    for &index in &selection.block_indices {
        if index >= source.blocks.len() {
            return Err(StoreError::invalid_selection(
                workout_id,
                format!(
                    "block index {} out of range for workout {} ({} blocks)",
                    index,
                    selection.workout_id,
                    source.blocks.len()
                ),
            ));
        }
        if !seen.insert(index) {
            return Err(StoreError::invalid_selection(
                workout_id,
                format!(
                    "block index {} selected twice from workout {}",
                    index, selection.workout_id
                ),
            ));
        }
    }

    Ok(())
}
