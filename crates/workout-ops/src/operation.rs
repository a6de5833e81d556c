use serde::{Deserialize, Serialize};
use workout_core::{Block, Exercise, WorkoutStructure};

/// One atomic structural edit to a workout.
///
/// Blocks and exercises are addressed by index. Inside a batch every
/// operation sees the document as left by the operations before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    RenameWorkout {
        title: String,
    },
    RenameBlock {
        block_index: usize,
        label: String,
    },
    /// Insert a block at `position`, or append it
    AddBlock {
        block: Block,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    DeleteBlock {
        block_index: usize,
    },
    MoveBlock {
        from_index: usize,
        to_index: usize,
    },
    /// Insert an exercise at `position` in a block, or append it
    AddExercise {
        block_index: usize,
        exercise: Exercise,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    UpdateExercise {
        block_index: usize,
        exercise_index: usize,
        exercise: Exercise,
    },
    DeleteExercise {
        block_index: usize,
        exercise_index: usize,
    },
    /// Remove an exercise and insert it into a (possibly different) block.
    /// `to_exercise_index` is read after the removal.
    MoveExercise {
        from_block_index: usize,
        from_exercise_index: usize,
        to_block_index: usize,
        to_exercise_index: usize,
    },
}

/// Every tag an operation can carry on the wire
pub const OPERATION_TAGS: &[&str] = &[
    "rename_workout",
    "rename_block",
    "add_block",
    "delete_block",
    "move_block",
    "add_exercise",
    "update_exercise",
    "delete_exercise",
    "move_exercise",
];

impl Operation {
    /// Wire tag of this operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::RenameWorkout { .. } => "rename_workout",
            Operation::RenameBlock { .. } => "rename_block",
            Operation::AddBlock { .. } => "add_block",
            Operation::DeleteBlock { .. } => "delete_block",
            Operation::MoveBlock { .. } => "move_block",
            Operation::AddExercise { .. } => "add_exercise",
            Operation::UpdateExercise { .. } => "update_exercise",
            Operation::DeleteExercise { .. } => "delete_exercise",
            Operation::MoveExercise { .. } => "move_exercise",
        }
    }

    /// Apply the operation in place.
    ///
    /// All indices are checked before anything is touched, so on error the
    /// workout is left unchanged. The error is a human readable detail.
    pub fn apply(&self, workout: &mut WorkoutStructure) -> Result<(), String> {
        match self {
            Operation::RenameWorkout { title } => {
                if title.trim().is_empty() {
                    return Err("title cannot be empty".to_string());
                }
                workout.title = title.clone();
            }
            Operation::RenameBlock { block_index, label } => {
                if label.trim().is_empty() {
                    return Err("label cannot be empty".to_string());
                }
                block_mut(workout, *block_index)?.label = label.clone();
            }
            Operation::AddBlock { block, position } => {
                let index = insert_position(*position, workout.blocks.len(), "block")?;
                workout.blocks.insert(index, block.clone());
            }
            Operation::DeleteBlock { block_index } => {
                check_block(workout, *block_index)?;
                workout.blocks.remove(*block_index);
            }
            Operation::MoveBlock {
                from_index,
                to_index,
            } => {
                check_block(workout, *from_index)?;
                check_block(workout, *to_index)?;
                let block = workout.blocks.remove(*from_index);
                workout.blocks.insert(*to_index, block);
            }
            Operation::AddExercise {
                block_index,
                exercise,
                position,
            } => {
                let block = block_mut(workout, *block_index)?;
                let index = insert_position(*position, block.exercises.len(), "exercise")?;
                block.exercises.insert(index, exercise.clone());
            }
            Operation::UpdateExercise {
                block_index,
                exercise_index,
                exercise,
            } => {
                let block = block_mut(workout, *block_index)?;
                check_exercise(block, *block_index, *exercise_index)?;
                block.exercises[*exercise_index] = exercise.clone();
            }
            Operation::DeleteExercise {
                block_index,
                exercise_index,
            } => {
                let block = block_mut(workout, *block_index)?;
                check_exercise(block, *block_index, *exercise_index)?;
                block.exercises.remove(*exercise_index);
            }
            Operation::MoveExercise {
                from_block_index,
                from_exercise_index,
                to_block_index,
                to_exercise_index,
            } => {
                check_block(workout, *from_block_index)?;
                check_block(workout, *to_block_index)?;
                check_exercise(
                    &workout.blocks[*from_block_index],
                    *from_block_index,
                    *from_exercise_index,
                )?;

                // Length of the target once the exercise has been taken out
                let target_len = if from_block_index == to_block_index {
                    workout.blocks[*to_block_index].exercises.len() - 1
                } else {
                    workout.blocks[*to_block_index].exercises.len()
                };
                if *to_exercise_index > target_len {
                    return Err(format!(
                        "exercise position {} out of range for block {} ({} exercises)",
                        to_exercise_index, to_block_index, target_len
                    ));
                }

                let exercise = workout.blocks[*from_block_index]
                    .exercises
                    .remove(*from_exercise_index);
                workout.blocks[*to_block_index]
                    .exercises
                    .insert(*to_exercise_index, exercise);
            }
        }

        Ok(())
    }
}

fn check_block(workout: &WorkoutStructure, index: usize) -> Result<(), String> {
    if index < workout.blocks.len() {
        Ok(())
    } else {
        Err(format!(
            "block index {} out of range ({} blocks)",
            index,
            workout.blocks.len()
        ))
    }
}

fn block_mut(workout: &mut WorkoutStructure, index: usize) -> Result<&mut Block, String> {
    check_block(workout, index)?;
    Ok(&mut workout.blocks[index])
}

fn check_exercise(block: &Block, block_index: usize, index: usize) -> Result<(), String> {
    if index < block.exercises.len() {
        Ok(())
    } else {
        Err(format!(
            "exercise index {} out of range for block {} ({} exercises)",
            index,
            block_index,
            block.exercises.len()
        ))
    }
}

/// Resolve an optional insert position against a sequence of `len` items
fn insert_position(position: Option<usize>, len: usize, what: &str) -> Result<usize, String> {
    match position {
        None => Ok(len),
        Some(p) if p <= len => Ok(p),
        Some(p) => Err(format!(
            "{} position {} out of range ({} present)",
            what, p, len
        )),
    }
}
