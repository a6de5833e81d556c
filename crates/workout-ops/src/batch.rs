use workout_core::WorkoutStructure;

use crate::error::OperationError;
use crate::operation::{Operation, OPERATION_TAGS};

/// Apply `operations` in order to a copy of `workout`.
///
/// Each operation sees the cumulative effect of the ones before it. The
/// input is never modified; on failure the copy is discarded and the error
/// names the first operation that could not be applied.
pub fn apply_batch(
    workout: &WorkoutStructure,
    operations: &[Operation],
) -> Result<WorkoutStructure, OperationError> {
    let mut working = workout.clone();

    for (index, operation) in operations.iter().enumerate() {
        operation
            .apply(&mut working)
            .map_err(|detail| OperationError::new(index, operation.name(), detail))?;
    }

    Ok(working)
}

/// Decode a batch of raw JSON operations, reporting the first one that is
/// malformed or carries an unknown tag.
pub fn decode_operations(raw: Vec<serde_json::Value>) -> Result<Vec<Operation>, OperationError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let tag = value
                .get("op")
                .and_then(|t| t.as_str())
                .unwrap_or("")
                .to_string();

            if !OPERATION_TAGS.contains(&tag.as_str()) {
                let detail = if tag.is_empty() {
                    "missing operation tag".to_string()
                } else {
                    format!("unknown operation '{}'", tag)
                };
                return Err(OperationError::new(index, tag, detail));
            }

            serde_json::from_value(value)
                .map_err(|e| OperationError::new(index, tag, e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workout_core::{Block, BlockStructure, Exercise};

    fn workout() -> WorkoutStructure {
        WorkoutStructure::new("Intervals", "manual")
            .with_block(
                Block::new("Warmup", BlockStructure::Regular)
                    .with_exercise(Exercise::timed("Jog", 300)),
            )
            .with_block(
                Block::new("Main", BlockStructure::Emom)
                    .with_exercise(Exercise::reps("Burpee", 10, 10)),
            )
    }

    #[test]
    fn test_operations_see_previous_effects() {
        let ops = vec![
            Operation::DeleteBlock { block_index: 0 },
            Operation::AddExercise {
                block_index: 0,
                exercise: Exercise::reps("Thruster", 10, 10),
                position: None,
            },
        ];

        let result = apply_batch(&workout(), &ops).unwrap();
        assert_eq!(result.blocks.len(), 1);
        // block 0 is now the former "Main" block
        assert_eq!(result.blocks[0].label, "Main");
        assert_eq!(result.blocks[0].exercises.len(), 2);
        assert_eq!(result.blocks[0].exercises[1].name, "Thruster");
    }

    #[test]
    fn test_failure_is_atomic() {
        let original = workout();
        let ops = vec![
            Operation::RenameWorkout {
                title: "Changed".to_string(),
            },
            Operation::DeleteBlock { block_index: 0 },
            Operation::DeleteBlock { block_index: 1 },
        ];

        let err = apply_batch(&original, &ops).unwrap_err();
        assert_eq!(err.operation_index, Some(2));
        assert_eq!(err.op.as_deref(), Some("delete_block"));
        assert_eq!(original, workout());
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(apply_batch(&workout(), &[]).unwrap(), workout());
    }

    #[test]
    fn test_decode_reports_unknown_tag() {
        let raw = vec![
            json!({"op": "rename_workout", "title": "Ok"}),
            json!({"op": "explode_block", "block_index": 0}),
        ];
        let err = decode_operations(raw).unwrap_err();
        assert_eq!(err.operation_index, Some(1));
        assert_eq!(err.op.as_deref(), Some("explode_block"));
        assert!(err.detail.contains("unknown operation"));
    }

    #[test]
    fn test_decode_reports_bad_fields() {
        let raw = vec![json!({"op": "delete_block", "block_index": "first"})];
        let err = decode_operations(raw).unwrap_err();
        assert_eq!(err.operation_index, Some(0));
        assert_eq!(err.op.as_deref(), Some("delete_block"));

        let ops = decode_operations(vec![json!({"op": "delete_block", "block_index": 1})]).unwrap();
        assert_eq!(ops, vec![Operation::DeleteBlock { block_index: 1 }]);
    }
}
