use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::ModelError;
use crate::workout::{WorkoutId, WorkoutStructure};

/// `source` recorded on every mixed workout
pub const MIXER_SOURCE: &str = "mixer";

/// Blocks to take from one source workout, in the order given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixSelection {
    pub workout_id: WorkoutId,
    pub block_indices: Vec<usize>,
}

impl MixSelection {
    pub fn new(workout_id: impl Into<WorkoutId>, block_indices: impl Into<Vec<usize>>) -> Self {
        Self {
            workout_id: workout_id.into(),
            block_indices: block_indices.into(),
        }
    }
}

/// Where a mixed block was copied from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProvenance {
    pub source_workout_id: WorkoutId,
    pub source_block_index: usize,
}

/// A composite workout built from copied blocks.
///
/// `mixer_sources[i]` is the origin of `blocks[i]`; blocks can only be added
/// together with their provenance so the two stay aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedWorkout {
    title: String,
    source: String,
    blocks: Vec<Block>,
    mixer_sources: Vec<BlockProvenance>,
}

impl MixedWorkout {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: MIXER_SOURCE.to_string(),
            blocks: Vec::new(),
            mixer_sources: Vec::new(),
        }
    }

    /// Append a copied block and record its origin
    pub fn push_block(&mut self, block: Block, provenance: BlockProvenance) {
        self.blocks.push(block);
        self.mixer_sources.push(provenance);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn mixer_sources(&self) -> &[BlockProvenance] {
        &self.mixer_sources
    }

    /// Origin of the block at `index` in the mix
    pub fn provenance_of(&self, index: usize) -> Option<&BlockProvenance> {
        self.mixer_sources.get(index)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn exercise_count(&self) -> usize {
        self.blocks.iter().map(Block::exercise_count).sum()
    }

    /// Drop the provenance and keep a plain workout body, ready to be saved
    pub fn into_structure(self) -> WorkoutStructure {
        WorkoutStructure {
            title: self.title,
            source: self.source,
            blocks: self.blocks,
        }
    }
}

/// A reviewable, not yet persisted mix result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MixPreviewRecord")]
pub struct MixPreview {
    id: String,
    title: String,
    workout: MixedWorkout,
    exercise_count: usize,
    block_count: usize,
}

impl MixPreview {
    /// Build a preview; the counts are derived from `workout`
    pub fn new(id: impl Into<String>, workout: MixedWorkout) -> Self {
        Self {
            id: id.into(),
            title: workout.title.clone(),
            exercise_count: workout.exercise_count(),
            block_count: workout.block_count(),
            workout,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn workout(&self) -> &MixedWorkout {
        &self.workout
    }

    pub fn into_workout(self) -> MixedWorkout {
        self.workout
    }

    pub fn exercise_count(&self) -> usize {
        self.exercise_count
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }
}

#[derive(Deserialize)]
struct MixPreviewRecord {
    id: String,
    title: String,
    workout: MixedWorkout,
    exercise_count: usize,
    block_count: usize,
}

impl TryFrom<MixPreviewRecord> for MixPreview {
    type Error = ModelError;

    fn try_from(record: MixPreviewRecord) -> Result<Self, Self::Error> {
        let workout = record.workout;
        if workout.mixer_sources.len() != workout.blocks.len() {
            return Err(ModelError::ProvenanceMismatch {
                blocks: workout.blocks.len(),
                sources: workout.mixer_sources.len(),
            });
        }

        let preview = MixPreview {
            id: record.id,
            title: record.title,
            exercise_count: record.exercise_count,
            block_count: record.block_count,
            workout,
        };

        if preview.block_count != preview.workout.block_count() {
            return Err(ModelError::CountMismatch {
                field: "block_count",
                expected: preview.workout.block_count(),
                actual: preview.block_count,
            });
        }
        if preview.exercise_count != preview.workout.exercise_count() {
            return Err(ModelError::CountMismatch {
                field: "exercise_count",
                expected: preview.workout.exercise_count(),
                actual: preview.exercise_count,
            });
        }

        Ok(preview)
    }
}
