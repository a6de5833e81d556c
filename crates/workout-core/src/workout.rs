use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::block::Block;
use crate::version::VersionToken;
use crate::volume::{sum_estimates, Volume};

/// Store-assigned workout identifier, e.g. "wk-1"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WorkoutId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The editable body of a workout; block order is execution order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutStructure {
    pub title: String,
    /// Where the workout came from ("manual", "ai", a URL, ...)
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl WorkoutStructure {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn exercise_count(&self) -> usize {
        self.blocks.iter().map(Block::exercise_count).sum()
    }
}

impl Volume for WorkoutStructure {
    fn describe_volume(&self) -> String {
        format!(
            "{} blocks, {} exercises",
            self.block_count(),
            self.exercise_count()
        )
    }

    fn estimate_duration(&self) -> Option<Duration> {
        sum_estimates(&self.blocks)
    }
}

/// A stored workout document: identity plus structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: WorkoutId,
    #[serde(flatten)]
    pub structure: WorkoutStructure,
}

impl Workout {
    pub fn new(id: impl Into<WorkoutId>, structure: WorkoutStructure) -> Self {
        Self {
            id: id.into(),
            structure,
        }
    }

    /// Serialize the workout to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a workout from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Row of the workout history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: WorkoutId,
    pub title: String,
    pub block_count: usize,
    pub exercise_count: usize,
    pub updated_at: VersionToken,
}

impl WorkoutSummary {
    pub fn of(workout: &Workout, updated_at: VersionToken) -> Self {
        Self {
            id: workout.id.clone(),
            title: workout.structure.title.clone(),
            block_count: workout.structure.block_count(),
            exercise_count: workout.structure.exercise_count(),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockStructure;
    use crate::exercise::Exercise;
    use serde_json::json;

    #[test]
    fn test_workout_wire_shape() {
        let structure = WorkoutStructure::new("Leg day", "manual").with_block(
            Block::new("Main", BlockStructure::Sets).with_exercise(Exercise::reps("Squat", 5, 5)),
        );
        let workout = Workout::new("wk-1", structure);

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["id"], "wk-1");
        assert_eq!(value["title"], "Leg day");
        assert_eq!(value["blocks"][0]["exercises"][0]["reps"], 5);

        let back = Workout::from_json(&workout.to_json().unwrap()).unwrap();
        assert_eq!(back, workout);
    }

    #[test]
    fn test_missing_blocks_default_to_empty() {
        let workout: Workout =
            serde_json::from_value(json!({"id": "wk-9", "title": "Empty"})).unwrap();
        assert_eq!(workout.structure.block_count(), 0);
        assert_eq!(workout.structure.source, "");
    }
}
