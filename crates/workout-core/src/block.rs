use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::exercise::Exercise;
use crate::volume::{sum_estimates, Volume};

/// Structural pattern shared by the exercises of a block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockStructure {
    Circuit,
    Sets,
    ForTime,
    Amrap,
    Emom,
    Tabata,
    Superset,
    #[default]
    Regular,
    /// Any tag this model does not know, kept verbatim
    Other(String),
}

impl BlockStructure {
    pub fn as_str(&self) -> &str {
        match self {
            BlockStructure::Circuit => "circuit",
            BlockStructure::Sets => "sets",
            BlockStructure::ForTime => "for-time",
            BlockStructure::Amrap => "amrap",
            BlockStructure::Emom => "emom",
            BlockStructure::Tabata => "tabata",
            BlockStructure::Superset => "superset",
            BlockStructure::Regular => "regular",
            BlockStructure::Other(tag) => tag,
        }
    }
}

impl From<String> for BlockStructure {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "circuit" => BlockStructure::Circuit,
            "sets" => BlockStructure::Sets,
            "for-time" => BlockStructure::ForTime,
            "amrap" => BlockStructure::Amrap,
            "emom" => BlockStructure::Emom,
            "tabata" => BlockStructure::Tabata,
            "superset" => BlockStructure::Superset,
            "regular" => BlockStructure::Regular,
            _ => BlockStructure::Other(tag),
        }
    }
}

impl From<BlockStructure> for String {
    fn from(structure: BlockStructure) -> Self {
        match structure {
            BlockStructure::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exercises performed back to back inside a block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Superset {
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_between_sec: Option<u32>,
}

/// A named group of exercises sharing a structural pattern
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub structure: BlockStructure,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Work interval for timed structures (EMOM, tabata, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_work_sec: Option<u32>,
    /// Rest between rounds or sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_between_sec: Option<u32>,
    /// Default rep range for exercises without their own, e.g. "8-12"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reps_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supersets: Vec<Superset>,
}

impl Block {
    pub fn new(label: impl Into<String>, structure: BlockStructure) -> Self {
        Self {
            label: label.into(),
            structure,
            ..Default::default()
        }
    }

    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    /// Number of exercises, including those nested in supersets
    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
            + self
                .supersets
                .iter()
                .map(|s| s.exercises.len())
                .sum::<usize>()
    }

    fn all_exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises
            .iter()
            .chain(self.supersets.iter().flat_map(|s| s.exercises.iter()))
    }
}

impl Volume for Block {
    fn describe_volume(&self) -> String {
        let parts: Vec<String> = self
            .all_exercises()
            .map(|e| format!("{} {}", e.name, e.describe_volume()))
            .collect();
        format!("{} ({}): {}", self.label, self.structure, parts.join(", "))
    }

    fn estimate_duration(&self) -> Option<Duration> {
        sum_estimates(self.all_exercises())
    }
}
