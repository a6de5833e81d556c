pub mod block;
pub mod error;
pub mod exercise;
pub mod mix;
pub mod version;
pub mod volume;
pub mod workout;

pub use block::{Block, BlockStructure, Superset};
pub use error::ModelError;
pub use exercise::{Exercise, ExerciseKind};
pub use mix::{BlockProvenance, MixPreview, MixSelection, MixedWorkout, MIXER_SOURCE};
pub use version::{VersionToken, VersionedWorkout};
pub use volume::Volume;
pub use workout::{Workout, WorkoutId, WorkoutStructure, WorkoutSummary};
