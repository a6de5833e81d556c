use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::volume::Volume;

/// Seconds assumed per repetition when estimating rep-based work
const SECONDS_PER_REP: u64 = 3;

/// How an exercise is measured
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseKind {
    /// Rep-based, e.g. 3 x 10 squats, optionally with a time cap or a
    /// distance per rep (10 x 20m shuttles)
    Reps {
        sets: Option<u32>,
        reps: u32,
        duration_sec: Option<u32>,
        distance_m: Option<f64>,
    },
    /// Time-based, e.g. 3 x 45s plank
    Timed { sets: Option<u32>, duration_sec: u32 },
    /// Distance-based, optionally repeated and with a target time
    Distance {
        sets: Option<u32>,
        distance_m: f64,
        duration_sec: Option<u32>,
    },
    /// Nothing measurable recorded yet
    Unspecified { sets: Option<u32> },
}

impl ExerciseKind {
    fn sets(&self) -> Option<u32> {
        match self {
            ExerciseKind::Reps { sets, .. }
            | ExerciseKind::Timed { sets, .. }
            | ExerciseKind::Distance { sets, .. }
            | ExerciseKind::Unspecified { sets } => *sets,
        }
    }
}

/// A single exercise inside a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExerciseRecord", into = "ExerciseRecord")]
pub struct Exercise {
    pub name: String,
    pub kind: ExerciseKind,
    /// Free-form load, e.g. "24kg" or "bodyweight"
    pub load: Option<String>,
    /// Exercise category ("strength", "cardio", ...)
    pub category: Option<String>,
    /// Rest after each set
    pub rest_sec: Option<u32>,
    pub notes: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, kind: ExerciseKind) -> Self {
        Self {
            name: name.into(),
            kind,
            load: None,
            category: None,
            rest_sec: None,
            notes: None,
        }
    }

    pub fn reps(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self::new(
            name,
            ExerciseKind::Reps {
                sets: Some(sets),
                reps,
                duration_sec: None,
                distance_m: None,
            },
        )
    }

    pub fn timed(name: impl Into<String>, duration_sec: u32) -> Self {
        Self::new(
            name,
            ExerciseKind::Timed {
                sets: None,
                duration_sec,
            },
        )
    }

    pub fn distance(name: impl Into<String>, distance_m: f64) -> Self {
        Self::new(
            name,
            ExerciseKind::Distance {
                sets: None,
                distance_m,
                duration_sec: None,
            },
        )
    }

    pub fn with_load(mut self, load: impl Into<String>) -> Self {
        self.load = Some(load.into());
        self
    }

    pub fn with_rest(mut self, rest_sec: u32) -> Self {
        self.rest_sec = Some(rest_sec);
        self
    }

    /// Whether the exercise carries enough to be performed
    /// (sets and reps, a duration, or a distance)
    pub fn is_executable(&self) -> bool {
        match &self.kind {
            ExerciseKind::Reps { sets, .. } => sets.is_some(),
            ExerciseKind::Timed { .. } | ExerciseKind::Distance { .. } => true,
            ExerciseKind::Unspecified { .. } => false,
        }
    }

    /// Total rest between sets (none after the last one)
    fn rest_between_sets(&self, sets: u32) -> u64 {
        u64::from(self.rest_sec.unwrap_or(0)) * u64::from(sets.saturating_sub(1))
    }
}

impl Volume for Exercise {
    fn describe_volume(&self) -> String {
        match &self.kind {
            ExerciseKind::Reps {
                sets: Some(sets),
                reps,
                ..
            } => format!("{} x {}", sets, reps),
            ExerciseKind::Reps {
                sets: None, reps, ..
            } => format!("{} reps", reps),
            ExerciseKind::Timed {
                sets: Some(sets),
                duration_sec,
            } => format!("{} x {}s", sets, duration_sec),
            ExerciseKind::Timed {
                sets: None,
                duration_sec,
            } => format!("{}s", duration_sec),
            ExerciseKind::Distance {
                sets,
                distance_m,
                duration_sec,
            } => {
                let mut volume = match sets {
                    Some(sets) => format!("{} x {}m", sets, distance_m),
                    None => format!("{}m", distance_m),
                };
                if let Some(secs) = duration_sec {
                    volume.push_str(&format!(" in {}s", secs));
                }
                volume
            }
            ExerciseKind::Unspecified { sets: Some(sets) } => format!("{} sets", sets),
            ExerciseKind::Unspecified { sets: None } => "unspecified".to_string(),
        }
    }

    fn estimate_duration(&self) -> Option<Duration> {
        let sets = self.kind.sets().unwrap_or(1).max(1);
        let secs = match &self.kind {
            ExerciseKind::Reps { reps, .. } => {
                u64::from(sets) * u64::from(*reps) * SECONDS_PER_REP
                    + self.rest_between_sets(sets)
            }
            ExerciseKind::Timed { duration_sec, .. } => {
                u64::from(sets) * u64::from(*duration_sec) + self.rest_between_sets(sets)
            }
            ExerciseKind::Distance { duration_sec, .. } => {
                u64::from(sets) * u64::from((*duration_sec)?) + self.rest_between_sets(sets)
            }
            ExerciseKind::Unspecified { .. } => return None,
        };
        Some(Duration::from_secs(secs))
    }
}

/// Wire shape of an exercise: a flat record of optional fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExerciseRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_sec: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rest_sec: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl From<ExerciseRecord> for Exercise {
    fn from(record: ExerciseRecord) -> Self {
        // reps win over distance, distance over duration; the other
        // measures ride along so nothing on the record is lost
        let kind = match (record.reps, record.distance_m, record.duration_sec) {
            (Some(reps), distance_m, duration_sec) => ExerciseKind::Reps {
                sets: record.sets,
                reps,
                duration_sec,
                distance_m,
            },
            (None, Some(distance_m), duration_sec) => ExerciseKind::Distance {
                sets: record.sets,
                distance_m,
                duration_sec,
            },
            (None, None, Some(duration_sec)) => ExerciseKind::Timed {
                sets: record.sets,
                duration_sec,
            },
            (None, None, None) => ExerciseKind::Unspecified { sets: record.sets },
        };

        Self {
            name: record.name,
            kind,
            load: record.load,
            category: record.category,
            rest_sec: record.rest_sec,
            notes: record.notes,
        }
    }
}

impl From<Exercise> for ExerciseRecord {
    fn from(exercise: Exercise) -> Self {
        let mut record = ExerciseRecord {
            name: exercise.name,
            load: exercise.load,
            category: exercise.category,
            rest_sec: exercise.rest_sec,
            notes: exercise.notes,
            ..Default::default()
        };

        match exercise.kind {
            ExerciseKind::Reps {
                sets,
                reps,
                duration_sec,
                distance_m,
            } => {
                record.sets = sets;
                record.reps = Some(reps);
                record.duration_sec = duration_sec;
                record.distance_m = distance_m;
            }
            ExerciseKind::Timed { sets, duration_sec } => {
                record.sets = sets;
                record.duration_sec = Some(duration_sec);
            }
            ExerciseKind::Distance {
                sets,
                distance_m,
                duration_sec,
            } => {
                record.sets = sets;
                record.distance_m = Some(distance_m);
                record.duration_sec = duration_sec;
            }
            ExerciseKind::Unspecified { sets } => record.sets = sets,
        }

        record
    }
}
