use chrono::{DateTime, FixedOffset, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Primary muscle groups used to tag exercises and schedule days
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Core,
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::Core => "Core",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chest" => Ok(MuscleGroup::Chest),
            "back" | "lats" => Ok(MuscleGroup::Back),
            "shoulders" | "delts" => Ok(MuscleGroup::Shoulders),
            "biceps" => Ok(MuscleGroup::Biceps),
            "triceps" => Ok(MuscleGroup::Triceps),
            "forearms" => Ok(MuscleGroup::Forearms),
            "quads" | "quadriceps" => Ok(MuscleGroup::Quads),
            "hamstrings" | "hams" => Ok(MuscleGroup::Hamstrings),
            "glutes" => Ok(MuscleGroup::Glutes),
            "calves" => Ok(MuscleGroup::Calves),
            "core" | "abs" => Ok(MuscleGroup::Core),
            _ => Err(format!("Unknown muscle group: {}", s)),
        }
    }
}

/// A single logged set within an exercise entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Weight lifted in kilograms (canonical unit, non-negative)
    pub weight: Decimal,

    /// Repetition count (positive)
    pub reps: u32,

    /// Whether the set was actually completed as logged
    pub completed: bool,
}

impl SetEntry {
    /// Volume of the set: weight × reps.
    ///
    /// Bodyweight sets logged with zero weight contribute zero volume;
    /// whether a bodyweight substitute should apply is an open product
    /// question and is deliberately not answered here.
    pub fn volume(&self) -> Decimal {
        self.weight * Decimal::from(self.reps)
    }
}

/// One exercise performed within a workout, with its ordered sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Stable exercise identifier
    pub exercise_id: String,

    /// Display name, denormalized at logging time
    pub name: String,

    /// Primary muscle groups trained by this exercise
    pub muscle_groups: Vec<MuscleGroup>,

    /// Ordered sets; entries with no sets are dropped upstream
    pub sets: Vec<SetEntry>,
}

impl ExerciseEntry {
    /// Sum of completed-set volume for this entry
    pub fn completed_volume(&self) -> Decimal {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .map(SetEntry::volume)
            .sum()
    }

    /// Number of completed sets
    pub fn completed_sets(&self) -> u32 {
        self.sets.iter().filter(|s| s.completed).count() as u32
    }
}

/// A logged training session
///
/// Records are immutable once created; user corrections replace the record
/// wholesale through the persistence layer, which is why every derived
/// metric in this crate is recomputed from the log rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Unique identifier for the workout
    pub id: String,

    /// Owner identifier; logs arrive already scoped to one user
    pub user_id: String,

    /// Start instant with the user's local offset preserved, so the
    /// session buckets to the calendar day it occurred on
    pub performed_at: DateTime<FixedOffset>,

    /// Session duration in minutes, if tracked
    pub duration_minutes: Option<u32>,

    /// Template this workout was started from, if any
    pub template_id: Option<String>,

    /// Ordered exercises performed
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutRecord {
    /// Local calendar date of the session, used as the aggregation bucket key
    pub fn local_date(&self) -> NaiveDate {
        self.performed_at.date_naive()
    }
}

/// A planned exercise inside a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub exercise_id: String,
    pub name: String,
    pub muscle_groups: Vec<MuscleGroup>,
    pub target_sets: u32,
    pub target_reps: u32,
}

/// A reusable workout plan referenced by schedule days and started workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub exercises: Vec<PlannedExercise>,
}

impl Template {
    /// Union of muscle groups across all planned exercises
    pub fn muscle_groups(&self) -> BTreeSet<MuscleGroup> {
        self.exercises
            .iter()
            .flat_map(|e| e.muscle_groups.iter().copied())
            .collect()
    }
}

/// One day slot within a schedule week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// Weekday this slot belongs to
    pub weekday: Weekday,

    /// Assigned template; `None` marks a rest day
    pub template_id: Option<String>,

    /// Muscle groups of the assigned template, denormalized
    pub muscle_groups: Vec<MuscleGroup>,

    /// Whether the planned workout was completed
    pub completed: bool,

    /// Reference to the completed workout, once linked
    pub workout_id: Option<String>,
}

impl ScheduleDay {
    /// A day with no assigned template is a rest day and is never
    /// counted as missed
    pub fn is_rest_day(&self) -> bool {
        self.template_id.is_none()
    }
}

/// A week of scheduled training, Monday-start per ISO 8601
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWeek {
    /// ISO week key, e.g. `2026-W32`
    pub id: String,

    /// Exactly seven day slots, Monday first
    pub days: Vec<ScheduleDay>,
}

impl ScheduleWeek {
    /// Refuse a malformed week loudly: exactly seven slots are required.
    ///
    /// A missing slot is a caller contract violation, never silently
    /// worked around.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.days.len() != 7 {
            return Err(crate::error::LiftrsError::InvalidInput(format!(
                "schedule week {} has {} day slots, expected 7",
                self.id,
                self.days.len()
            )));
        }
        Ok(())
    }

    /// Number of days with an assigned template
    pub fn planned_days(&self) -> usize {
        self.days.iter().filter(|d| !d.is_rest_day()).count()
    }

    /// Number of planned days marked completed
    pub fn completed_days(&self) -> usize {
        self.days
            .iter()
            .filter(|d| !d.is_rest_day() && d.completed)
            .count()
    }
}

/// Personal-record categories
///
/// Each variant carries the comparison key it was evaluated under, so a
/// record event is reproducible without re-scanning the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    /// Best weight at a fixed rep count
    Weight { reps: u32 },
    /// Best single-exercise volume within one workout
    Volume,
    /// Best rep count at a fixed weight
    Reps { weight: Decimal },
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Weight { reps } => write!(f, "weight @ {} reps", reps),
            RecordKind::Volume => write!(f, "volume"),
            RecordKind::Reps { weight } => write!(f, "reps @ {} kg", weight),
        }
    }
}

/// A derived personal-record event
///
/// Never persisted as the source of truth; always recomputed from the
/// current log snapshot so edits to historical sets cannot cause drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_id: String,

    /// Display name denormalized from the producing entry
    pub exercise_name: String,

    pub kind: RecordKind,

    /// New best value (kilograms, volume, or reps depending on kind)
    pub value: Decimal,

    /// Baseline that was beaten
    pub previous: Decimal,

    /// Percentage improvement over the previous baseline
    pub pct_change: Decimal,

    /// Start instant of the workout that produced the record
    pub achieved_at: DateTime<FixedOffset>,

    /// Workout the record was set in
    pub workout_id: String,
}

/// Recovery tiers for a muscle group relative to its recovery window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryTier {
    Recovered,
    Recovering,
    Fatigued,
}

impl fmt::Display for RecoveryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryTier::Recovered => write!(f, "Recovered"),
            RecoveryTier::Recovering => write!(f, "Recovering"),
            RecoveryTier::Fatigued => write!(f, "Fatigued"),
        }
    }
}

/// Recovery state of one muscle group at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStatus {
    pub muscle: MuscleGroup,

    /// Whole hours since the muscle was last trained
    pub hours_since: i64,

    pub tier: RecoveryTier,
}
