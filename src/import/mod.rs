//! Workout-log ingestion
//!
//! The engine consumes plain data snapshots; these importers produce them
//! from JSON or flat CSV files, enforce the model invariants at the
//! boundary, and hand back a chronologically sorted log.

pub mod csv;
pub mod json;

use std::path::Path;
use tracing::debug;

use crate::error::{ImportError, LiftrsError, Result};
use crate::models::WorkoutRecord;

/// Supported log file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Detect format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => Ok(ImportFormat::Json),
            Some("csv") => Ok(ImportFormat::Csv),
            other => Err(LiftrsError::Import(ImportError::UnsupportedFormat {
                format: other.unwrap_or("<none>").to_string(),
            })),
        }
    }
}

/// Import a workout log, dispatching on the file extension.
///
/// The returned records are validated, stripped of empty exercise
/// entries, and sorted ascending by timestamp, ready for every engine
/// component including the order-sensitive record detector.
pub fn import_workouts(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let records = match ImportFormat::from_path(path)? {
        ImportFormat::Json => json::read_workouts(path)?,
        ImportFormat::Csv => csv::read_workouts(path)?,
    };
    debug!(count = records.len(), file = %path.display(), "Imported workout log");
    Ok(records)
}

/// Validate model invariants and drop entries with no sets.
///
/// Returns the cleaned record or the first violated invariant.
pub(crate) fn clean_record(mut record: WorkoutRecord) -> Result<WorkoutRecord> {
    for entry in &record.exercises {
        for set in &entry.sets {
            if set.weight.is_sign_negative() {
                return Err(LiftrsError::Import(ImportError::InvalidValue {
                    field: format!("{}.weight", entry.exercise_id),
                    reason: format!("negative weight {}", set.weight),
                }));
            }
            if set.reps == 0 {
                return Err(LiftrsError::Import(ImportError::InvalidValue {
                    field: format!("{}.reps", entry.exercise_id),
                    reason: "repetition count must be positive".to_string(),
                }));
            }
        }
    }
    record.exercises.retain(|entry| !entry.sets.is_empty());
    Ok(record)
}

/// Final pass shared by both importers: clean every record, then sort
pub(crate) fn finalize(records: Vec<WorkoutRecord>) -> Result<Vec<WorkoutRecord>> {
    let mut cleaned = records
        .into_iter()
        .map(clean_record)
        .collect::<Result<Vec<_>>>()?;
    cleaned.sort_by_key(|r| r.performed_at);
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseEntry, MuscleGroup, SetEntry};
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn record(id: &str, day: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            performed_at: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 7, day, 9, 0, 0)
                .unwrap(),
            duration_minutes: None,
            template_id: None,
            exercises: vec![ExerciseEntry {
                exercise_id: "row".to_string(),
                name: "Barbell Row".to_string(),
                muscle_groups: vec![MuscleGroup::Back],
                sets: vec![SetEntry {
                    weight: dec!(60),
                    reps: 10,
                    completed: true,
                }],
            }],
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImportFormat::from_path(Path::new("log.json")).unwrap(),
            ImportFormat::Json
        );
        assert_eq!(
            ImportFormat::from_path(Path::new("log.CSV")).unwrap(),
            ImportFormat::Csv
        );
        assert!(ImportFormat::from_path(Path::new("log.xml")).is_err());
    }

    #[test]
    fn test_finalize_sorts_chronologically() {
        let records = vec![record("w2", 9), record("w1", 3)];
        let sorted = finalize(records).unwrap();
        assert_eq!(sorted[0].id, "w1");
        assert_eq!(sorted[1].id, "w2");
    }

    #[test]
    fn test_clean_drops_empty_entries() {
        let mut r = record("w1", 1);
        r.exercises.push(ExerciseEntry {
            exercise_id: "curl".to_string(),
            name: "Curl".to_string(),
            muscle_groups: vec![MuscleGroup::Biceps],
            sets: Vec::new(),
        });

        let cleaned = clean_record(r).unwrap();
        assert_eq!(cleaned.exercises.len(), 1);
    }

    #[test]
    fn test_clean_rejects_invalid_sets() {
        let mut r = record("w1", 1);
        r.exercises[0].sets[0].reps = 0;
        assert!(clean_record(r).is_err());

        let mut r = record("w2", 1);
        r.exercises[0].sets[0].weight = dec!(-10);
        assert!(clean_record(r).is_err());
    }
}
