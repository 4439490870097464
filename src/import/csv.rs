//! Flat CSV workout-log importer
//!
//! One row per set. Rows sharing a workout id are assembled into a single
//! record; within a workout, rows for the same exercise append to one
//! entry in row order.
//!
//! Expected header:
//! `workout_id,performed_at,duration_minutes,template_id,exercise_id,exercise,muscle_groups,weight,reps,completed`
//!
//! `muscle_groups` is a semicolon-separated list. A missing `workout_id`
//! gets a minted identifier, which groups that row alone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ImportError, LiftrsError, Result};
use crate::models::{ExerciseEntry, MuscleGroup, SetEntry, WorkoutRecord};

#[derive(Debug, serde::Deserialize)]
struct SetRow {
    workout_id: Option<String>,
    performed_at: String,
    duration_minutes: Option<u32>,
    template_id: Option<String>,
    exercise_id: String,
    exercise: String,
    muscle_groups: String,
    weight: Decimal,
    reps: u32,
    completed: bool,
}

/// Read a flat per-set CSV file into workout records
pub fn read_workouts(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| parse_error(e.to_string()))?;

    // assembled in first-seen order; finalize sorts chronologically
    let mut records: Vec<WorkoutRecord> = Vec::new();

    for (line, row) in reader.deserialize::<SetRow>().enumerate() {
        let row = row.map_err(|e| parse_error(format!("row {}: {}", line + 2, e)))?;
        let performed_at = parse_datetime(&row.performed_at)?;
        let workout_id = match &row.workout_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => Uuid::new_v4().to_string(),
        };

        let muscle_groups = row
            .muscle_groups
            .split(';')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                MuscleGroup::from_str(s.trim()).map_err(|reason| {
                    LiftrsError::Import(ImportError::InvalidValue {
                        field: "muscle_groups".to_string(),
                        reason,
                    })
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let set = SetEntry {
            weight: row.weight,
            reps: row.reps,
            completed: row.completed,
        };

        let index = match records.iter().position(|r| r.id == workout_id) {
            Some(index) => index,
            None => {
                records.push(WorkoutRecord {
                    id: workout_id,
                    user_id: String::new(),
                    performed_at,
                    duration_minutes: row.duration_minutes,
                    template_id: row.template_id.filter(|t| !t.is_empty()),
                    exercises: Vec::new(),
                });
                records.len() - 1
            }
        };
        let record = &mut records[index];

        match record
            .exercises
            .iter_mut()
            .find(|e| e.exercise_id == row.exercise_id)
        {
            Some(entry) => entry.sets.push(set),
            None => record.exercises.push(ExerciseEntry {
                exercise_id: row.exercise_id,
                name: row.exercise,
                muscle_groups,
                sets: vec![set],
            }),
        }
    }

    super::finalize(records)
}

/// Parse a datetime, trying offset-aware formats first, then naive
/// formats assumed UTC
fn parse_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }

    let offset_formats = ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%z"];
    for format in &offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];
    for format in &naive_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    Err(parse_error(format!("Unable to parse datetime: {}", value)))
}

fn parse_error(reason: String) -> LiftrsError {
    LiftrsError::Import(ImportError::ParseError {
        format: "csv".to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const HEADER: &str = "workout_id,performed_at,duration_minutes,template_id,exercise_id,exercise,muscle_groups,weight,reps,completed\n";

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_rows_assemble_into_records() {
        let file = write_csv(concat!(
            "w1,2026-02-03T18:30:00+01:00,55,push,bench,Bench Press,Chest;Triceps,80,8,true\n",
            "w1,2026-02-03T18:30:00+01:00,55,push,bench,Bench Press,Chest;Triceps,80,7,true\n",
            "w1,2026-02-03T18:30:00+01:00,55,push,ohp,Overhead Press,Shoulders,40,10,true\n",
            "w2,2026-02-05T07:10:00+01:00,,,squat,Squat,Quads,100,5,true\n",
        ));

        let records = read_workouts(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "w1");
        assert_eq!(records[0].exercises.len(), 2);
        assert_eq!(records[0].exercises[0].sets.len(), 2);
        assert_eq!(records[0].duration_minutes, Some(55));
        assert_eq!(records[1].duration_minutes, None);
        assert_eq!(records[1].template_id, None);
        assert_eq!(records[1].exercises[0].sets[0].weight, dec!(100));
    }

    #[test]
    fn test_naive_datetime_assumed_utc() {
        let file = write_csv("w1,2026-02-03 18:30:00,,,bench,Bench Press,Chest,80,8,true\n");

        let records = read_workouts(file.path()).unwrap();
        assert_eq!(records[0].performed_at.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_unknown_muscle_group_is_rejected() {
        let file = write_csv("w1,2026-02-03T18:30:00+01:00,,,bench,Bench Press,Neck,80,8,true\n");

        let err = read_workouts(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LiftrsError::Import(ImportError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_datetime_is_rejected() {
        let file = write_csv("w1,someday,,,bench,Bench Press,Chest,80,8,true\n");
        assert!(read_workouts(file.path()).is_err());
    }

    #[test]
    fn test_missing_workout_id_mints_one() {
        let file = write_csv(",2026-02-03T18:30:00+01:00,,,bench,Bench Press,Chest,80,8,true\n");

        let records = read_workouts(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].id.is_empty());
    }

    #[test]
    fn test_output_is_sorted_chronologically() {
        let file = write_csv(concat!(
            "w2,2026-02-05T07:10:00+01:00,,,squat,Squat,Quads,100,5,true\n",
            "w1,2026-02-03T18:30:00+01:00,,,bench,Bench Press,Chest,80,8,true\n",
        ));

        let records = read_workouts(file.path()).unwrap();
        assert_eq!(records[0].id, "w1");
        assert_eq!(records[1].id, "w2");
    }
}
