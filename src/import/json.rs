//! JSON workout-log and schedule importers

use std::fs;
use std::path::Path;

use crate::error::{ImportError, LiftrsError, Result};
use crate::models::{ScheduleWeek, WorkoutRecord};

/// Read a workout log serialized as a JSON array of records
pub fn read_workouts(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let content = fs::read_to_string(path)?;
    let records: Vec<WorkoutRecord> =
        serde_json::from_str(&content).map_err(|e| {
            LiftrsError::Import(ImportError::ParseError {
                format: "json".to_string(),
                reason: e.to_string(),
            })
        })?;
    super::finalize(records)
}

/// Read schedule weeks serialized as a JSON array
pub fn read_schedule(path: &Path) -> Result<Vec<ScheduleWeek>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        LiftrsError::Import(ImportError::ParseError {
            format: "json".to_string(),
            reason: e.to_string(),
        })
    })
}
