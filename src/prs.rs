//! Personal-record detection over the chronological workout log
//!
//! A single forward pass maintains three running baselines per exercise:
//! best weight for each distinct rep count, best reps at each distinct
//! weight, and best single-workout volume. A record fires only on a strict
//! improvement; ties never fire, and the first observation of a key seeds
//! its baseline silently.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{LiftrsError, Result};
use crate::models::{PersonalRecord, RecordKind, WorkoutRecord};
use crate::trend::percentage_change;

/// Running baselines for one exercise
#[derive(Debug, Default)]
struct ExerciseBaselines {
    /// Best weight seen per distinct rep count
    weight_at_reps: BTreeMap<u32, Decimal>,

    /// Best rep count seen per distinct weight
    reps_at_weight: BTreeMap<Decimal, u32>,

    /// Best single-workout volume
    best_volume: Option<Decimal>,
}

/// Per-exercise volume accumulated while scanning one workout
#[derive(Debug)]
struct WorkoutVolume {
    exercise_name: String,
    volume: Decimal,
}

/// Chronological personal-record scanner
pub struct PrDetector;

impl PrDetector {
    /// Scan the log and emit every personal-record event in order.
    ///
    /// Records must already be sorted ascending by timestamp; the detector
    /// validates and refuses unsorted input rather than silently producing
    /// wrong baselines. Only completed sets are eligible. Baselines update
    /// immediately, so a later set in the same session can set a record
    /// over an earlier one.
    pub fn detect_prs(records: &[WorkoutRecord]) -> Result<Vec<PersonalRecord>> {
        Self::ensure_chronological(records)?;

        let mut baselines: BTreeMap<String, ExerciseBaselines> = BTreeMap::new();
        let mut prs = Vec::new();

        for record in records {
            // volume accumulates across all of the workout's entries for an
            // exercise and is judged against prior workouts only
            let mut workout_volume: BTreeMap<String, WorkoutVolume> = BTreeMap::new();

            for entry in &record.exercises {
                let state = baselines.entry(entry.exercise_id.clone()).or_default();

                for set in &entry.sets {
                    if !set.completed {
                        continue;
                    }

                    match state.weight_at_reps.get(&set.reps).copied() {
                        Some(best) if set.weight > best => {
                            prs.push(PersonalRecord {
                                exercise_id: entry.exercise_id.clone(),
                                exercise_name: entry.name.clone(),
                                kind: RecordKind::Weight { reps: set.reps },
                                value: set.weight,
                                previous: best,
                                pct_change: percentage_change(best, set.weight),
                                achieved_at: record.performed_at,
                                workout_id: record.id.clone(),
                            });
                            state.weight_at_reps.insert(set.reps, set.weight);
                        }
                        Some(_) => {}
                        None => {
                            state.weight_at_reps.insert(set.reps, set.weight);
                        }
                    }

                    match state.reps_at_weight.get(&set.weight).copied() {
                        Some(best) if set.reps > best => {
                            prs.push(PersonalRecord {
                                exercise_id: entry.exercise_id.clone(),
                                exercise_name: entry.name.clone(),
                                kind: RecordKind::Reps { weight: set.weight },
                                value: Decimal::from(set.reps),
                                previous: Decimal::from(best),
                                pct_change: percentage_change(
                                    Decimal::from(best),
                                    Decimal::from(set.reps),
                                ),
                                achieved_at: record.performed_at,
                                workout_id: record.id.clone(),
                            });
                            state.reps_at_weight.insert(set.weight, set.reps);
                        }
                        Some(_) => {}
                        None => {
                            state.reps_at_weight.insert(set.weight, set.reps);
                        }
                    }

                    workout_volume
                        .entry(entry.exercise_id.clone())
                        .and_modify(|wv| wv.volume += set.volume())
                        .or_insert(WorkoutVolume {
                            exercise_name: entry.name.clone(),
                            volume: set.volume(),
                        });
                }
            }

            for (exercise_id, wv) in workout_volume {
                let state = baselines.entry(exercise_id.clone()).or_default();
                match state.best_volume {
                    Some(best) if wv.volume > best => {
                        prs.push(PersonalRecord {
                            exercise_id,
                            exercise_name: wv.exercise_name,
                            kind: RecordKind::Volume,
                            value: wv.volume,
                            previous: best,
                            pct_change: percentage_change(best, wv.volume),
                            achieved_at: record.performed_at,
                            workout_id: record.id.clone(),
                        });
                        state.best_volume = Some(wv.volume);
                    }
                    Some(_) => {}
                    None => {
                        state.best_volume = Some(wv.volume);
                    }
                }
            }
        }

        Ok(prs)
    }

    /// Refuse out-of-order input loudly; the caller owns ordering
    fn ensure_chronological(records: &[WorkoutRecord]) -> Result<()> {
        for pair in records.windows(2) {
            if pair[1].performed_at < pair[0].performed_at {
                return Err(LiftrsError::InvalidInput(format!(
                    "workout records must be sorted chronologically: {} ({}) precedes {} ({})",
                    pair[1].id, pair[1].performed_at, pair[0].id, pair[0].performed_at
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseEntry, MuscleGroup, SetEntry};
    use chrono::{DateTime, FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 5, day, 18, 0, 0)
            .unwrap()
    }

    fn squat_workout(id: &str, day: u32, sets: Vec<(Decimal, u32, bool)>) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            performed_at: at(day),
            duration_minutes: Some(60),
            template_id: None,
            exercises: vec![ExerciseEntry {
                exercise_id: "squat".to_string(),
                name: "Squat".to_string(),
                muscle_groups: vec![MuscleGroup::Quads],
                sets: sets
                    .into_iter()
                    .map(|(weight, reps, completed)| SetEntry {
                        weight,
                        reps,
                        completed,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_first_observation_seeds_without_firing() {
        let records = vec![squat_workout("w1", 1, vec![(dec!(100), 5, true)])];
        let prs = PrDetector::detect_prs(&records).unwrap();
        assert!(prs.is_empty());
    }

    #[test]
    fn test_weight_pr_at_rep_count() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 3, vec![(dec!(105), 5, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let weight_prs: Vec<_> = prs
            .iter()
            .filter(|pr| matches!(pr.kind, RecordKind::Weight { .. }))
            .collect();
        assert_eq!(weight_prs.len(), 1);
        assert_eq!(weight_prs[0].value, dec!(105));
        assert_eq!(weight_prs[0].previous, dec!(100));
        assert_eq!(weight_prs[0].kind, RecordKind::Weight { reps: 5 });
        assert_eq!(weight_prs[0].workout_id, "w2");
    }

    #[test]
    fn test_tie_does_not_fire() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 3, vec![(dec!(100), 5, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();
        assert!(prs
            .iter()
            .all(|pr| !matches!(pr.kind, RecordKind::Weight { .. })));
    }

    #[test]
    fn test_distinct_rep_counts_have_independent_baselines() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(120), 3, true)]),
            // lighter weight but at a new rep count: seeds, no record
            squat_workout("w2", 3, vec![(dec!(100), 8, true)]),
            squat_workout("w3", 5, vec![(dec!(102.5), 8, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let weight_prs: Vec<_> = prs
            .iter()
            .filter(|pr| matches!(pr.kind, RecordKind::Weight { .. }))
            .collect();
        assert_eq!(weight_prs.len(), 1);
        assert_eq!(weight_prs[0].kind, RecordKind::Weight { reps: 8 });
        assert_eq!(weight_prs[0].value, dec!(102.5));
    }

    #[test]
    fn test_reps_pr_at_weight() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 3, vec![(dec!(100), 7, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let reps_prs: Vec<_> = prs
            .iter()
            .filter(|pr| matches!(pr.kind, RecordKind::Reps { .. }))
            .collect();
        assert_eq!(reps_prs.len(), 1);
        assert_eq!(reps_prs[0].value, dec!(7));
        assert_eq!(reps_prs[0].previous, dec!(5));
        assert_eq!(reps_prs[0].pct_change, dec!(40));
    }

    #[test]
    fn test_volume_pr_worked_example() {
        // 3x8@100 (2400) then 4x8@100 (3200): one volume PR, +33.3%
        let records = vec![
            squat_workout(
                "w1",
                1,
                vec![
                    (dec!(100), 8, true),
                    (dec!(100), 8, true),
                    (dec!(100), 8, true),
                ],
            ),
            squat_workout(
                "w2",
                8,
                vec![
                    (dec!(100), 8, true),
                    (dec!(100), 8, true),
                    (dec!(100), 8, true),
                    (dec!(100), 8, true),
                ],
            ),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let volume_prs: Vec<_> = prs
            .iter()
            .filter(|pr| pr.kind == RecordKind::Volume)
            .collect();
        assert_eq!(volume_prs.len(), 1);
        assert_eq!(volume_prs[0].previous, dec!(2400));
        assert_eq!(volume_prs[0].value, dec!(3200));
        assert_eq!(volume_prs[0].pct_change.round_dp(1), dec!(33.3));
    }

    #[test]
    fn test_same_session_set_can_pr_over_earlier_set() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 3, vec![(dec!(105), 5, true), (dec!(110), 5, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let weight_prs: Vec<_> = prs
            .iter()
            .filter(|pr| matches!(pr.kind, RecordKind::Weight { .. }))
            .collect();
        assert_eq!(weight_prs.len(), 2);
        assert_eq!(weight_prs[0].value, dec!(105));
        assert_eq!(weight_prs[1].value, dec!(110));
        assert_eq!(weight_prs[1].previous, dec!(105));
    }

    #[test]
    fn test_incomplete_sets_are_ineligible() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 3, vec![(dec!(150), 5, false)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();
        assert!(prs.is_empty());
    }

    #[test]
    fn test_unsorted_input_is_refused() {
        let records = vec![
            squat_workout("w2", 3, vec![(dec!(105), 5, true)]),
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
        ];

        let err = PrDetector::detect_prs(&records).unwrap_err();
        assert!(matches!(err, LiftrsError::InvalidInput(_)));
        assert!(err.to_string().contains("sorted"));
    }

    #[test]
    fn test_equal_timestamps_are_accepted() {
        // same-instant records are not "out of order"
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 1, vec![(dec!(101), 5, true)]),
        ];

        assert!(PrDetector::detect_prs(&records).is_ok());
    }

    #[test]
    fn test_weight_pr_sequence_is_strictly_increasing() {
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(100), 5, true)]),
            squat_workout("w2", 3, vec![(dec!(105), 5, true)]),
            squat_workout("w3", 5, vec![(dec!(103), 5, true)]),
            squat_workout("w4", 7, vec![(dec!(110), 5, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let weights: Vec<Decimal> = prs
            .iter()
            .filter(|pr| pr.kind == (RecordKind::Weight { reps: 5 }))
            .map(|pr| pr.value)
            .collect();
        assert_eq!(weights, vec![dec!(105), dec!(110)]);
        assert!(weights.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_weight_baseline_pct_guard() {
        // bodyweight sets seed a zero-volume baseline; the first loaded
        // session reads as a 100% improvement, not a division by zero
        let records = vec![
            squat_workout("w1", 1, vec![(dec!(0), 10, true)]),
            squat_workout("w2", 3, vec![(dec!(20), 10, true)]),
        ];

        let prs = PrDetector::detect_prs(&records).unwrap();

        let volume_pr = prs
            .iter()
            .find(|pr| pr.kind == RecordKind::Volume)
            .unwrap();
        assert_eq!(volume_pr.previous, dec!(0));
        assert_eq!(volume_pr.pct_change, dec!(100));
    }
}
