use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use proptest::prelude::*;
use rust_decimal::Decimal;

use liftrs::aggregate::{Period, VolumeAggregator};
use liftrs::heatmap::build_heatmap;
use liftrs::models::{ExerciseEntry, MuscleGroup, RecordKind, SetEntry, WorkoutRecord};
use liftrs::prs::PrDetector;
use liftrs::trend::{duration_points, fit_duration_trend};

/// Property tests over randomly generated logs

fn origin() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
        .unwrap()
}

/// A workout some hours after the origin with one squat entry
fn workout_after(hours: i64, weight: u32, reps: u32, duration: Option<u32>) -> WorkoutRecord {
    WorkoutRecord {
        id: format!("w{}", hours),
        user_id: "u1".to_string(),
        performed_at: origin() + Duration::hours(hours),
        duration_minutes: duration,
        template_id: None,
        exercises: vec![ExerciseEntry {
            exercise_id: "squat".to_string(),
            name: "Squat".to_string(),
            muscle_groups: vec![MuscleGroup::Quads],
            sets: vec![SetEntry {
                weight: Decimal::from(weight),
                reps,
                completed: true,
            }],
        }],
    }
}

prop_compose! {
    /// Strictly increasing hour offsets keep the log chronological
    fn chronological_log()(
        raw in prop::collection::vec((1u32..72, 20u32..200, 1u32..15, prop::option::of(20u32..120)), 0..40)
    ) -> Vec<WorkoutRecord> {
        let mut hours = 0i64;
        raw.into_iter()
            .map(|(gap, weight, reps, duration)| {
                hours += gap as i64;
                workout_after(hours, weight, reps, duration)
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn aggregate_is_idempotent(records in chronological_log()) {
        let aggregator = VolumeAggregator::new();
        let period = Period::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        );
        prop_assert_eq!(
            aggregator.aggregate(&records, &period),
            aggregator.aggregate(&records, &period)
        );
    }

    #[test]
    fn heatmap_covers_every_day_exactly_once(
        records in chronological_log(),
        span in 0u64..120,
    ) {
        let aggregator = VolumeAggregator::new();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = start + Duration::days(span as i64);
        let rollup = aggregator.aggregate(&records, &Period::new(start, end + Duration::days(1)));

        let cells = build_heatmap(&rollup.daily_volume, &Period::new(start, end));

        prop_assert_eq!(cells.len() as u64, span + 1);
        // unique, ascending, gap-free
        for pair in cells.windows(2) {
            prop_assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
        }
        // zero volume is level 0 and non-zero volume never is
        for cell in &cells {
            if cell.volume.is_zero() {
                prop_assert_eq!(cell.level, 0);
            } else {
                prop_assert!(cell.level >= 1 && cell.level <= 4);
            }
        }
    }

    #[test]
    fn weight_pr_replay_is_strictly_increasing(records in chronological_log()) {
        let prs = PrDetector::detect_prs(&records).unwrap();

        // per rep count, emitted weight records only ever go up
        for reps in 1u32..15 {
            let weights: Vec<Decimal> = prs
                .iter()
                .filter(|pr| pr.kind == (RecordKind::Weight { reps }))
                .map(|pr| pr.value)
                .collect();
            prop_assert!(weights.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn pr_detection_is_idempotent(records in chronological_log()) {
        prop_assert_eq!(
            PrDetector::detect_prs(&records).unwrap(),
            PrDetector::detect_prs(&records).unwrap()
        );
    }

    #[test]
    fn every_pr_beats_its_baseline(records in chronological_log()) {
        let prs = PrDetector::detect_prs(&records).unwrap();
        for pr in &prs {
            prop_assert!(pr.value > pr.previous);
            prop_assert!(pr.pct_change > Decimal::ZERO);
        }
    }

    #[test]
    fn trend_fit_never_panics_and_is_deterministic(records in chronological_log()) {
        let points = duration_points(&records);
        let line = fit_duration_trend(&points);
        prop_assert_eq!(&line, &fit_duration_trend(&points));
        // a fit over n <= 1 points is flat by contract
        if points.len() <= 1 {
            prop_assert_eq!(line.slope, Decimal::ZERO);
        }
    }
}
