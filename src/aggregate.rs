//! Time-bucketed volume and set rollups over the workout log
//!
//! The aggregator is the leaf of the analytics pipeline: the heatmap and
//! trend components both consume its bucket outputs. All sums accumulate in
//! the canonical weight unit with no intermediate rounding; display rounding
//! belongs to the consumer.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{MuscleGroup, WorkoutRecord};

/// A half-open date range `[start, end)` used to scope aggregation.
///
/// The heatmap builder treats its period inclusively instead; see
/// [`crate::heatmap::build_heatmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Period { start, end }
    }

    /// Whether a calendar date falls inside `[start, end)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Aggregation options
///
/// An incomplete set never contributes volume. When `include_incomplete`
/// is set it still counts toward the daily set totals; by default it is
/// excluded from both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    pub include_incomplete: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            include_incomplete: false,
        }
    }
}

/// Bucketed rollup of a workout log over one period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeRollup {
    /// Total volume per local calendar day
    pub daily_volume: BTreeMap<NaiveDate, Decimal>,

    /// Counted sets per local calendar day
    pub daily_sets: BTreeMap<NaiveDate, u32>,

    /// Total volume per exercise across the period
    pub per_exercise_volume: BTreeMap<String, Decimal>,
}

/// Core rollup engine over immutable log snapshots
pub struct VolumeAggregator {
    options: AggregateOptions,
}

impl VolumeAggregator {
    /// Create an aggregator with default options
    pub fn new() -> Self {
        VolumeAggregator {
            options: AggregateOptions::default(),
        }
    }

    /// Create an aggregator with custom options
    pub fn with_options(options: AggregateOptions) -> Self {
        VolumeAggregator { options }
    }

    /// Build daily and per-exercise rollups for records inside the period.
    ///
    /// Records bucket by their local calendar date regardless of
    /// time-of-day. Records with an empty exercise list contribute nothing
    /// and never error; a missing duration is simply absent.
    pub fn aggregate(&self, records: &[WorkoutRecord], period: &Period) -> VolumeRollup {
        let mut rollup = VolumeRollup::default();

        for record in records {
            let date = record.local_date();
            if !period.contains(date) {
                continue;
            }

            for entry in &record.exercises {
                let mut entry_volume = Decimal::ZERO;
                let mut entry_sets = 0u32;

                for set in &entry.sets {
                    if set.completed {
                        entry_volume += set.volume();
                        entry_sets += 1;
                    } else if self.options.include_incomplete {
                        entry_sets += 1;
                    }
                }

                if entry_sets == 0 {
                    continue;
                }

                *rollup.daily_volume.entry(date).or_insert(Decimal::ZERO) += entry_volume;
                *rollup.daily_sets.entry(date).or_insert(0) += entry_sets;
                *rollup
                    .per_exercise_volume
                    .entry(entry.exercise_id.clone())
                    .or_insert(Decimal::ZERO) += entry_volume;
            }
        }

        rollup
    }

    /// Total completed volume per ISO week, keyed `YYYY-Www`, for the
    /// progressive-overload classifier. BTreeMap ordering of the key is
    /// chronological, since the key is zero-padded.
    pub fn weekly_volume(&self, records: &[WorkoutRecord]) -> BTreeMap<String, Decimal> {
        let mut weekly: BTreeMap<String, Decimal> = BTreeMap::new();

        for record in records {
            let week = iso_week_id(record.local_date());
            let volume: Decimal = record
                .exercises
                .iter()
                .map(|e| e.completed_volume())
                .sum();
            *weekly.entry(week).or_insert(Decimal::ZERO) += volume;
        }

        weekly
    }

    /// Most recent instant each muscle group was trained with at least one
    /// completed set. Feeds the recovery advisor.
    pub fn last_trained(
        &self,
        records: &[WorkoutRecord],
    ) -> BTreeMap<MuscleGroup, DateTime<FixedOffset>> {
        let mut last: BTreeMap<MuscleGroup, DateTime<FixedOffset>> = BTreeMap::new();

        for record in records {
            for entry in &record.exercises {
                if entry.completed_sets() == 0 {
                    continue;
                }
                for muscle in &entry.muscle_groups {
                    last.entry(*muscle)
                        .and_modify(|at| {
                            if record.performed_at > *at {
                                *at = record.performed_at;
                            }
                        })
                        .or_insert(record.performed_at);
                }
            }
        }

        last
    }
}

impl Default for VolumeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// ISO week key for a date, e.g. `2026-W07`
pub fn iso_week_id(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
