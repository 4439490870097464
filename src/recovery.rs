//! Muscle recovery advisories over the weekly schedule
//!
//! Classifies each muscle group against a fixed recovery-hour table and
//! annotates schedule weeks with advisory warnings. The advisor never
//! blocks an assignment; it only annotates.

use chrono::{DateTime, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::Result;
use crate::models::{MuscleGroup, RecoveryStatus, RecoveryTier, ScheduleWeek};

/// Recovery windows in hours per muscle group.
///
/// Large compound groups need longer windows than small isolation groups.
/// The table is injected into the advisor; hosts may override individual
/// entries through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryTable {
    hours: BTreeMap<MuscleGroup, i64>,
}

impl Default for RecoveryTable {
    fn default() -> Self {
        let hours = [
            (MuscleGroup::Chest, 48),
            (MuscleGroup::Back, 72),
            (MuscleGroup::Shoulders, 48),
            (MuscleGroup::Biceps, 36),
            (MuscleGroup::Triceps, 36),
            (MuscleGroup::Forearms, 24),
            (MuscleGroup::Quads, 72),
            (MuscleGroup::Hamstrings, 72),
            (MuscleGroup::Glutes, 48),
            (MuscleGroup::Calves, 24),
            (MuscleGroup::Core, 24),
        ]
        .into_iter()
        .collect();
        RecoveryTable { hours }
    }
}

impl RecoveryTable {
    /// Recovery window for a muscle group, in hours
    pub fn hours_for(&self, muscle: MuscleGroup) -> i64 {
        self.hours.get(&muscle).copied().unwrap_or(48)
    }

    /// Replace individual windows, keeping defaults for the rest
    pub fn with_overrides(overrides: &BTreeMap<MuscleGroup, i64>) -> Self {
        let mut table = RecoveryTable::default();
        for (muscle, hours) in overrides {
            table.hours.insert(*muscle, *hours);
        }
        table
    }
}

/// Advisory finding over one schedule week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleWarning {
    /// A muscle group is scheduled on two consecutive days
    ConsecutiveMuscle {
        muscle: MuscleGroup,
        first: Weekday,
        second: Weekday,
    },
    /// Every day of the week has an assigned template
    NoRestDay,
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleWarning::ConsecutiveMuscle {
                muscle,
                first,
                second,
            } => write!(
                f,
                "{} is trained on consecutive days ({} and {})",
                muscle, first, second
            ),
            ScheduleWarning::NoRestDay => write!(f, "Week has no rest day"),
        }
    }
}

/// Suggested rest-day placement for a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestDaySuggestion {
    /// Day index, 0 = Monday
    pub day_index: usize,

    pub weekday: Weekday,

    /// Length of the longest consecutive-training run that would remain
    pub resulting_longest_run: usize,
}

/// Recovery classification and schedule analysis
pub struct RecoveryAdvisor {
    table: RecoveryTable,
}

impl RecoveryAdvisor {
    /// Create an advisor with the default recovery table
    pub fn new() -> Self {
        RecoveryAdvisor {
            table: RecoveryTable::default(),
        }
    }

    /// Create an advisor with a custom recovery table
    pub fn with_table(table: RecoveryTable) -> Self {
        RecoveryAdvisor { table }
    }

    /// Classify one muscle group at `now`.
    ///
    /// Recovered at or past the full window, recovering past half the
    /// window, fatigued below that.
    pub fn status(
        &self,
        muscle: MuscleGroup,
        last_trained_at: DateTime<FixedOffset>,
        now: DateTime<FixedOffset>,
    ) -> RecoveryStatus {
        let hours_since = (now - last_trained_at).num_hours();
        let threshold = self.table.hours_for(muscle);

        let tier = if hours_since >= threshold {
            RecoveryTier::Recovered
        } else if hours_since >= threshold / 2 {
            RecoveryTier::Recovering
        } else {
            RecoveryTier::Fatigued
        };

        RecoveryStatus {
            muscle,
            hours_since,
            tier,
        }
    }

    /// Classify every muscle in a last-trained map, ordered by muscle group
    pub fn status_all(
        &self,
        last_trained: &BTreeMap<MuscleGroup, DateTime<FixedOffset>>,
        now: DateTime<FixedOffset>,
    ) -> Vec<RecoveryStatus> {
        last_trained
            .iter()
            .map(|(muscle, at)| self.status(*muscle, *at, now))
            .collect()
    }

    /// Flag consecutive-day muscle overlap and missing rest days.
    ///
    /// Warnings are advisory; nothing here prevents an assignment.
    pub fn analyze_week(&self, week: &ScheduleWeek) -> Result<Vec<ScheduleWarning>> {
        week.validate()?;

        let mut warnings = Vec::new();

        for pair in week.days.windows(2) {
            if pair[0].is_rest_day() || pair[1].is_rest_day() {
                continue;
            }
            let first: BTreeSet<MuscleGroup> = pair[0].muscle_groups.iter().copied().collect();
            let second: BTreeSet<MuscleGroup> = pair[1].muscle_groups.iter().copied().collect();
            for muscle in first.intersection(&second) {
                warnings.push(ScheduleWarning::ConsecutiveMuscle {
                    muscle: *muscle,
                    first: pair[0].weekday,
                    second: pair[1].weekday,
                });
            }
        }

        if week.days.iter().all(|d| !d.is_rest_day()) {
            warnings.push(ScheduleWarning::NoRestDay);
        }

        Ok(warnings)
    }

    /// Pick the rest-day placement that best evens out the week.
    ///
    /// Every day index is a candidate, existing rest days included.
    /// The winner minimizes the longest remaining consecutive-training
    /// run, which breaks the longest run as close to its midpoint as
    /// possible; ties prefer the later day index. A week with no training
    /// days has nothing to break.
    pub fn suggest_rest_day(&self, week: &ScheduleWeek) -> Result<Option<RestDaySuggestion>> {
        week.validate()?;

        let training: Vec<bool> = week.days.iter().map(|d| !d.is_rest_day()).collect();
        if !training.contains(&true) {
            return Ok(None);
        }

        let mut best: Option<(usize, usize)> = None;
        for candidate in 0..training.len() {
            let mut pattern = training.clone();
            pattern[candidate] = false;
            let run = longest_run(&pattern);
            // <= keeps the later index on ties
            if best.map_or(true, |(best_run, _)| run <= best_run) {
                best = Some((run, candidate));
            }
        }

        Ok(best.map(|(run, index)| RestDaySuggestion {
            day_index: index,
            weekday: week.days[index].weekday,
            resulting_longest_run: run,
        }))
    }
}

impl Default for RecoveryAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the longest `true` run
fn longest_run(pattern: &[bool]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for &training in pattern {
        if training {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}
