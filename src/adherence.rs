//! Training-split adherence, streaks, and achievement triggers
//!
//! Consumes schedule weeks only; the workout log links in through each
//! day's completion flag, which the persistence layer maintains. Rest days
//! never count against the user: they extend streaks and stay out of the
//! completion denominator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ScheduleDay, ScheduleWeek};

/// Default number of weeks in the adherence trend series
pub const DEFAULT_SERIES_WEEKS: usize = 12;

/// Streak lengths that unlock an achievement, in days
const STREAK_MILESTONES: [u32; 3] = [7, 30, 100];

/// One week's completion percentage for trend displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAdherence {
    pub week_id: String,
    pub percentage: Decimal,
}

/// Milestones derived from streaks and week completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Achievement {
    /// Best streak reached a milestone length
    StreakMilestone { days: u32 },
    /// Every planned day of a week was completed
    PerfectWeek { week_id: String },
}

/// Full adherence report over the available schedule history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceSummary {
    /// Completed planned days over all planned days, in percent.
    /// A history with nothing planned reads as 100, never NaN.
    pub percentage: Decimal,

    /// Consecutive days, counted backward from the most recent day, where
    /// every planned day was completed (rest days count)
    pub current_streak: u32,

    /// Longest such run anywhere in the available history
    pub best_streak: u32,

    /// Last N weeks in chronological order
    pub weekly_series: Vec<WeekAdherence>,

    /// Milestones earned over the available history
    pub achievements: Vec<Achievement>,
}

/// Adherence and streak calculator
pub struct AdherenceCalculator {
    series_window: usize,
}

impl AdherenceCalculator {
    /// Create a calculator with the default trend window
    pub fn new() -> Self {
        AdherenceCalculator {
            series_window: DEFAULT_SERIES_WEEKS,
        }
    }

    /// Create a calculator with a custom trend window
    pub fn with_window(series_window: usize) -> Self {
        AdherenceCalculator { series_window }
    }

    /// Compute the adherence report over the supplied weeks.
    ///
    /// Weeks are ordered by ISO week id; each must carry all seven day
    /// slots or the input is refused. Running out of history stops the
    /// streak walk without breaking it.
    pub fn compute(&self, weeks: &[ScheduleWeek]) -> Result<AdherenceSummary> {
        for week in weeks {
            week.validate()?;
        }

        let mut ordered: Vec<&ScheduleWeek> = weeks.iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let planned: usize = ordered.iter().map(|w| w.planned_days()).sum();
        let completed: usize = ordered.iter().map(|w| w.completed_days()).sum();
        let percentage = completion_percentage(completed, planned);

        let days: Vec<&ScheduleDay> = ordered.iter().flat_map(|w| w.days.iter()).collect();
        let current_streak = current_streak(&days);
        let best_streak = best_streak(&days);

        let weekly_series: Vec<WeekAdherence> = ordered
            .iter()
            .rev()
            .take(self.series_window)
            .rev()
            .map(|week| WeekAdherence {
                week_id: week.id.clone(),
                percentage: completion_percentage(week.completed_days(), week.planned_days()),
            })
            .collect();

        let mut achievements: Vec<Achievement> = STREAK_MILESTONES
            .iter()
            .filter(|&&days| best_streak >= days)
            .map(|&days| Achievement::StreakMilestone { days })
            .collect();
        for week in &ordered {
            if week.planned_days() > 0 && week.completed_days() == week.planned_days() {
                achievements.push(Achievement::PerfectWeek {
                    week_id: week.id.clone(),
                });
            }
        }

        Ok(AdherenceSummary {
            percentage,
            current_streak,
            best_streak,
            weekly_series,
            achievements,
        })
    }
}

impl Default for AdherenceCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk backward from the most recent day.
///
/// Completed planned days extend the streak; a missed planned day breaks
/// it. Rest days are held pending and only join the streak once a
/// completed day (or the end of available history) anchors them — a rest
/// day immediately after a miss never starts a streak on its own.
fn current_streak(days: &[&ScheduleDay]) -> u32 {
    let mut streak = 0u32;
    let mut pending_rest = 0u32;

    for day in days.iter().rev() {
        if day.is_rest_day() {
            pending_rest += 1;
        } else if day.completed {
            streak += pending_rest + 1;
            pending_rest = 0;
        } else {
            // miss: pending rest days never belonged to a streak
            pending_rest = 0;
            break;
        }
    }

    // history exhausted mid-run is a best-effort stop, not a break
    streak + pending_rest
}

/// Longest streak anywhere in history, same walk rules scanned forward:
/// a miss ends the run, and rest days between a miss and the next
/// completed day stay uncounted
fn best_streak(days: &[&ScheduleDay]) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut anchored = true;

    for day in days {
        if day.is_rest_day() {
            if anchored {
                run += 1;
                best = best.max(run);
            }
        } else if day.completed {
            if !anchored {
                anchored = true;
                run = 0;
            }
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
            anchored = false;
        }
    }

    best
}

/// Completed over planned in percent; nothing planned means nothing
/// failed, which reads as 100
fn completion_percentage(completed: usize, planned: usize) -> Decimal {
    if planned == 0 {
        dec!(100)
    } else {
        Decimal::from(completed as u64) / Decimal::from(planned as u64) * dec!(100)
    }
}
