//! Trend inference over the workout log
//!
//! Two independent algorithms: an ordinary-least-squares duration trend
//! and week-over-week progressive-overload classification. Both degrade
//! gracefully on short inputs since a dashboard must always render
//! something.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::WorkoutRecord;

/// Week-over-week volume change band, in percent. Changes inside
/// `±OVERLOAD_BAND_PCT` classify as maintaining.
pub const OVERLOAD_BAND_PCT: Decimal = dec!(2.5);

/// A single observation for trend fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Observation instant
    pub at: DateTime<FixedOffset>,

    /// Observed value (session duration in minutes)
    pub value: Decimal,
}

/// Fitted line in day-offset space: `y = slope * days + intercept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    /// Change per day
    pub slope: Decimal,

    /// Value at the first observation
    pub intercept: Decimal,
}

impl TrendLine {
    fn flat(intercept: Decimal) -> Self {
        TrendLine {
            slope: Decimal::ZERO,
            intercept,
        }
    }
}

/// Extract duration observations from the log. Records without a tracked
/// duration are absent from the fit, not zero.
pub fn duration_points(records: &[WorkoutRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .filter_map(|r| {
            r.duration_minutes.map(|minutes| TrendPoint {
                at: r.performed_at,
                value: Decimal::from(minutes),
            })
        })
        .collect()
}

/// Fit a duration-over-time line by ordinary least squares.
///
/// Timestamps are converted to fractional day-offsets from the first point
/// before fitting, keeping the arithmetic well away from epoch-scale
/// magnitudes. Zero or one points (or zero x-variance) produce a flat
/// degenerate trend rather than an error.
pub fn fit_duration_trend(points: &[TrendPoint]) -> TrendLine {
    let first = match points {
        [] => return TrendLine::flat(Decimal::ZERO),
        [only] => return TrendLine::flat(only.value),
        [first, ..] => first,
    };

    let n = Decimal::from(points.len());
    let mut sum_x = Decimal::ZERO;
    let mut sum_y = Decimal::ZERO;
    let mut sum_xx = Decimal::ZERO;
    let mut sum_xy = Decimal::ZERO;

    for point in points {
        let x = day_offset(first.at, point.at);
        sum_x += x;
        sum_y += point.value;
        sum_xx += x * x;
        sum_xy += x * point.value;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.is_zero() {
        // all observations at the same instant
        return TrendLine::flat(sum_y / n);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    TrendLine { slope, intercept }
}

/// Fractional days between two instants
fn day_offset(origin: DateTime<FixedOffset>, at: DateTime<FixedOffset>) -> Decimal {
    Decimal::from((at - origin).num_seconds()) / dec!(86400)
}

/// Progressive-overload status of one week relative to the prior week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverloadStatus {
    Progressing,
    Maintaining,
    Regressing,
}

impl OverloadStatus {
    /// Classify a percentage change against the fixed band
    pub fn from_pct_change(pct: Decimal) -> Self {
        if pct >= OVERLOAD_BAND_PCT {
            OverloadStatus::Progressing
        } else if pct <= -OVERLOAD_BAND_PCT {
            OverloadStatus::Regressing
        } else {
            OverloadStatus::Maintaining
        }
    }
}

impl fmt::Display for OverloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverloadStatus::Progressing => write!(f, "Progressing"),
            OverloadStatus::Maintaining => write!(f, "Maintaining"),
            OverloadStatus::Regressing => write!(f, "Regressing"),
        }
    }
}

/// One week's classified change in the overload series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChange {
    /// ISO week key
    pub week_id: String,

    /// Total volume for the week
    pub volume: Decimal,

    /// Change relative to the prior week, in percent
    pub pct_change: Decimal,

    pub status: OverloadStatus,
}

/// Classify each week of an ordered weekly-volume series against its
/// predecessor. The first week is the baseline and emits no entry.
pub fn classify_overload(weekly_totals: &[(String, Decimal)]) -> Vec<WeeklyChange> {
    weekly_totals
        .windows(2)
        .map(|pair| {
            let (_, prev) = &pair[0];
            let (week_id, curr) = &pair[1];
            let pct = percentage_change(*prev, *curr);
            WeeklyChange {
                week_id: week_id.clone(),
                volume: *curr,
                pct_change: pct,
                status: OverloadStatus::from_pct_change(pct),
            }
        })
        .collect()
}

/// Percentage change with an explicit zero-previous guard: growth from
/// nothing reads as 100%, stagnation at nothing as 0%. NaN and infinity
/// never escape.
pub(crate) fn percentage_change(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        if current > Decimal::ZERO {
            dec!(100)
        } else {
            Decimal::ZERO
        }
    } else {
        (current - previous) / previous * dec!(100)
    }
}
