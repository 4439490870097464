//! Calendar heatmap cells with adaptive intensity levels
//!
//! Levels partition the observed non-zero daily volumes into four tiers
//! using quantile boundaries of the current dataset, so the grid adapts to
//! each user's typical training volume instead of fixed absolute
//! thresholds. Zero-volume days are always level 0.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics};
use std::collections::BTreeMap;

use crate::aggregate::Period;

/// One calendar day on the heatmap grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,

    /// Total volume for the day, zero when nothing was logged
    pub volume: Decimal,

    /// Intensity tier 0-4; 0 is reserved for zero-volume days
    pub level: u8,
}

/// Build the heatmap grid for `[period.start, period.end]` inclusive.
///
/// Emits exactly one cell per calendar day, ascending by date, with no
/// gaps; days absent from the rollup get volume 0 and level 0. Output
/// depends only on the input values, never on map iteration order.
pub fn build_heatmap(
    daily_volume: &BTreeMap<NaiveDate, Decimal>,
    period: &Period,
) -> Vec<HeatmapCell> {
    let samples: Vec<f64> = daily_volume
        .iter()
        .filter(|(date, volume)| {
            **date >= period.start && **date <= period.end && **volume > Decimal::ZERO
        })
        .filter_map(|(_, volume)| volume.to_f64())
        .collect();
    let boundaries = quantile_boundaries(samples);

    period
        .start
        .iter_days()
        .take_while(|date| *date <= period.end)
        .map(|date| {
            let volume = daily_volume.get(&date).copied().unwrap_or(Decimal::ZERO);
            HeatmapCell {
                date,
                volume,
                level: intensity_level(volume, boundaries),
            }
        })
        .collect()
}

/// 25/50/75% quantile boundaries of the observed non-zero volumes
fn quantile_boundaries(samples: Vec<f64>) -> Option<(f64, f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let mut data = Data::new(samples);
    Some((
        data.quantile(0.25),
        data.quantile(0.5),
        data.quantile(0.75),
    ))
}

/// Classify a day's volume into tiers 0-4.
///
/// Boundary comparison is strict, so the observed maximum always lands in
/// tier 4 and a dataset of identical non-zero volumes renders uniformly
/// hot rather than uniformly cold.
fn intensity_level(volume: Decimal, boundaries: Option<(f64, f64, f64)>) -> u8 {
    if volume <= Decimal::ZERO {
        return 0;
    }
    let (q1, q2, q3) = match boundaries {
        Some(b) => b,
        // non-zero volume with no in-period samples can only happen for
        // callers probing outside the grid; treat as the lowest hot tier
        None => return 1,
    };
    let v = volume.to_f64().unwrap_or(0.0);
    if v < q1 {
        1
    } else if v < q2 {
        2
    } else if v < q3 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn period(start: u32, end: u32) -> Period {
        Period::new(date(start), date(end))
    }

    #[test]
    fn test_one_cell_per_day_inclusive() {
        let mut daily = BTreeMap::new();
        daily.insert(date(3), dec!(1000));

        let cells = build_heatmap(&daily, &period(1, 7));

        assert_eq!(cells.len(), 7);
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.date, date(1 + i as u32));
        }
    }

    #[test]
    fn test_zero_volume_days_are_level_zero() {
        let mut daily = BTreeMap::new();
        daily.insert(date(2), dec!(500));
        daily.insert(date(4), dec!(0));

        let cells = build_heatmap(&daily, &period(1, 5));

        assert_eq!(cells[0].level, 0);
        assert_eq!(cells[0].volume, dec!(0));
        assert_eq!(cells[3].level, 0);
        assert!(cells[1].level > 0);
    }

    #[test]
    fn test_max_volume_gets_top_tier() {
        let mut daily = BTreeMap::new();
        daily.insert(date(1), dec!(100));
        daily.insert(date(2), dec!(200));
        daily.insert(date(3), dec!(300));
        daily.insert(date(4), dec!(400));
        daily.insert(date(5), dec!(500));

        let cells = build_heatmap(&daily, &period(1, 5));

        assert_eq!(cells[4].level, 4);
        assert_eq!(cells[0].level, 1);
        assert!(cells[1].level <= cells[2].level);
        assert!(cells[2].level <= cells[3].level);
    }

    #[test]
    fn test_uniform_volumes_render_hot() {
        let mut daily = BTreeMap::new();
        for d in 1..=4 {
            daily.insert(date(d), dec!(1000));
        }

        let cells = build_heatmap(&daily, &period(1, 4));

        for cell in &cells {
            assert_eq!(cell.level, 4);
        }
    }

    #[test]
    fn test_out_of_period_volumes_do_not_shift_quantiles() {
        let mut daily = BTreeMap::new();
        daily.insert(date(1), dec!(100));
        daily.insert(date(2), dec!(100));
        // huge spike outside the requested grid
        daily.insert(date(20), dec!(100000));

        let cells = build_heatmap(&daily, &period(1, 2));

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].level, 4);
        assert_eq!(cells[1].level, 4);
    }

    #[test]
    fn test_empty_rollup_is_all_level_zero() {
        let daily = BTreeMap::new();

        let cells = build_heatmap(&daily, &period(1, 31));

        assert_eq!(cells.len(), 31);
        assert!(cells.iter().all(|c| c.level == 0 && c.volume == dec!(0)));
    }

    #[test]
    fn test_deterministic_output() {
        let mut daily = BTreeMap::new();
        daily.insert(date(1), dec!(120));
        daily.insert(date(3), dec!(900));
        daily.insert(date(6), dec!(450));

        assert_eq!(
            build_heatmap(&daily, &period(1, 7)),
            build_heatmap(&daily, &period(1, 7))
        );
    }
}
