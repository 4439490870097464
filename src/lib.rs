// Library interface for the liftrs analytics engine
// Everything here is pure computation over immutable log/schedule snapshots

pub mod adherence;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod import;
pub mod logging;
pub mod models;
pub mod prs;
pub mod recovery;
pub mod trend;

// Re-export commonly used types for convenience
pub use models::*;
pub use adherence::{AdherenceCalculator, AdherenceSummary};
pub use aggregate::{AggregateOptions, Period, VolumeAggregator, VolumeRollup};
pub use error::{LiftrsError, Result};
pub use heatmap::{build_heatmap, HeatmapCell};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use prs::PrDetector;
pub use recovery::{RecoveryAdvisor, RecoveryTable, ScheduleWarning};
pub use trend::{
    classify_overload, fit_duration_trend, OverloadStatus, TrendLine, OVERLOAD_BAND_PCT,
};
