//! @ai:module:intent Telemetry aggregation and comparison library
//! @ai:module:layer application
//! @ai:module:public_api config, error, metrics, report, session

pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod session;

pub use config::AnalyzerConfig;
pub use error::{Error, Result};
pub use metrics::{
    aggregate, compare, compute_statistics, session_totals, AggregateStatistics,
    ComparisonReport, ComparisonResult, MetricAggregator, MetricAggregatorTrait, SessionTotals,
};
pub use report::ReportGenerator;
pub use session::{
    load_comparison, MetricKind, SessionLoader, SessionLoaderTrait, SessionSource, TelemetrySession,
};
