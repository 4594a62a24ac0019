//! @ai:module:intent Telemetry session model and ingestion
//! @ai:module:layer domain
//! @ai:module:public_api TelemetrySession, MetricKind, MetricSample, MetricSeries, SessionLoader, SessionSource, load_comparison

pub mod loader;
pub mod source;
pub mod types;

pub use loader::{FilePattern, SessionLoader, SessionLoaderTrait};
pub use source::{load_comparison, SessionSource};
pub use types::{
    DeclaredStatistics, MetricKind, MetricSample, MetricSeries, SessionSummary, TelemetrySession,
    DEFAULT_INTERVAL_MS,
};
