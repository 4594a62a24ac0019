//! @ai:module:intent Metrics aggregation, statistics and comparison
//! @ai:module:layer application
//! @ai:module:public_api aggregate, compute_statistics, compare, session_totals, MetricAggregator, AggregateStatistics, ComparisonResult

pub mod aggregator;
pub mod comparator;
pub mod statistics;
pub mod types;

pub use aggregator::{
    aggregate, aggregate_detailed, elapsed_axis, session_totals, timeline, MetricAggregator,
    MetricAggregatorTrait,
};
pub use comparator::{compare, compare_configurations, compare_statistics, summarize_configuration};
pub use statistics::{compute_statistics, quantile};
pub use types::{
    AggregateStatistics, ComparisonReport, ComparisonResult, ConfigurationAggregate,
    ConfigurationSummary, MissingMetric, SessionTotals, SummaryMismatch,
};
