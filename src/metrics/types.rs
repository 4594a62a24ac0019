//! @ai:module:intent Result types for aggregation and comparison
//! @ai:module:layer domain
//! @ai:module:public_api AggregateStatistics, ComparisonResult, SessionTotals, ConfigurationAggregate, ComparisonReport
//! @ai:module:stateless true

use crate::session::MetricKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// @ai:intent Order statistics over a flattened multiset of values
///
/// `count == 0` exactly when every statistic is `None`. `Default` is the
/// empty aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    /// Number of finite values summarized; non-finite inputs are excluded.
    pub count: usize,
    pub mean: Option<f64>,
    pub p50: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateStatistics {
    /// @ai:intent Statistics for an empty value collection
    /// @ai:effects pure
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// @ai:intent Baseline vs treatment statistics for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub metric: MetricKind,
    pub baseline: AggregateStatistics,
    pub treatment: AggregateStatistics,
    /// `treatment.mean - baseline.mean`, when both are defined.
    pub delta: Option<f64>,
    /// `delta / baseline.mean * 100`, undefined for a zero or missing baseline mean.
    pub percent_change: Option<f64>,
}

/// @ai:intent A session that did not record a requested metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMetric {
    pub session_id: String,
    pub metric: MetricKind,
}

impl std::fmt::Display for MissingMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session {} has no {} series", self.session_id, self.metric)
    }
}

/// @ai:intent Declared sample count that disagrees with the recorded latency series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMismatch {
    pub session_id: String,
    pub declared_samples: u64,
    pub observed_samples: u64,
}

/// @ai:intent Session-level scalars summed across sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub sample_count: u64,
    pub duration_ms: u64,
    #[serde(default)]
    pub mismatches: Vec<SummaryMismatch>,
}

/// @ai:intent Flattened values for every metric of one configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigurationAggregate {
    pub name: String,
    pub session_count: usize,
    pub values: BTreeMap<MetricKind, Vec<f64>>,
    pub totals: SessionTotals,
    pub missing: Vec<MissingMetric>,
}

impl ConfigurationAggregate {
    /// @ai:intent Values for a metric, empty when no session recorded it
    /// @ai:effects pure
    pub fn values(&self, kind: MetricKind) -> &[f64] {
        self.values.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// @ai:intent Per-configuration section of a comparison report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSummary {
    pub name: String,
    pub session_count: usize,
    pub totals: SessionTotals,
    pub statistics: BTreeMap<MetricKind, AggregateStatistics>,
    #[serde(default)]
    pub missing: Vec<MissingMetric>,
}

impl ConfigurationSummary {
    /// @ai:intent Statistics for a metric, empty if absent
    /// @ai:effects pure
    pub fn statistics(&self, kind: MetricKind) -> AggregateStatistics {
        self.statistics.get(&kind).cloned().unwrap_or_default()
    }
}

/// @ai:intent Complete comparison of two configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub generated_at: String,
    pub baseline: ConfigurationSummary,
    pub treatment: ConfigurationSummary,
    pub comparisons: Vec<ComparisonResult>,
}

impl ComparisonReport {
    pub fn comparison(&self, kind: MetricKind) -> Option<&ComparisonResult> {
        self.comparisons.iter().find(|c| c.metric == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_statistics_are_empty() {
        let stats = AggregateStatistics::default();
        assert!(stats.is_empty());
        assert_eq!(stats, AggregateStatistics::empty());
        assert!(stats.mean.is_none() && stats.p99.is_none() && stats.max.is_none());
    }

    #[test]
    fn test_undefined_fields_serialize_as_null() {
        let json = serde_json::to_value(AggregateStatistics::empty()).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["mean"].is_null());
        assert!(json["p95"].is_null());
    }

    #[test]
    fn test_configuration_values_default_to_empty() {
        let aggregate = ConfigurationAggregate::default();
        assert!(aggregate.values(MetricKind::Bitrate).is_empty());
    }
}
