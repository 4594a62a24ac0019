//! @ai:module:intent Baseline vs treatment comparison
//! @ai:module:layer application
//! @ai:module:public_api compare, compare_statistics, compare_configurations
//! @ai:module:stateless true

use crate::metrics::statistics::compute_statistics;
use crate::metrics::types::{
    AggregateStatistics, ComparisonReport, ComparisonResult, ConfigurationAggregate,
    ConfigurationSummary,
};
use crate::session::MetricKind;

/// @ai:intent Compare two raw value collections for one metric
/// @ai:effects pure
pub fn compare(baseline: &[f64], treatment: &[f64], metric: MetricKind) -> ComparisonResult {
    compare_statistics(
        metric,
        compute_statistics(baseline),
        compute_statistics(treatment),
    )
}

/// @ai:intent Derive delta and percent change from precomputed statistics
/// @ai:effects pure
///
/// `percent_change` divides by the baseline mean, so swapping sides negates
/// `delta` but not `percent_change`.
pub fn compare_statistics(
    metric: MetricKind,
    baseline: AggregateStatistics,
    treatment: AggregateStatistics,
) -> ComparisonResult {
    let delta = match (baseline.mean, treatment.mean) {
        (Some(b), Some(t)) => Some(t - b),
        _ => None,
    };

    let percent_change = match (delta, baseline.mean) {
        (Some(d), Some(b)) if b != 0.0 => Some(d / b * 100.0),
        _ => None,
    };

    ComparisonResult {
        metric,
        baseline,
        treatment,
        delta,
        percent_change,
    }
}

/// @ai:intent Summarize one configuration's statistics per metric
/// @ai:effects pure
pub fn summarize_configuration(aggregate: &ConfigurationAggregate) -> ConfigurationSummary {
    ConfigurationSummary {
        name: aggregate.name.clone(),
        session_count: aggregate.session_count,
        totals: aggregate.totals.clone(),
        statistics: MetricKind::ALL
            .into_iter()
            .map(|kind| (kind, compute_statistics(aggregate.values(kind))))
            .collect(),
        missing: aggregate.missing.clone(),
    }
}

/// @ai:intent Compare every metric kind of two configurations
/// @ai:effects pure
pub fn compare_configurations(
    baseline: &ConfigurationAggregate,
    treatment: &ConfigurationAggregate,
) -> ComparisonReport {
    let baseline = summarize_configuration(baseline);
    let treatment = summarize_configuration(treatment);

    let comparisons = MetricKind::ALL
        .into_iter()
        .map(|kind| {
            compare_statistics(kind, baseline.statistics(kind), treatment.statistics(kind))
        })
        .collect();

    ComparisonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        baseline,
        treatment,
        comparisons,
    }
}
