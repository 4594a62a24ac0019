//! @ai:module:intent Merge metric series across telemetry sessions
//! @ai:module:layer application
//! @ai:module:public_api MetricAggregator, aggregate, aggregate_detailed, session_totals, elapsed_axis, timeline
//! @ai:module:stateless true

use crate::metrics::types::{ConfigurationAggregate, MissingMetric, SessionTotals, SummaryMismatch};
use crate::session::{MetricKind, MetricSeries, TelemetrySession};
use std::collections::BTreeMap;

/// @ai:intent Trait for metrics aggregation
pub trait MetricAggregatorTrait: Send + Sync {
    /// @ai:intent Flatten one metric's values across sessions
    fn aggregate(&self, sessions: &[TelemetrySession], kind: MetricKind) -> Vec<f64>;

    /// @ai:intent Sum session-level sample counts and durations
    fn session_totals(&self, sessions: &[TelemetrySession]) -> SessionTotals;

    /// @ai:intent Aggregate every metric kind for one named configuration
    fn aggregate_configuration(
        &self,
        name: &str,
        sessions: &[TelemetrySession],
    ) -> ConfigurationAggregate;
}

/// @ai:intent Aggregates session series into flat value collections
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricAggregator;

impl MetricAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl MetricAggregatorTrait for MetricAggregator {
    fn aggregate(&self, sessions: &[TelemetrySession], kind: MetricKind) -> Vec<f64> {
        aggregate(sessions, kind)
    }

    fn session_totals(&self, sessions: &[TelemetrySession]) -> SessionTotals {
        session_totals(sessions)
    }

    /// @ai:intent Aggregate every metric kind for one named configuration
    /// @ai:effects pure, log
    fn aggregate_configuration(
        &self,
        name: &str,
        sessions: &[TelemetrySession],
    ) -> ConfigurationAggregate {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();

        for kind in MetricKind::ALL {
            let (kind_values, kind_missing) = aggregate_detailed(sessions, kind);

            for warning in &kind_missing {
                tracing::warn!("{}: {}", name, warning);
            }

            values.insert(kind, kind_values);
            missing.extend(kind_missing);
        }

        ConfigurationAggregate {
            name: name.to_string(),
            session_count: sessions.len(),
            values,
            totals: session_totals(sessions),
            missing,
        }
    }
}

/// @ai:intent Flatten values and collect sessions lacking the metric
/// @ai:effects pure
///
/// Values are concatenated in session order, then sample order. That order is
/// kept for display only; statistics never depend on it.
pub fn aggregate_detailed(
    sessions: &[TelemetrySession],
    kind: MetricKind,
) -> (Vec<f64>, Vec<MissingMetric>) {
    let capacity = sessions
        .iter()
        .filter_map(|s| s.series(kind))
        .map(MetricSeries::len)
        .sum();

    let mut values = Vec::with_capacity(capacity);
    let mut missing = Vec::new();

    for session in sessions {
        match session.series(kind) {
            Some(series) => values.extend(series.values()),
            None => missing.push(MissingMetric {
                session_id: session.session_id.clone(),
                metric: kind,
            }),
        }
    }

    (values, missing)
}

/// @ai:intent Flatten one metric's values across sessions, warning on gaps
/// @ai:effects pure, log
pub fn aggregate(sessions: &[TelemetrySession], kind: MetricKind) -> Vec<f64> {
    let (values, missing) = aggregate_detailed(sessions, kind);

    for warning in &missing {
        tracing::warn!("{}", warning);
    }

    values
}

/// @ai:intent Sum declared sample counts and durations across sessions
/// @ai:effects pure, log
///
/// A declared `summary.samples` that disagrees with the latency series length
/// is reported as a mismatch; the declared value still wins for the total.
pub fn session_totals(sessions: &[TelemetrySession]) -> SessionTotals {
    let mut totals = SessionTotals::default();

    for session in sessions {
        totals.sample_count = totals.sample_count.saturating_add(session.sample_count);
        totals.duration_ms = totals.duration_ms.saturating_add(session.duration_ms);

        let declared = session.summary.as_ref().and_then(|s| s.samples);
        let observed = session
            .series(MetricKind::Latency)
            .map(|s| s.len() as u64)
            .unwrap_or(0);

        if let Some(declared) = declared.filter(|&d| d != observed) {
            tracing::warn!(
                "Session {} declares {} samples but recorded {} latency samples",
                session.session_id,
                declared,
                observed
            );
            totals.mismatches.push(SummaryMismatch {
                session_id: session.session_id.clone(),
                declared_samples: declared,
                observed_samples: observed,
            });
        }
    }

    totals
}

/// @ai:intent Synthetic elapsed-seconds axis for a series
/// @ai:effects pure
///
/// Sample `i` sits at `i * interval_ms / 1000` seconds regardless of its raw
/// timestamp, giving uniform spacing for plots.
pub fn elapsed_axis(series: &MetricSeries, interval_ms: u64) -> Vec<f64> {
    let step = interval_ms as f64 / 1000.0;
    (0..series.len()).map(|i| i as f64 * step).collect()
}

/// @ai:intent (elapsed seconds, value) points for one session metric
/// @ai:effects pure
pub fn timeline(session: &TelemetrySession, kind: MetricKind) -> Option<Vec<(f64, f64)>> {
    let series = session.series(kind).filter(|s| !s.is_empty())?;

    Some(
        elapsed_axis(series, session.interval_ms)
            .into_iter()
            .zip(series.values())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::statistics::compute_statistics;
    use crate::session::{MetricSample, SessionSummary};
    use pretty_assertions::assert_eq;

    fn session(id: &str, metrics: &[(MetricKind, &[f64])]) -> TelemetrySession {
        let metrics = metrics
            .iter()
            .map(|(kind, values)| {
                let samples = values
                    .iter()
                    .enumerate()
                    .map(|(i, &value)| MetricSample {
                        timestamp: 1_700_000_000_000 + i as i64 * 1013,
                        value,
                    })
                    .collect::<Vec<_>>();
                (*kind, MetricSeries::new(samples))
            })
            .collect();
        TelemetrySession::new(id, 1000, metrics, None)
    }

    #[test]
    fn test_aggregate_concatenates_in_input_order() {
        let sessions = vec![
            session("a", &[(MetricKind::Latency, &[10.0, 20.0])]),
            session("b", &[(MetricKind::Latency, &[30.0])]),
        ];

        let values = aggregate(&sessions, MetricKind::Latency);
        assert_eq!(values, vec![10.0, 20.0, 30.0]);

        let stats = compute_statistics(&values);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(20.0));
    }

    #[test]
    fn test_missing_metric_contributes_nothing() {
        let sessions = vec![
            session("a", &[(MetricKind::Latency, &[1.0])]),
            session("b", &[(MetricKind::Jitter, &[2.0])]),
        ];

        let (values, missing) = aggregate_detailed(&sessions, MetricKind::Jitter);
        assert_eq!(values, vec![2.0]);
        assert_eq!(
            missing,
            vec![MissingMetric {
                session_id: "a".to_string(),
                metric: MetricKind::Jitter,
            }]
        );
    }

    #[test]
    fn test_empty_series_is_not_missing() {
        let sessions = vec![session("a", &[(MetricKind::Bitrate, &[])])];
        let (values, missing) = aggregate_detailed(&sessions, MetricKind::Bitrate);
        assert!(values.is_empty());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let a = session("a", &[(MetricKind::Latency, &[12.0, 48.0, 3.0])]);
        let b = session("b", &[(MetricKind::Latency, &[7.0])]);
        let c = session("c", &[(MetricKind::Latency, &[99.0, 21.0])]);

        let orders = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), a.clone(), b.clone()],
            vec![b.clone(), c.clone(), a.clone()],
            vec![c, b, a],
        ];

        let reference = {
            let mut values = aggregate(&orders[0], MetricKind::Latency);
            values.sort_by(f64::total_cmp);
            values
        };
        let reference_stats = compute_statistics(&reference);

        for sessions in &orders {
            let mut values = aggregate(sessions, MetricKind::Latency);
            assert_eq!(compute_statistics(&values), reference_stats);

            values.sort_by(f64::total_cmp);
            assert_eq!(values, reference);
        }
    }

    #[test]
    fn test_session_totals_sum_and_flag_mismatch() {
        let plain = session("plain", &[(MetricKind::Latency, &[1.0, 2.0])]);

        let mut declared = session("declared", &[(MetricKind::Latency, &[1.0, 2.0, 3.0])]);
        declared.summary = Some(SessionSummary {
            duration_ms: Some(10_000),
            samples: Some(10),
            metrics: BTreeMap::new(),
        });
        declared.sample_count = 10;
        declared.duration_ms = 10_000;

        let totals = session_totals(&[plain, declared]);
        assert_eq!(totals.sample_count, 12);
        assert_eq!(totals.duration_ms, 10_000);
        assert_eq!(
            totals.mismatches,
            vec![SummaryMismatch {
                session_id: "declared".to_string(),
                declared_samples: 10,
                observed_samples: 3,
            }]
        );
    }

    #[test]
    fn test_session_totals_empty() {
        assert_eq!(session_totals(&[]), SessionTotals::default());
    }

    #[test]
    fn test_elapsed_axis_uses_index_not_timestamp() {
        let mut s = session("a", &[(MetricKind::Latency, &[5.0, 6.0, 7.0])]);
        s.interval_ms = 250;

        let axis = elapsed_axis(s.series(MetricKind::Latency).unwrap(), s.interval_ms);
        assert_eq!(axis, vec![0.0, 0.25, 0.5]);

        let points = timeline(&s, MetricKind::Latency).unwrap();
        assert_eq!(points, vec![(0.0, 5.0), (0.25, 6.0), (0.5, 7.0)]);
        assert!(timeline(&s, MetricKind::Jitter).is_none());
    }

    #[test]
    fn test_aggregate_configuration_covers_all_kinds() {
        let sessions = vec![session(
            "a",
            &[
                (MetricKind::Latency, &[10.0, 20.0]),
                (MetricKind::PacketLoss, &[0.0, 1.5]),
            ],
        )];

        let aggregate = MetricAggregator::new().aggregate_configuration("Baseline", &sessions);
        assert_eq!(aggregate.name, "Baseline");
        assert_eq!(aggregate.session_count, 1);
        assert_eq!(aggregate.values.len(), MetricKind::ALL.len());
        assert_eq!(aggregate.values(MetricKind::PacketLoss), &[0.0, 1.5]);
        assert_eq!(aggregate.missing.len(), 3);
        assert_eq!(aggregate.totals.sample_count, 2);
    }
}
