//! @ai:module:intent Order statistics over metric values
//! @ai:module:layer domain
//! @ai:module:public_api compute_statistics, quantile
//! @ai:module:stateless true

use crate::metrics::types::AggregateStatistics;

/// @ai:intent Linear-interpolation quantile of ascending data
/// @ai:pre sorted_values is sorted ascending and contains only finite values
/// @ai:pre 0.0 <= q <= 1.0
/// @ai:effects pure
///
/// The `q`-quantile sits at virtual index `q * (n - 1)`; fractional indices
/// interpolate between the two neighbouring values. Returns `None` for empty
/// input.
pub fn quantile(sorted_values: &[f64], q: f64) -> Option<f64> {
    debug_assert!(
        sorted_values.windows(2).all(|w| w[0] <= w[1]),
        "values must be sorted in ascending order"
    );

    let last = sorted_values.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;

    let lo = sorted_values[lower];
    let hi = sorted_values[upper];

    if lower == upper {
        return Some(lo);
    }

    let weight = position - lower as f64;
    // clamp absorbs rounding so the result never leaves [lo, hi]
    Some((lo + (hi - lo) * weight).clamp(lo, hi))
}

/// @ai:intent Compute count, mean, p50/p95/p99 and extrema
/// @ai:effects pure
///
/// The input is left untouched; a sorted copy is used. Loaded sessions never
/// carry NaN or infinities; any passed in directly are excluded with a warning,
/// so `count` is the number of finite values and equals `values.len()` for
/// valid input.
pub fn compute_statistics(values: &[f64]) -> AggregateStatistics {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let rejected = values.len() - sorted.len();
    if rejected > 0 {
        tracing::warn!(
            "Excluded {} non-finite of {} values from statistics",
            rejected,
            values.len()
        );
    }

    if sorted.is_empty() {
        return AggregateStatistics::empty();
    }

    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let mean = (sorted.iter().sum::<f64>() / count as f64).clamp(min, max);

    AggregateStatistics {
        count,
        mean: Some(mean),
        p50: quantile(&sorted, 0.50),
        p95: quantile(&sorted, 0.95),
        p99: quantile(&sorted, 0.99),
        min: Some(min),
        max: Some(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("statistic should be defined");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn datasets() -> Vec<Vec<f64>> {
        vec![
            vec![42.0],
            vec![1.0, 2.0],
            vec![10.0, 20.0, 30.0, 40.0, 50.0],
            vec![0.1, 0.1, 0.1],
            vec![5.0, -3.0, 12.5, 0.0, 7.25, 7.25, 99.0, -40.0],
            (0..1000).map(|i| ((i * 7919) % 1013) as f64 / 3.0).collect(),
            vec![1e-12, 1e12, 3.5, 3.5, 3.5],
        ]
    }

    #[test]
    fn test_empty_input_is_undefined() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats, AggregateStatistics::empty());
    }

    #[test]
    fn test_single_value() {
        let stats = compute_statistics(&[7.5]);
        assert_eq!(stats.count, 1);
        for field in [stats.mean, stats.p50, stats.p95, stats.p99, stats.min, stats.max] {
            assert_eq!(field, Some(7.5));
        }
    }

    #[test]
    fn test_linear_interpolation() {
        let stats = compute_statistics(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(stats.count, 5);
        approx(stats.mean, 30.0);
        approx(stats.p50, 30.0);
        // index 0.95 * 4 = 3.8 -> 40 + 0.8 * 10
        approx(stats.p95, 48.0);
        // index 0.99 * 4 = 3.96 -> 40 + 0.96 * 10
        approx(stats.p99, 49.6);
        approx(stats.min, 10.0);
        approx(stats.max, 50.0);
    }

    #[test]
    fn test_even_length_median_interpolates() {
        let stats = compute_statistics(&[4.0, 1.0, 3.0, 2.0]);
        approx(stats.p50, 2.5);
    }

    #[test]
    fn test_quantile_endpoints() {
        let sorted = [1.0, 2.0, 4.0, 8.0];
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 1.0), Some(8.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_input_not_mutated() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = compute_statistics(&values);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_count_matches_length_for_finite_input() {
        for values in datasets() {
            assert_eq!(compute_statistics(&values).count, values.len());
        }
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let stats = compute_statistics(&[f64::NAN, 1.0, f64::INFINITY, 3.0]);
        assert_eq!(stats.count, 2);
        approx(stats.mean, 2.0);

        let stats = compute_statistics(&[f64::NAN]);
        assert!(stats.is_empty());
        assert!(stats.mean.is_none());
    }

    #[test]
    fn test_percentiles_are_monotonic() {
        for values in datasets() {
            let stats = compute_statistics(&values);
            let (p50, p95, p99) = (stats.p50.unwrap(), stats.p95.unwrap(), stats.p99.unwrap());
            assert!(p50 <= p95 && p95 <= p99, "{p50} {p95} {p99} for {values:?}");
        }
    }

    #[test]
    fn test_mean_and_median_within_extrema() {
        for values in datasets() {
            let stats = compute_statistics(&values);
            let (min, max) = (stats.min.unwrap(), stats.max.unwrap());
            let mean = stats.mean.unwrap();
            let p50 = stats.p50.unwrap();
            assert!(min <= mean && mean <= max, "mean {mean} outside [{min}, {max}]");
            assert!(min <= p50 && p50 <= max, "p50 {p50} outside [{min}, {max}]");
        }
    }

    #[test]
    fn test_statistics_ignore_order() {
        for values in datasets() {
            let forward = compute_statistics(&values);

            let mut reversed = values.clone();
            reversed.reverse();
            assert_eq!(compute_statistics(&reversed), forward);

            let mut rotated = values.clone();
            rotated.rotate_left(values.len() / 2);
            let rotated = compute_statistics(&rotated);
            assert_eq!(rotated.count, forward.count);
            assert_eq!(rotated.p95, forward.p95);
            approx(rotated.mean, forward.mean.unwrap());
        }
    }
}
