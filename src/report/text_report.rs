//! @ai:module:intent Plain-text console summaries
//! @ai:module:layer presentation
//! @ai:module:public_api TextReporter
//! @ai:module:stateless true

use crate::metrics::{compute_statistics, AggregateStatistics, ComparisonReport, ConfigurationSummary};
use crate::session::{MetricKind, TelemetrySession};
use std::fmt::Write as FmtWrite;

const RULE_WIDTH: usize = 60;

/// @ai:intent Renders statistics as console text
pub struct TextReporter;

impl TextReporter {
    /// @ai:intent Format an optional statistic, `n/a` when undefined
    /// @ai:effects pure
    pub fn format_value(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.2}", v),
            None => "n/a".to_string(),
        }
    }

    /// @ai:intent Format an optional signed delta
    /// @ai:effects pure
    pub fn format_signed(value: Option<f64>, suffix: &str) -> String {
        match value {
            Some(v) => format!("{:+.2}{}", v, suffix),
            None => "n/a".to_string(),
        }
    }

    fn write_statistics(out: &mut String, kind: MetricKind, stats: &AggregateStatistics) {
        let unit = kind.unit();

        writeln!(out, "{} ({} samples)", kind.as_str().to_uppercase(), stats.count).unwrap();

        for (label, value) in [
            ("mean", stats.mean),
            ("p50", stats.p50),
            ("p95", stats.p95),
            ("p99", stats.p99),
            ("min", stats.min),
            ("max", stats.max),
        ] {
            match value {
                Some(_) => writeln!(
                    out,
                    "  {:<5} {} {}",
                    format!("{label}:"),
                    Self::format_value(value),
                    unit
                )
                .unwrap(),
                None => writeln!(out, "  {:<5} n/a", format!("{label}:")).unwrap(),
            }
        }

        writeln!(out).unwrap();
    }

    /// @ai:intent Summary of one aggregated configuration
    /// @ai:effects pure
    pub fn configuration_summary(summary: &ConfigurationSummary) -> String {
        let mut out = String::new();
        let duration_ms = summary.totals.duration_ms as f64;

        writeln!(out, "===== {} configuration =====", summary.name).unwrap();
        writeln!(out, "Sessions:       {}", summary.session_count).unwrap();
        writeln!(out, "Total samples:  {}", summary.totals.sample_count).unwrap();
        writeln!(
            out,
            "Total duration: {:.1} s ({:.2} min)",
            duration_ms / 1000.0,
            duration_ms / 60_000.0
        )
        .unwrap();
        writeln!(out).unwrap();

        for kind in MetricKind::ALL {
            Self::write_statistics(&mut out, kind, &summary.statistics(kind));
        }

        if !summary.totals.mismatches.is_empty() {
            writeln!(out, "Summary mismatches:").unwrap();

            for m in &summary.totals.mismatches {
                writeln!(
                    out,
                    "  {}: declared {} samples, recorded {}",
                    m.session_id, m.declared_samples, m.observed_samples
                )
                .unwrap();
            }

            writeln!(out).unwrap();
        }

        out
    }

    /// @ai:intent Statistics for a single session, computed from its raw series
    /// @ai:effects pure
    pub fn session_summary(session: &TelemetrySession) -> String {
        let mut out = String::new();
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(out, "{}", rule).unwrap();
        writeln!(out, "PERFORMANCE STATISTICS SUMMARY").unwrap();
        writeln!(out, "{}", rule).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Session ID: {}", session.session_id).unwrap();
        writeln!(out, "Duration: {:.2} seconds", session.duration_ms as f64 / 1000.0).unwrap();
        writeln!(out, "Samples: {}", session.sample_count).unwrap();
        writeln!(out, "Interval: {} ms", session.interval_ms).unwrap();
        writeln!(out).unwrap();

        for kind in MetricKind::ALL {
            let Some(series) = session.series(kind) else {
                continue;
            };

            let values: Vec<f64> = series.values().collect();
            Self::write_statistics(&mut out, kind, &compute_statistics(&values));

            if let Some(declared) = session.declared(kind) {
                writeln!(
                    out,
                    "  declared mean/p95/p99: {} / {} / {}",
                    Self::format_value(declared.mean),
                    Self::format_value(declared.p95),
                    Self::format_value(declared.p99)
                )
                .unwrap();
                writeln!(out).unwrap();
            }
        }

        writeln!(out, "{}", rule).unwrap();
        out
    }

    /// @ai:intent Numerical mean comparison between configurations
    /// @ai:effects pure
    pub fn comparison_table(report: &ComparisonReport) -> String {
        let mut out = String::new();
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(out, "{}", rule).unwrap();
        writeln!(out, "NUMERICAL COMPARISON").unwrap();
        writeln!(out, "{}", rule).unwrap();
        writeln!(out).unwrap();

        for comparison in &report.comparisons {
            let unit = comparison.metric.unit();

            writeln!(out, "{}:", comparison.metric.as_str().to_uppercase()).unwrap();
            writeln!(
                out,
                "  {:<10} {} {}",
                format!("{}:", report.baseline.name),
                Self::format_value(comparison.baseline.mean),
                unit
            )
            .unwrap();
            writeln!(
                out,
                "  {:<10} {} {}",
                format!("{}:", report.treatment.name),
                Self::format_value(comparison.treatment.mean),
                unit
            )
            .unwrap();
            writeln!(
                out,
                "  {:<10} {} ({})",
                "Δ:",
                Self::format_signed(comparison.delta, ""),
                Self::format_signed(comparison.percent_change, "%")
            )
            .unwrap();
            writeln!(out).unwrap();
        }

        out
    }
}
