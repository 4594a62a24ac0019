//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{ComparisonReport, ConfigurationSummary};
use crate::report::text_report::TextReporter;
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a comparison
    fn generate(&self, report: &ComparisonReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from comparisons
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Generate header section
    /// @ai:effects pure
    fn generate_summary(report: &ComparisonReport) -> String {
        let mut output = String::new();

        writeln!(
            output,
            "# {} vs {} Comparison",
            report.baseline.name, report.treatment.name
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Generated:** {}", report.generated_at).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate totals table for both configurations
    /// @ai:effects pure
    fn generate_totals_table(baseline: &ConfigurationSummary, treatment: &ConfigurationSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## Sessions").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Configuration | Sessions | Samples | Duration (min) |").unwrap();
        writeln!(output, "|---------------|----------|---------|----------------|").unwrap();

        for summary in [baseline, treatment] {
            writeln!(
                output,
                "| {} | {} | {} | {:.2} |",
                summary.name,
                summary.session_count,
                summary.totals.sample_count,
                summary.totals.duration_ms as f64 / 60_000.0
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate one statistics table per metric
    /// @ai:effects pure
    fn generate_metric_sections(report: &ComparisonReport) -> String {
        let mut output = String::new();
        let fmt = TextReporter::format_value;

        writeln!(output, "## Metrics").unwrap();
        writeln!(output).unwrap();

        for comparison in &report.comparisons {
            let kind = comparison.metric;

            writeln!(output, "### {} ({})", kind.title(), kind.unit()).unwrap();
            writeln!(output).unwrap();
            writeln!(
                output,
                "| Statistic | {} | {} |",
                report.baseline.name, report.treatment.name
            )
            .unwrap();
            writeln!(output, "|-----------|----------|-----------|").unwrap();

            let (b, t) = (&comparison.baseline, &comparison.treatment);
            writeln!(output, "| Count | {} | {} |", b.count, t.count).unwrap();

            for (label, bv, tv) in [
                ("Mean", b.mean, t.mean),
                ("P50", b.p50, t.p50),
                ("P95", b.p95, t.p95),
                ("P99", b.p99, t.p99),
                ("Min", b.min, t.min),
                ("Max", b.max, t.max),
            ] {
                writeln!(output, "| {} | {} | {} |", label, fmt(bv), fmt(tv)).unwrap();
            }

            writeln!(output).unwrap();
            writeln!(
                output,
                "Mean delta: {} ({})",
                TextReporter::format_signed(comparison.delta, &format!(" {}", kind.unit())),
                TextReporter::format_signed(comparison.percent_change, "%")
            )
            .unwrap();
            writeln!(output).unwrap();
        }

        output
    }

    /// @ai:intent List sessions lacking metrics, if any
    /// @ai:effects pure
    fn generate_warnings(report: &ComparisonReport) -> String {
        let mut output = String::new();

        let missing: Vec<_> = report
            .baseline
            .missing
            .iter()
            .map(|m| (&report.baseline.name, m))
            .chain(report.treatment.missing.iter().map(|m| (&report.treatment.name, m)))
            .collect();

        let mismatches: Vec<_> = report
            .baseline
            .totals
            .mismatches
            .iter()
            .chain(report.treatment.totals.mismatches.iter())
            .collect();

        if missing.is_empty() && mismatches.is_empty() {
            return output;
        }

        writeln!(output, "## Warnings").unwrap();
        writeln!(output).unwrap();

        for (name, m) in missing {
            writeln!(output, "- {}: {}", name, m).unwrap();
        }

        for m in mismatches {
            writeln!(
                output,
                "- session {} declares {} samples but recorded {}",
                m.session_id, m.declared_samples, m.observed_samples
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &ComparisonReport, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_summary(report));
        content.push_str(&Self::generate_totals_table(&report.baseline, &report.treatment));
        content.push_str(&Self::generate_metric_sections(report));
        content.push_str(&Self::generate_warnings(report));

        std::fs::write(output_path, content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}
