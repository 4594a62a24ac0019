//! @ai:module:intent Report generation for session analyses and comparisons
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator, TextReporter

pub mod charts;
pub mod json_report;
pub mod markdown_report;
pub mod text_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};
pub use text_report::TextReporter;

use crate::config::ChartConfig;
use crate::metrics::ComparisonReport;
use crate::session::TelemetrySession;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: Option<ChartGenerator>,
}

impl ReportGenerator {
    /// @ai:intent Create a report generator with default charts
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::from_config(&ChartConfig::default())
    }

    /// @ai:intent Create a report generator honoring chart settings
    /// @ai:effects pure
    pub fn from_config(charts: &ChartConfig) -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: charts.enabled.then(|| ChartGenerator::from_config(charts)),
        }
    }

    /// @ai:intent Write JSON, Markdown and chart output for a comparison
    /// @ai:effects fs:write, log
    pub fn generate_comparison(&self, report: &ComparisonReport, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(report, &output_dir.join("comparison.json"))?;
        self.markdown
            .generate(report, &output_dir.join("comparison.md"))?;

        if let Some(charts) = &self.charts {
            let chart = charts.comparison_chart(report, output_dir)?;
            tracing::info!("Comparison chart saved as {}", chart);
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }

    /// @ai:intent Write time series charts for a single session
    /// @ai:effects fs:write, log
    pub fn generate_session(&self, session: &TelemetrySession, output_dir: &Path) -> Result<Vec<String>> {
        let Some(charts) = &self.charts else {
            tracing::info!("Charts disabled, skipping plots for {}", session.session_id);
            return Ok(Vec::new());
        };

        let generated = charts.session_charts(session, output_dir)?;

        for file in &generated {
            tracing::info!("Saved {}", output_dir.join(file).display());
        }

        Ok(generated)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{compare_configurations, ConfigurationAggregate};
    use tempfile::TempDir;

    #[test]
    fn test_generate_comparison_without_charts() {
        let temp = TempDir::new().unwrap();
        let generator = ReportGenerator::from_config(&ChartConfig {
            enabled: false,
            ..Default::default()
        });

        let report = compare_configurations(
            &ConfigurationAggregate::default(),
            &ConfigurationAggregate::default(),
        );
        generator.generate_comparison(&report, temp.path()).unwrap();

        assert!(temp.path().join("comparison.json").exists());
        assert!(temp.path().join("comparison.md").exists());
    }

    #[test]
    fn test_session_charts_skipped_when_disabled() {
        let temp = TempDir::new().unwrap();
        let generator = ReportGenerator::from_config(&ChartConfig {
            enabled: false,
            ..Default::default()
        });

        let session = TelemetrySession::new("peer-1", 1000, Default::default(), None);
        let generated = generator.generate_session(&session, temp.path()).unwrap();
        assert!(generated.is_empty());
    }
}
