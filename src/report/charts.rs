//! @ai:module:intent Chart generation for sessions and comparisons
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait
//! @ai:module:stateless true

use crate::config::ChartConfig;
use crate::metrics::{compute_statistics, timeline, AggregateStatistics, ComparisonReport};
use crate::session::{MetricKind, TelemetrySession};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Metrics drawn in per-session and comparison charts.
pub const CHART_METRICS: [MetricKind; 4] = [
    MetricKind::Latency,
    MetricKind::Jitter,
    MetricKind::PacketLoss,
    MetricKind::Bitrate,
];

const ORANGE: RGBColor = RGBColor(255, 140, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);
const STEEL_BLUE: RGBColor = RGBColor(31, 119, 180);
const BAR_ORANGE: RGBColor = RGBColor(255, 127, 14);

/// One group of bars: statistic label, baseline value, treatment value.
pub type BarGroup = (&'static str, Option<f64>, Option<f64>);

/// @ai:intent Horizontal marker for a summary statistic
#[derive(Debug, Clone)]
pub struct ReferenceLine {
    pub label: &'static str,
    pub value: f64,
    color: RGBColor,
}

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Render time series charts for one session
    fn session_charts(&self, session: &TelemetrySession, output_dir: &Path) -> Result<Vec<String>>;

    /// @ai:intent Render the overall baseline vs treatment bar chart
    fn comparison_chart(&self, report: &ComparisonReport, output_dir: &Path) -> Result<String>;
}

/// @ai:intent Generates PNG charts with plotters
pub struct ChartGenerator {
    width: u32,
    height: u32,
}

impl ChartGenerator {
    /// @ai:intent Create a chart generator with default dimensions
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::from_config(&ChartConfig::default())
    }

    /// @ai:intent Create a chart generator from chart configuration
    /// @ai:effects pure
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            width: config.width.max(200),
            height: config.height.max(200),
        }
    }

    /// @ai:intent Render one metric's time series with its reference lines
    /// @ai:effects draw
    fn draw_timeseries(
        area: &Area<'_>,
        kind: MetricKind,
        points: &[(f64, f64)],
        caption: &str,
    ) -> Result<()> {
        let values: Vec<f64> = points.iter().map(|p| p.1).collect();
        let lines = reference_lines(kind, &compute_statistics(&values));

        let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);
        let y_range = value_range(values.iter().copied().chain(lines.iter().map(|l| l.value)));

        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Time (seconds)")
            .y_desc(format!("{} ({})", kind.title(), kind.unit()))
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            series_color(kind).stroke_width(1),
        ))?;

        for line in &lines {
            let color = line.color;

            chart
                .draw_series(LineSeries::new(
                    vec![(0.0, line.value), (x_max, line.value)],
                    color.stroke_width(2),
                ))?
                .label(format!("{}: {:.2} {}", line.label, line.value, kind.unit()))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        if !lines.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    }

    /// @ai:intent Render grouped MEAN/P95/P99 bars for one metric
    /// @ai:effects draw
    fn draw_bar_group(
        area: &Area<'_>,
        kind: MetricKind,
        groups: &[BarGroup],
        labels: (&str, &str),
    ) -> Result<()> {
        let y_range = bar_range(groups.iter().flat_map(|(_, b, t)| [*b, *t]).flatten());

        let mut chart = ChartBuilder::on(area)
            .caption(format!("{} Comparison", kind.title()), ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..groups.len() as f64, y_range)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(groups.len() * 2 + 1)
            .x_label_formatter(&|x| group_label(groups, *x))
            .y_desc(format!("{} ({})", kind.title(), kind.unit()))
            .draw()?;

        // undefined statistics draw no bar
        chart
            .draw_series(groups.iter().enumerate().filter_map(|(i, (_, baseline, _))| {
                baseline.map(|v| {
                    Rectangle::new(
                        [(i as f64 + 0.1, 0.0), (i as f64 + 0.5, v)],
                        STEEL_BLUE.mix(0.85).filled(),
                    )
                })
            }))?
            .label(labels.0)
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], STEEL_BLUE.mix(0.85).filled()));

        chart
            .draw_series(groups.iter().enumerate().filter_map(|(i, (_, _, treatment))| {
                treatment.map(|v| {
                    Rectangle::new(
                        [(i as f64 + 0.5, 0.0), (i as f64 + 0.9, v)],
                        BAR_ORANGE.mix(0.85).filled(),
                    )
                })
            }))?
            .label(labels.1)
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BAR_ORANGE.mix(0.85).filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }

    /// @ai:intent Write a single-metric time series chart
    /// @ai:effects fs:write
    fn generate_metric_chart(
        &self,
        session: &TelemetrySession,
        kind: MetricKind,
        points: &[(f64, f64)],
        output_path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, (self.width, self.height / 2)).into_drawing_area();
        root.fill(&WHITE)?;

        let caption = format!("{} - {}", kind.title(), session.session_id);
        Self::draw_timeseries(&root, kind, points, &caption)?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Write the 2x2 overview of a session's metrics
    /// @ai:effects fs:write
    fn generate_combined_chart(&self, session: &TelemetrySession, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let root = root.titled(
            &format!("Performance Metrics - {}", session.session_id),
            ("sans-serif", 30),
        )?;

        for (area, kind) in root.split_evenly((2, 2)).iter().zip(CHART_METRICS) {
            if let Some(points) = timeline(session, kind) {
                Self::draw_timeseries(area, kind, &points, kind.title())?;
            }
        }

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Render per-metric and combined charts for a session
    /// @ai:effects fs:write
    fn session_charts(&self, session: &TelemetrySession, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        for kind in CHART_METRICS {
            let Some(points) = timeline(session, kind) else {
                tracing::info!("No {} data available for {}", kind, session.session_id);
                continue;
            };

            let file_name = format!("{}.png", file_slug(kind.title()));
            self.generate_metric_chart(session, kind, &points, &output_dir.join(&file_name))?;
            generated.push(file_name);
        }

        let combined = "combined_metrics.png".to_string();
        self.generate_combined_chart(session, &output_dir.join(&combined))?;
        generated.push(combined);

        Ok(generated)
    }

    /// @ai:intent Render the 2x2 grouped bar chart comparing configurations
    /// @ai:effects fs:write
    fn comparison_chart(&self, report: &ComparisonReport, output_dir: &Path) -> Result<String> {
        std::fs::create_dir_all(output_dir)?;

        let file_name = format!(
            "{}_vs_{}_overall.png",
            file_slug(&report.baseline.name),
            file_slug(&report.treatment.name)
        );
        let output_path = output_dir.join(&file_name);

        let root = BitMapBackend::new(&output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let root = root.titled(
            &format!(
                "{} vs {} - Overall Comparison",
                report.baseline.name, report.treatment.name
            ),
            ("sans-serif", 30),
        )?;

        let labels = (report.baseline.name.as_str(), report.treatment.name.as_str());

        for (area, kind) in root.split_evenly((2, 2)).iter().zip(CHART_METRICS) {
            Self::draw_bar_group(area, kind, &bar_groups(report, kind), labels)?;
        }

        root.present()?;
        Ok(file_name)
    }
}

/// @ai:intent Statistic markers drawn on a metric's time series
/// @ai:effects pure
pub fn reference_lines(kind: MetricKind, stats: &AggregateStatistics) -> Vec<ReferenceLine> {
    let candidates = match kind {
        MetricKind::Latency => vec![
            ("Mean", stats.mean, DARK_GREEN),
            ("P95", stats.p95, ORANGE),
            ("P99", stats.p99, RED),
        ],
        MetricKind::Jitter => vec![("Mean", stats.mean, DARK_GREEN), ("P95", stats.p95, RED)],
        MetricKind::PacketLoss => vec![("Mean", stats.mean, ORANGE)],
        MetricKind::Bitrate | MetricKind::FrameRate => vec![("Mean", stats.mean, DARK_GREEN)],
    };

    candidates
        .into_iter()
        .filter_map(|(label, value, color)| value.map(|value| ReferenceLine { label, value, color }))
        .collect()
}

/// @ai:intent MEAN/P95/P99 values of both sides for one metric
/// @ai:effects pure
pub fn bar_groups(report: &ComparisonReport, kind: MetricKind) -> [BarGroup; 3] {
    let baseline = report.baseline.statistics(kind);
    let treatment = report.treatment.statistics(kind);

    [
        ("MEAN", baseline.mean, treatment.mean),
        ("P95", baseline.p95, treatment.p95),
        ("P99", baseline.p99, treatment.p99),
    ]
}

fn series_color(kind: MetricKind) -> RGBColor {
    match kind {
        MetricKind::Latency | MetricKind::FrameRate => STEEL_BLUE,
        MetricKind::Jitter => PURPLE,
        MetricKind::PacketLoss => RED,
        MetricKind::Bitrate => BLUE,
    }
}

/// Padded range covering every value; `0..1` when there is nothing to show.
fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }

    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        hi.abs().max(1.0) * 0.05
    };

    (lo - pad)..(hi + pad)
}

/// Range anchored at zero with headroom above the tallest bar.
fn bar_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if hi - lo <= 0.0 {
        return 0.0..1.0;
    }

    (lo * 1.15)..(hi * 1.15)
}

fn group_label(groups: &[BarGroup], x: f64) -> String {
    let idx = (x - 0.5).round();

    if idx < 0.0 || (x - 0.5 - idx).abs() > 1e-6 {
        return String::new();
    }

    groups
        .get(idx as usize)
        .map(|(label, _, _)| label.to_string())
        .unwrap_or_default()
}

/// @ai:intent Lowercase file-name fragment from a display name
/// @ai:effects pure
pub fn file_slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{compare_configurations, ConfigurationAggregate};

    #[test]
    fn test_reference_lines_per_metric() {
        let stats = compute_statistics(&[10.0, 20.0, 30.0]);

        let latency: Vec<_> = reference_lines(MetricKind::Latency, &stats)
            .iter()
            .map(|l| l.label)
            .collect();
        assert_eq!(latency, vec!["Mean", "P95", "P99"]);

        let jitter = reference_lines(MetricKind::Jitter, &stats);
        assert_eq!(jitter.len(), 2);
        assert_eq!(jitter[0].value, 20.0);

        assert_eq!(reference_lines(MetricKind::Bitrate, &stats).len(), 1);
    }

    #[test]
    fn test_reference_lines_skip_undefined_statistics() {
        let lines = reference_lines(MetricKind::Latency, &AggregateStatistics::empty());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_bar_groups_keep_undefined_values() {
        let mut baseline = ConfigurationAggregate {
            name: "Baseline".to_string(),
            ..Default::default()
        };
        baseline.values.insert(MetricKind::Jitter, vec![2.0, 4.0]);
        let treatment = ConfigurationAggregate {
            name: "E2EE".to_string(),
            ..Default::default()
        };

        let report = compare_configurations(&baseline, &treatment);
        let groups = bar_groups(&report, MetricKind::Jitter);

        assert_eq!(groups[0], ("MEAN", Some(3.0), None));
        assert_eq!(groups[1].0, "P95");
        assert!(groups.iter().all(|(_, _, t)| t.is_none()));
    }

    #[test]
    fn test_value_range_pads_and_handles_flat_data() {
        let range = value_range([10.0, 20.0].into_iter());
        assert!(range.start < 10.0 && range.end > 20.0);

        let flat = value_range([5.0, 5.0].into_iter());
        assert!(flat.start < 5.0 && flat.end > 5.0);

        assert_eq!(value_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn test_bar_range_starts_at_zero() {
        let range = bar_range([3.0, 12.0].into_iter());
        assert_eq!(range.start, 0.0);
        assert!(range.end > 12.0);
        assert_eq!(bar_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn test_group_label_at_bar_centres() {
        let groups: [BarGroup; 3] = [("MEAN", None, None), ("P95", None, None), ("P99", None, None)];
        assert_eq!(group_label(&groups, 0.5), "MEAN");
        assert_eq!(group_label(&groups, 2.5), "P99");
        assert_eq!(group_label(&groups, 1.0), "");
        assert_eq!(group_label(&groups, 3.5), "");
    }

    #[test]
    fn test_file_slug() {
        assert_eq!(file_slug("Packet Loss"), "packet_loss");
        assert_eq!(file_slug("E2EE"), "e2ee");
        assert_eq!(file_slug("  "), "unnamed");
    }
}
