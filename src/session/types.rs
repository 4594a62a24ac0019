//! @ai:module:intent Sample model for per-session telemetry
//! @ai:module:layer domain
//! @ai:module:public_api MetricKind, MetricSample, MetricSeries, TelemetrySession, SessionSummary, DeclaredStatistics
//! @ai:module:stateless true

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Sampling period assumed when a session file does not declare one.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// @ai:intent Closed set of measured quantities
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Latency,
    Jitter,
    PacketLoss,
    Bitrate,
    FrameRate,
}

impl MetricKind {
    /// Every metric kind, in display order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Latency,
        MetricKind::Jitter,
        MetricKind::PacketLoss,
        MetricKind::Bitrate,
        MetricKind::FrameRate,
    ];

    /// @ai:intent Name used for this metric in session files
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Latency => "latency",
            MetricKind::Jitter => "jitter",
            MetricKind::PacketLoss => "packetLoss",
            MetricKind::Bitrate => "bitrate",
            MetricKind::FrameRate => "frameRate",
        }
    }

    /// @ai:intent Display unit downstream labels rely on
    /// @ai:effects pure
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Latency | MetricKind::Jitter => "ms",
            MetricKind::PacketLoss => "%",
            MetricKind::Bitrate => "kb/s",
            MetricKind::FrameRate => "fps",
        }
    }

    /// @ai:intent Human-readable title for tables and charts
    /// @ai:effects pure
    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::Latency => "Latency",
            MetricKind::Jitter => "Jitter",
            MetricKind::PacketLoss => "Packet Loss",
            MetricKind::Bitrate => "Bitrate",
            MetricKind::FrameRate => "Frame Rate",
        }
    }

    /// @ai:intent Look up a metric kind by its session-file name
    /// @ai:effects pure
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A single timestamped observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub value: f64,
}

/// @ai:intent Chronological samples of one metric kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSeries(Vec<MetricSample>);

impl MetricSeries {
    /// @ai:intent Wrap samples, keeping their insertion order
    /// @ai:effects pure
    pub fn new(samples: Vec<MetricSample>) -> Self {
        Self(samples)
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// @ai:intent Iterate sample values in insertion order
    /// @ai:effects pure
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|s| s.value)
    }
}

impl From<Vec<MetricSample>> for MetricSeries {
    fn from(samples: Vec<MetricSample>) -> Self {
        Self::new(samples)
    }
}

/// @ai:intent Statistics a producer precomputed for one metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredStatistics {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub p50: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub p95: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub p99: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max: Option<f64>,
}

/// @ai:intent Producer-side summary attached to a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub duration_ms: Option<u64>,
    pub samples: Option<u64>,
    pub metrics: BTreeMap<MetricKind, DeclaredStatistics>,
}

/// @ai:intent One measurement run, validated and read-only to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySession {
    pub session_id: String,
    pub interval_ms: u64,
    pub metrics: BTreeMap<MetricKind, MetricSeries>,
    pub summary: Option<SessionSummary>,
    pub duration_ms: u64,
    pub sample_count: u64,
}

impl TelemetrySession {
    /// @ai:intent Build a session, deriving totals from the summary or the latency series
    /// @ai:effects pure
    pub fn new(
        session_id: impl Into<String>,
        interval_ms: u64,
        metrics: BTreeMap<MetricKind, MetricSeries>,
        summary: Option<SessionSummary>,
    ) -> Self {
        let latency_len = metrics
            .get(&MetricKind::Latency)
            .map(|s| s.len() as u64)
            .unwrap_or(0);

        let sample_count = summary
            .as_ref()
            .and_then(|s| s.samples)
            .unwrap_or(latency_len);

        let duration_ms = summary
            .as_ref()
            .and_then(|s| s.duration_ms)
            .unwrap_or(0);

        Self {
            session_id: session_id.into(),
            interval_ms,
            metrics,
            summary,
            duration_ms,
            sample_count,
        }
    }

    /// @ai:intent Series for a metric kind, if the session recorded it
    /// @ai:effects pure
    pub fn series(&self, kind: MetricKind) -> Option<&MetricSeries> {
        self.metrics.get(&kind)
    }

    /// @ai:intent Declared statistics for a metric kind, if the producer supplied them
    /// @ai:effects pure
    pub fn declared(&self, kind: MetricKind) -> Option<&DeclaredStatistics> {
        self.summary.as_ref().and_then(|s| s.metrics.get(&kind))
    }
}

/// @ai:intent Raw session structure from a JSON file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub interval: Option<u64>,
    #[serde(default)]
    pub metrics: BTreeMap<String, Vec<MetricSample>>,
    #[serde(default)]
    pub summary: Option<SummaryFile>,
}

/// @ai:intent Raw summary block from a JSON file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFile {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub samples: Option<f64>,
    pub latency: Option<DeclaredStatistics>,
    pub jitter: Option<DeclaredStatistics>,
    pub packet_loss: Option<DeclaredStatistics>,
    pub bitrate: Option<DeclaredStatistics>,
    pub frame_rate: Option<DeclaredStatistics>,
}

impl SummaryFile {
    /// @ai:intent Move per-metric declared statistics into a keyed map
    /// @ai:effects pure
    pub fn take_metrics(&mut self) -> BTreeMap<MetricKind, DeclaredStatistics> {
        [
            (MetricKind::Latency, self.latency.take()),
            (MetricKind::Jitter, self.jitter.take()),
            (MetricKind::PacketLoss, self.packet_loss.take()),
            (MetricKind::Bitrate, self.bitrate.take()),
            (MetricKind::FrameRate, self.frame_rate.take()),
        ]
        .into_iter()
        .filter_map(|(kind, stats)| stats.map(|s| (kind, s)))
        .collect()
    }
}

/// Accepts a JSON number or a numeric string (producers emit `toFixed` output).
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(v)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid number {text:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> MetricSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| MetricSample {
                timestamp: 1_700_000_000_000 + i as i64 * 1000,
                value,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_metric_kind_units() {
        assert_eq!(MetricKind::Latency.unit(), "ms");
        assert_eq!(MetricKind::Jitter.unit(), "ms");
        assert_eq!(MetricKind::PacketLoss.unit(), "%");
        assert_eq!(MetricKind::Bitrate.unit(), "kb/s");
        assert_eq!(MetricKind::FrameRate.unit(), "fps");
    }

    #[test]
    fn test_metric_kind_names_round_trip() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(MetricKind::from_name("rtt"), None);
        assert_eq!(
            serde_json::to_string(&MetricKind::PacketLoss).unwrap(),
            "\"packetLoss\""
        );
    }

    #[test]
    fn test_sample_count_falls_back_to_latency_series_duration_to_zero() {
        let mut metrics = BTreeMap::new();
        metrics.insert(MetricKind::Latency, series(&[10.0, 20.0, 30.0]));

        let session = TelemetrySession::new("s1", 500, metrics, None);
        assert_eq!(session.sample_count, 3);
        assert_eq!(session.duration_ms, 0);
    }

    #[test]
    fn test_session_totals_prefer_declared_summary() {
        let mut metrics = BTreeMap::new();
        metrics.insert(MetricKind::Latency, series(&[10.0, 20.0]));
        let summary = SessionSummary {
            duration_ms: Some(60_000),
            samples: Some(60),
            metrics: BTreeMap::new(),
        };

        let session = TelemetrySession::new("s1", 1000, metrics, Some(summary));
        assert_eq!(session.sample_count, 60);
        assert_eq!(session.duration_ms, 60_000);
    }

    #[test]
    fn test_declared_statistics_accept_numeric_strings() {
        let stats: DeclaredStatistics =
            serde_json::from_str(r#"{"mean": "12.50", "p95": 20, "max": null}"#).unwrap();
        assert_eq!(stats.mean, Some(12.5));
        assert_eq!(stats.p95, Some(20.0));
        assert_eq!(stats.p50, None);
        assert_eq!(stats.max, None);
    }

    #[test]
    fn test_declared_statistics_reject_garbage() {
        let result = serde_json::from_str::<DeclaredStatistics>(r#"{"mean": "fast"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_file_take_metrics() {
        let mut summary: SummaryFile = serde_json::from_str(
            r#"{"duration": 1000, "samples": 1, "packetLoss": {"mean": 0.5}}"#,
        )
        .unwrap();
        let metrics = summary.take_metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[&MetricKind::PacketLoss].mean, Some(0.5));
    }
}
