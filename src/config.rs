//! @ai:module:intent Configuration structs for the analyzer
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalyzerConfig, PathConfig, PatternConfig, LabelConfig, ChartConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the analyzer
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub charts: ChartConfig,
}

/// @ai:intent Input and output locations
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_plots_dir")]
    pub plots_dir: PathBuf,
}

/// @ai:intent File name patterns selecting each configuration's sessions
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_baseline_pattern")]
    pub baseline: String,
    #[serde(default = "default_treatment_pattern")]
    pub treatment: String,
    #[serde(default)]
    pub recursive: bool,
}

/// @ai:intent Display names for the two configurations
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_baseline_label")]
    pub baseline: String,
    #[serde(default = "default_treatment_label")]
    pub treatment: String,
}

/// @ai:intent Chart rendering options
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            plots_dir: default_plots_dir(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline_pattern(),
            treatment: default_treatment_pattern(),
            recursive: false,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline_label(),
            treatment: default_treatment_label(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("comparison")
}

fn default_plots_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_baseline_pattern() -> String {
    "baseline_test*_peer*.json".to_string()
}

fn default_treatment_pattern() -> String {
    "e2ee_test*_peer*.json".to_string()
}

fn default_baseline_label() -> String {
    "Baseline".to_string()
}

fn default_treatment_label() -> String {
    "E2EE".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chart_width() -> u32 {
    1650
}

fn default_chart_height() -> u32 {
    1200
}

impl AnalyzerConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: AnalyzerConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.patterns.baseline, "baseline_test*_peer*.json");
        assert_eq!(config.labels.treatment, "E2EE");
        assert!(config.charts.enabled);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: AnalyzerConfig = toml::from_str(
            r#"
[patterns]
treatment = "insertable_*.json"

[charts]
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(config.patterns.treatment, "insertable_*.json");
        assert_eq!(config.patterns.baseline, "baseline_test*_peer*.json");
        assert!(!config.charts.enabled);
        assert_eq!(config.charts.width, 1650);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rtcperf.toml");

        let mut config = AnalyzerConfig::default();
        config.labels.treatment = "SFrame".to_string();
        config.save(&path).unwrap();

        let loaded = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
