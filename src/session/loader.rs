//! @ai:module:intent JSON session loader for telemetry files
//! @ai:module:layer infrastructure
//! @ai:module:public_api SessionLoader, SessionLoaderTrait, FilePattern
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::session::types::{
    MetricKind, MetricSeries, SessionFile, SessionSummary, TelemetrySession, DEFAULT_INTERVAL_MS,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Glob-style file name pattern (`*` and `?` wildcards)
#[derive(Debug, Clone)]
pub struct FilePattern {
    raw: String,
    regex: Regex,
}

impl FilePattern {
    /// @ai:intent Compile a glob pattern into an anchored regex
    /// @ai:effects pure
    pub fn new(pattern: &str) -> Result<Self> {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push('^');

        for ch in pattern.chars() {
            match ch {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }

        expr.push('$');

        let regex = Regex::new(&expr).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// @ai:intent Check a bare file name against the pattern
    /// @ai:effects pure
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// @ai:intent Trait for loading telemetry sessions
pub trait SessionLoaderTrait: Send + Sync {
    /// @ai:intent Load and validate a single session file
    fn load_file(&self, path: &Path) -> Result<TelemetrySession>;

    /// @ai:intent Find session files in a directory whose names match a pattern
    fn find_matching(&self, dir: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>>;

    /// @ai:intent Load every file in order, failing on the first broken one
    fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<TelemetrySession>> {
        paths.iter().map(|p| self.load_file(p)).collect()
    }

    /// @ai:intent Find and load all sessions matching a pattern
    fn load_matching(&self, dir: &Path, pattern: &FilePattern) -> Result<Vec<TelemetrySession>> {
        let paths = self.find_matching(dir, pattern)?;
        self.load_files(&paths)
    }
}

/// @ai:intent Loads telemetry sessions from JSON files
#[derive(Debug, Clone, Default)]
pub struct SessionLoader {
    recursive: bool,
}

impl SessionLoader {
    /// @ai:intent Create a loader that only looks at the top level of a directory
    /// @ai:effects pure
    pub fn new() -> Self {
        Self { recursive: false }
    }

    /// @ai:intent Create a loader that descends into subdirectories
    /// @ai:effects pure
    pub fn recursive() -> Self {
        Self { recursive: true }
    }

    /// @ai:intent Turn a decoded file into a validated session
    /// @ai:effects pure
    fn validate(path: &Path, file: SessionFile) -> Result<TelemetrySession> {
        let invalid = |message: String| Error::InvalidSession {
            path: path.to_path_buf(),
            message,
        };

        let interval_ms = file.interval.unwrap_or(DEFAULT_INTERVAL_MS);

        if interval_ms == 0 {
            return Err(invalid("interval must be positive".to_string()));
        }

        let session_id = file.session_id.unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "unknown".to_string())
        });

        let mut metrics = BTreeMap::new();

        for (name, samples) in file.metrics {
            let Some(kind) = MetricKind::from_name(&name) else {
                tracing::debug!("Ignoring unknown metric {:?} in {}", name, path.display());
                continue;
            };

            if let Some(bad) = samples.iter().find(|s| !s.value.is_finite()) {
                return Err(invalid(format!(
                    "non-finite {} value at timestamp {}",
                    kind, bad.timestamp
                )));
            }

            metrics.insert(kind, MetricSeries::new(samples));
        }

        let summary = match file.summary {
            Some(mut raw) => Some(SessionSummary {
                duration_ms: to_count(raw.duration, "summary.duration").map_err(invalid)?,
                samples: to_count(raw.samples, "summary.samples").map_err(invalid)?,
                metrics: raw.take_metrics(),
            }),
            None => None,
        };

        Ok(TelemetrySession::new(session_id, interval_ms, metrics, summary))
    }
}

/// Converts a declared non-negative quantity to an integer count, dropping any fraction.
fn to_count(value: Option<f64>, field: &str) -> std::result::Result<Option<u64>, String> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v.trunc() as u64)),
        Some(v) => Err(format!("{field} must be a non-negative number, got {v}")),
    }
}

impl SessionLoaderTrait for SessionLoader {
    /// @ai:intent Read, decode and validate a session file
    /// @ai:effects fs:read
    fn load_file(&self, path: &Path) -> Result<TelemetrySession> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: SessionFile = serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let session = Self::validate(path, file)?;
        tracing::debug!(
            "Loaded session {} from {} ({} metric series)",
            session.session_id,
            path.display(),
            session.metrics.len()
        );
        Ok(session)
    }

    /// @ai:intent List matching files sorted by path
    /// @ai:effects fs:read
    fn find_matching(&self, dir: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::Read {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| pattern.matches(name))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        if paths.is_empty() {
            return Err(Error::EmptyInput {
                dir: dir.to_path_buf(),
                pattern: pattern.as_str().to_string(),
            });
        }

        paths.sort();
        Ok(paths)
    }
}
