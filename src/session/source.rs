//! @ai:module:intent Resolve where each configuration's sessions come from
//! @ai:module:layer application
//! @ai:module:public_api SessionSource, load_comparison

use crate::error::{Error, Result};
use crate::session::loader::{FilePattern, SessionLoaderTrait};
use crate::session::types::TelemetrySession;
use std::fmt;
use std::path::{Path, PathBuf};

/// @ai:intent Origin of one configuration's session files
#[derive(Debug, Clone)]
pub enum SessionSource {
    /// Files in `dir` whose names match `pattern`.
    Pattern { dir: PathBuf, pattern: FilePattern },
    /// Explicitly named files, possibly spread over several directories.
    Files(Vec<PathBuf>),
}

impl SessionSource {
    /// @ai:intent Source discovering files by glob pattern
    /// @ai:effects pure
    pub fn pattern(dir: impl Into<PathBuf>, pattern: &str) -> Result<Self> {
        Ok(Self::Pattern {
            dir: dir.into(),
            pattern: FilePattern::new(pattern)?,
        })
    }

    /// @ai:intent Source made of explicitly listed files
    /// @ai:effects pure
    pub fn files(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self::Files(paths.into_iter().collect())
    }

    /// @ai:intent Paths this source refers to
    /// @ai:effects fs:read
    pub fn resolve<L: SessionLoaderTrait + ?Sized>(&self, loader: &L) -> Result<Vec<PathBuf>> {
        match self {
            SessionSource::Pattern { dir, pattern } => loader.find_matching(dir, pattern),
            SessionSource::Files(paths) => Ok(paths.clone()),
        }
    }
}

impl fmt::Display for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSource::Pattern { dir, pattern } => {
                write!(f, "{}", dir.join(pattern.as_str()).display())
            }
            SessionSource::Files(paths) if paths.is_empty() => write!(f, "no files"),
            SessionSource::Files(paths) => {
                let names: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}

/// @ai:intent Load one side; a source with no files yields no sessions
/// @ai:effects fs:read, log
fn load_side<L: SessionLoaderTrait + ?Sized>(
    loader: &L,
    label: &str,
    source: &SessionSource,
) -> Result<Vec<TelemetrySession>> {
    let paths = match source.resolve(loader) {
        Ok(paths) => paths,
        Err(e) if e.is_empty_input() => {
            tracing::warn!("{}: {}", label, e);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    if paths.is_empty() {
        tracing::warn!("{}: no session files given", label);
        return Ok(Vec::new());
    }

    tracing::info!("Found {} {} files:", paths.len(), label);

    for path in &paths {
        let name = path.file_name().map(Path::new).unwrap_or(path.as_path());
        tracing::info!("  - {}", name.display());
    }

    loader.load_files(&paths)
}

/// @ai:intent Load baseline and treatment sessions for a comparison
/// @ai:effects fs:read, log
///
/// A side without any session files is reported with a warning and comes back
/// empty, so its statistics are undefined. Only when neither side has
/// sessions does loading fail, with [`Error::NoSessions`]. Unreadable or
/// malformed files always abort.
pub fn load_comparison<L: SessionLoaderTrait + ?Sized>(
    loader: &L,
    baseline: &SessionSource,
    treatment: &SessionSource,
) -> Result<(Vec<TelemetrySession>, Vec<TelemetrySession>)> {
    let baseline_sessions = load_side(loader, "baseline", baseline)?;
    let treatment_sessions = load_side(loader, "treatment", treatment)?;

    if baseline_sessions.is_empty() && treatment_sessions.is_empty() {
        return Err(Error::NoSessions {
            baseline: baseline.to_string(),
            treatment: treatment.to_string(),
        });
    }

    Ok((baseline_sessions, treatment_sessions))
}
