//! Locates the single launch script of a DistZip-style application.
//!
//! The pattern is a glob relative to the application root. The built-in default,
//! `*/bin/*`, matches the layout produced by Gradle's `distZip` task, which ships a POSIX
//! script and a Windows `.bat` wrapper side by side. When the default is in effect, `.bat`
//! files and files without an execute bit are dropped. A pattern supplied through
//! `$BP_APPLICATION_SCRIPT` is used as-is.

use crate::config::ConfigurationResolver;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const APPLICATION_SCRIPT: &str = "BP_APPLICATION_SCRIPT";
pub const DEFAULT_PATTERN: &str = "*/bin/*";

const BATCH_SUFFIX: &str = ".bat";
const AMBIGUITY_HINT: &str =
    "set a more strict `$BP_APPLICATION_SCRIPT` pattern that only matches a single script";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unable to find files with {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("unable to read candidates for {pattern}: {source}")]
    Io {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },
}

/// Outcome of a resolution. Only `Resolved` is a decision; the other two mean "no script".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(PathBuf),
    NotFound,
    Ambiguous {
        pattern: String,
        candidates: Vec<PathBuf>,
    },
}

impl Resolution {
    pub fn script(&self) -> Option<&Path> {
        match self {
            Resolution::Resolved(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Explanation of an ambiguous outcome, naming the pattern and every candidate.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Resolution::Ambiguous {
                pattern,
                candidates,
            } => {
                let listed: Vec<String> = candidates
                    .iter()
                    .map(|c| c.display().to_string())
                    .collect();
                Some(format!(
                    "too many application scripts in {}, candidates: [{}]",
                    pattern,
                    listed.join(" ")
                ))
            }
            _ => None,
        }
    }
}

/// The glob to resolve and whether the user chose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPattern {
    pub pattern: String,
    pub explicit: bool,
}

impl Default for ScriptPattern {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            explicit: false,
        }
    }
}

impl ScriptPattern {
    pub fn explicit(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            explicit: true,
        }
    }

    /// Reads `$BP_APPLICATION_SCRIPT`. Presence in the environment, not the value, decides
    /// whether the pattern counts as explicit.
    pub fn from_configuration(configuration: &ConfigurationResolver) -> Self {
        let (pattern, present) = configuration.resolve(APPLICATION_SCRIPT);
        if present {
            return Self::explicit(pattern);
        }
        if pattern.is_empty() {
            return Self::default();
        }
        Self {
            pattern,
            explicit: false,
        }
    }
}

pub struct ScriptResolver {
    application_path: PathBuf,
}

impl ScriptResolver {
    pub fn new(application_path: impl Into<PathBuf>) -> Self {
        Self {
            application_path: application_path.into(),
        }
    }

    pub fn resolve(&self, pattern: &ScriptPattern) -> Result<Resolution, ResolveError> {
        let expression = self.glob_expression(&pattern.pattern);
        debug!(pattern = %pattern.pattern, explicit = pattern.explicit, "Resolving application script");

        let paths = glob::glob_with(&expression, MatchOptions::new()).map_err(|source| {
            ResolveError::InvalidPattern {
                pattern: pattern.pattern.clone(),
                source,
            }
        })?;

        let mut candidates = Vec::new();
        for entry in paths {
            let path = entry.map_err(|source| ResolveError::Io {
                pattern: pattern.pattern.clone(),
                source,
            })?;

            if path.is_dir() {
                continue;
            }
            if !pattern.explicit && (is_batch_script(&path) || !is_executable(&path)) {
                continue;
            }
            candidates.push(path);
        }
        candidates.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        let resolution = match candidates.len() {
            0 => Resolution::NotFound,
            1 => Resolution::Resolved(candidates.remove(0)),
            _ => Resolution::Ambiguous {
                pattern: pattern.pattern.clone(),
                candidates,
            },
        };

        if let Some(diagnostic) = resolution.diagnostic() {
            debug!("{}", diagnostic);
            debug!("{}", AMBIGUITY_HINT);
        }

        Ok(resolution)
    }

    /// The application root is escaped so that glob metacharacters in it match literally.
    fn glob_expression(&self, pattern: &str) -> String {
        let root = Pattern::escape(&self.application_path.to_string_lossy());
        Path::new(&root)
            .join(pattern.trim_start_matches('/'))
            .to_string_lossy()
            .into_owned()
    }
}

fn is_batch_script(path: &Path) -> bool {
    path.to_string_lossy().ends_with(BATCH_SUFFIX)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
