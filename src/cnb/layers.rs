//! Reading and writing the TOML files exchanged with the lifecycle.

use super::plan::{BuildPlan, BuildPlanProvide, BuildPlanRequire, BuildpackPlan, DetectResult};
use super::process::{BuildResult, Process, UnmetPlanEntry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const LAUNCH_TOML: &str = "launch.toml";
pub const BUILD_TOML: &str = "build.toml";

/// Detect output: the first plan at the top level, the rest as `[[or]]` alternatives.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PlanToml {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<BuildPlanProvide>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<BuildPlanRequire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<BuildPlan>,
}

impl From<&DetectResult> for PlanToml {
    fn from(result: &DetectResult) -> Self {
        let mut plans = result.plans.iter().cloned();
        let first = plans.next().unwrap_or_default();
        Self {
            provides: first.provides,
            requires: first.requires,
            or: plans.collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LaunchToml {
    #[serde(default)]
    pub processes: Vec<Process>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BuildToml {
    #[serde(default)]
    pub unmet: Vec<UnmetPlanEntry>,
}

pub fn write_plan(path: &Path, result: &DetectResult) -> Result<()> {
    let content = toml::to_string(&PlanToml::from(result)).context("Failed to serialize build plan")?;
    fs::write(path, content).context(format!("Failed to write build plan {}", path.display()))?;
    debug!(path = %path.display(), plans = result.plans.len(), "Wrote build plan");
    Ok(())
}

pub fn read_buildpack_plan(path: &Path) -> Result<BuildpackPlan> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read buildpack plan {}", path.display()))?;
    toml::from_str(&content).context(format!("Failed to parse buildpack plan {}", path.display()))
}

/// Persists processes to `launch.toml` and unmet entries to `build.toml`.
/// Files with nothing to say are not written.
pub fn write_build_result(layers_path: &Path, result: &BuildResult) -> Result<()> {
    if !result.processes.is_empty() {
        let launch = LaunchToml {
            processes: result.processes.clone(),
        };
        write_toml(&layers_path.join(LAUNCH_TOML), &launch)?;
    }

    if !result.unmet.is_empty() {
        let build = BuildToml {
            unmet: result.unmet.clone(),
        };
        write_toml(&layers_path.join(BUILD_TOML), &build)?;
    }

    Ok(())
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content =
        toml::to_string(value).context(format!("Failed to serialize {}", path.display()))?;
    fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Wrote lifecycle file");
    Ok(())
}
