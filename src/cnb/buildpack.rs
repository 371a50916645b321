use crate::config::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const BUILDPACK_TOML: &str = "buildpack.toml";

/// Parsed `buildpack.toml` descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buildpack {
    #[serde(default)]
    pub api: String,

    #[serde(rename = "buildpack", default)]
    pub info: BuildpackInfo,

    #[serde(default)]
    pub metadata: BuildpackMetadata,

    /// Directory the descriptor was loaded from
    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildpackInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "sbom-formats", default)]
    pub sbom_formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildpackMetadata {
    #[serde(default)]
    pub configurations: Vec<Configuration>,
}

/// A user-facing setting declared under `[[metadata.configurations]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub build: bool,
    #[serde(default)]
    pub launch: bool,
}

impl Buildpack {
    /// Loads `buildpack.toml` from the buildpack root directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let file = dir.join(BUILDPACK_TOML);
        let content =
            fs::read_to_string(&file).context(format!("Failed to read {}", file.display()))?;
        let mut buildpack = Self::parse(&content)
            .context(format!("Failed to parse {}", file.display()))?;
        buildpack.path = dir.to_path_buf();
        Ok(buildpack)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let buildpack: Buildpack = toml::from_str(content)?;
        buildpack.validate()?;
        Ok(buildpack)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for configuration in &self.metadata.configurations {
            if configuration.name.is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "configuration entries must have a name".to_string(),
                ));
            }
            if !seen.insert(configuration.name.as_str()) {
                return Err(ConfigError::DuplicateConfiguration(
                    configuration.name.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Human-readable title, e.g. `Paketo Buildpack for DistZip 1.2.3`
    pub fn title(&self) -> String {
        if self.info.version.is_empty() {
            self.info.name.clone()
        } else {
            format!("{} {}", self.info.name, self.info.version)
        }
    }

    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.metadata.configurations.iter().find(|c| c.name == name)
    }
}
