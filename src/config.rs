//! Configuration resolution for the buildpack
//!
//! Settings are declared in `buildpack.toml` under `[[metadata.configurations]]`, each with
//! a name, a default and a description. At detect and build time the process environment
//! is overlaid on those defaults.
//!
//! # Environment Variables
//!
//! - `BP_APPLICATION_SCRIPT`: glob locating the application start script - default: `*/bin/*`
//! - `BP_LIVE_RELOAD_ENABLED`: wrap the start script in `watchexec` - default: `false`
//! - `BP_LOG_LEVEL`: logging level - default: `info`
//!
//! Whether a value came from the environment matters: [`ConfigurationResolver::resolve`]
//! reports it alongside the value so callers can tell an explicit override from a default.

use crate::cnb::{Buildpack, Configuration};
use std::collections::HashMap;
use std::env;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Duplicate configuration: {0}")]
    DuplicateConfiguration(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Resolves configuration values from the environment, falling back to buildpack defaults.
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    configurations: Vec<Configuration>,
    environment: HashMap<String, String>,
}

impl ConfigurationResolver {
    /// Snapshots the current process environment.
    pub fn new(buildpack: &Buildpack) -> Self {
        let environment = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::with_environment(buildpack, environment)
    }

    pub fn with_environment(buildpack: &Buildpack, environment: HashMap<String, String>) -> Self {
        Self {
            configurations: buildpack.metadata.configurations.clone(),
            environment,
        }
    }

    /// Returns the value for `name` and whether it was explicitly set in the environment.
    ///
    /// Unset names resolve to the declared default, or an empty string if none is declared.
    pub fn resolve(&self, name: &str) -> (String, bool) {
        if let Some(value) = self.environment.get(name) {
            return (value.clone(), true);
        }

        let default = self
            .configurations
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.default.clone())
            .unwrap_or_default();
        (default, false)
    }

    pub fn resolve_bool(&self, name: &str) -> bool {
        let (value, _) = self.resolve(name);
        if value.is_empty() {
            return false;
        }

        match parse_bool(&value) {
            Some(b) => b,
            None => {
                warn!("invalid value '{}' for key {}: expected one of [1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False]", value, name);
                false
            }
        }
    }

    /// Logs the effective value of every build-time configuration.
    pub fn log_configuration(&self) {
        let build: Vec<&Configuration> = self.configurations.iter().filter(|c| c.build).collect();
        if build.is_empty() {
            return;
        }

        info!("Build Configuration:");
        let width = build.iter().map(|c| c.name.len() + 1).max().unwrap_or(0);
        for configuration in build {
            let (value, explicit) = self.resolve(&configuration.name);
            let source = if explicit { "" } else { " (default)" };
            let line = format!(
                "  {:<width$}  {}{}  {}",
                format!("${}", configuration.name),
                value,
                source,
                configuration.description,
                width = width
            );
            info!("{}", line);
        }
    }
}

/// Accepts the same spellings as the lifecycle's boolean settings.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Renders the hint shown to users about a setting they can change.
pub fn format_user_config(name: &str, description: &str, default: &str) -> String {
    format!(
        "Set ${} to configure {}. Default {}.",
        name, description, default
    )
}
