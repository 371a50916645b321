use super::script_resolver::{ResolveError, ScriptPattern, ScriptResolver};
use crate::cnb::{BuildPlan, BuildPlanProvide, BuildPlanRequire, DetectResult};
use crate::config::ConfigurationResolver;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const PLAN_ENTRY_JVM_APPLICATION: &str = "jvm-application";
pub const PLAN_ENTRY_JVM_APPLICATION_PACKAGE: &str = "jvm-application-package";
pub const PLAN_ENTRY_JRE: &str = "jre";
pub const PLAN_ENTRY_WATCHEXEC: &str = "watchexec";
pub const PLAN_ENTRY_SYFT: &str = "syft";

pub const LIVE_RELOAD_ENABLED: &str = "BP_LIVE_RELOAD_ENABLED";

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("unable to detect application scripts: {0}")]
    Resolve(#[from] ResolveError),
}

pub struct DetectContext {
    pub application_path: PathBuf,
    pub configuration: ConfigurationResolver,
}

#[derive(Debug, Default)]
pub struct Detect;

impl Detect {
    pub fn detect(&self, context: &DetectContext) -> Result<DetectResult, DetectError> {
        let pattern = ScriptPattern::from_configuration(&context.configuration);
        let live_reload = context.configuration.resolve_bool(LIVE_RELOAD_ENABLED);
        derive_plan(&context.application_path, &pattern, live_reload)
    }
}

/// Builds the detect result for an application tree.
///
/// Detection always passes: an application without a single start script still takes
/// part in the build, it just doesn't offer `jvm-application-package`.
pub fn derive_plan(
    application_path: &Path,
    pattern: &ScriptPattern,
    live_reload: bool,
) -> Result<DetectResult, DetectError> {
    let mut result = DetectResult {
        pass: true,
        plans: vec![BuildPlan {
            provides: vec![BuildPlanProvide::new(PLAN_ENTRY_JVM_APPLICATION)],
            requires: vec![
                BuildPlanRequire::new(PLAN_ENTRY_SYFT),
                BuildPlanRequire::new(PLAN_ENTRY_JRE).with_metadata("launch", true),
                BuildPlanRequire::new(PLAN_ENTRY_JVM_APPLICATION_PACKAGE),
                BuildPlanRequire::new(PLAN_ENTRY_JVM_APPLICATION),
            ],
        }],
    };

    let resolution = ScriptResolver::new(application_path).resolve(pattern)?;
    if let Some(script) = resolution.script() {
        debug!(script = %script.display(), "Application script found");
        for plan in &mut result.plans {
            plan.provides
                .push(BuildPlanProvide::new(PLAN_ENTRY_JVM_APPLICATION_PACKAGE));
        }
    }

    if live_reload {
        for plan in &mut result.plans {
            plan.requires.push(BuildPlanRequire::new(PLAN_ENTRY_WATCHEXEC));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnb::Buildpack;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn provided(plan: &BuildPlan) -> Vec<&str> {
        plan.provides.iter().map(|p| p.name.as_str()).collect()
    }

    fn required(plan: &BuildPlan) -> Vec<&str> {
        plan.requires.iter().map(|r| r.name.as_str()).collect()
    }

    fn context(app: &Path, env: &[(&str, &str)]) -> DetectContext {
        let environment: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DetectContext {
            application_path: app.to_path_buf(),
            configuration: ConfigurationResolver::with_environment(&Buildpack::default(), environment),
        }
    }

    fn write_script(app: &Path, relative: &str) {
        let path = app.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn test_baseline_plan_without_script() {
        let app = TempDir::new().unwrap();

        let result = Detect.detect(&context(app.path(), &[])).unwrap();

        assert!(result.pass);
        assert_eq!(result.plans.len(), 1);
        let plan = &result.plans[0];
        assert_eq!(provided(plan), vec!["jvm-application"]);
        assert_eq!(
            required(plan),
            vec!["syft", "jre", "jvm-application-package", "jvm-application"]
        );
        assert_eq!(
            plan.requires[1].metadata.get("launch"),
            Some(&toml::Value::Boolean(true))
        );
    }

    #[test]
    fn test_script_provides_package() {
        let app = TempDir::new().unwrap();
        write_script(app.path(), "app/bin/start");

        let result = Detect.detect(&context(app.path(), &[])).unwrap();

        assert_eq!(
            provided(&result.plans[0]),
            vec!["jvm-application", "jvm-application-package"]
        );
    }

    #[test]
    fn test_ambiguous_scripts_omit_package() {
        let app = TempDir::new().unwrap();
        write_script(app.path(), "app/bin/script-1");
        write_script(app.path(), "app/bin/script-2");

        let result = Detect.detect(&context(app.path(), &[])).unwrap();

        assert!(result.pass);
        assert!(!result.plans[0].provides(PLAN_ENTRY_JVM_APPLICATION_PACKAGE));
    }

    #[test]
    fn test_live_reload_requires_watchexec() {
        let app = TempDir::new().unwrap();

        let result = Detect
            .detect(&context(app.path(), &[(LIVE_RELOAD_ENABLED, "true")]))
            .unwrap();

        assert_eq!(
            result.plans[0].requires.last().map(|r| r.name.as_str()),
            Some(PLAN_ENTRY_WATCHEXEC)
        );
    }

    #[test]
    fn test_explicit_pattern_used() {
        let app = TempDir::new().unwrap();
        write_script(app.path(), "bin/start.bat");

        let implicit = Detect.detect(&context(app.path(), &[])).unwrap();
        assert!(!implicit.plans[0].provides(PLAN_ENTRY_JVM_APPLICATION_PACKAGE));

        let explicit = Detect
            .detect(&context(app.path(), &[("BP_APPLICATION_SCRIPT", "bin/*.bat")]))
            .unwrap();
        assert!(explicit.plans[0].provides(PLAN_ENTRY_JVM_APPLICATION_PACKAGE));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let app = TempDir::new().unwrap();

        let err = Detect
            .detect(&context(app.path(), &[("BP_APPLICATION_SCRIPT", "[")]))
            .unwrap_err();

        assert!(err.to_string().starts_with("unable to detect application scripts"));
    }
}
