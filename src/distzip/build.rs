use super::detect::LIVE_RELOAD_ENABLED;
use super::sbom::{formats_from_media_types, SbomError, SbomScanner};
use super::script_resolver::{
    ResolveError, ScriptPattern, ScriptResolver, APPLICATION_SCRIPT, DEFAULT_PATTERN,
};
use crate::cnb::{Buildpack, BuildpackPlan, BuildResult, Process, UnmetPlanEntry};
use crate::config::{format_user_config, ConfigurationResolver};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const RELOAD_COMMAND: &str = "watchexec";

pub const PROCESS_DIST_ZIP: &str = "dist-zip";
pub const PROCESS_TASK: &str = "task";
pub const PROCESS_WEB: &str = "web";
pub const PROCESS_RELOAD: &str = "reload";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unable to detect application scripts: {0}")]
    Resolve(#[from] ResolveError),

    #[error("unable to create launch SBOM: {0}")]
    Sbom(#[from] SbomError),
}

pub struct BuildContext {
    pub application_path: PathBuf,
    pub buildpack: Buildpack,
    pub plan: BuildpackPlan,
    pub configuration: ConfigurationResolver,
}

pub struct Build {
    scanner: Box<dyn SbomScanner>,
}

impl Build {
    pub fn new(scanner: Box<dyn SbomScanner>) -> Self {
        Self { scanner }
    }

    pub fn build(&self, context: &BuildContext) -> Result<BuildResult, BuildError> {
        let pattern = ScriptPattern::from_configuration(&context.configuration);
        let resolution = ScriptResolver::new(&context.application_path).resolve(&pattern)?;

        let Some(script) = resolution.script() else {
            debug!("No single application script, passing plan entries to subsequent buildpacks");
            return Ok(BuildResult {
                processes: Vec::new(),
                unmet: unmet_entries(&context.plan),
            });
        };

        info!("{}", context.buildpack.title());
        let hint = match context.buildpack.configuration(APPLICATION_SCRIPT) {
            Some(c) => format_user_config(&c.name, &c.description, &c.default),
            None => format_user_config(
                APPLICATION_SCRIPT,
                "the application start script",
                DEFAULT_PATTERN,
            ),
        };
        info!("  {}", hint);
        context.configuration.log_configuration();

        let mut processes = baseline_processes(script);
        if context.configuration.resolve_bool(LIVE_RELOAD_ENABLED) {
            enable_live_reload(&mut processes, script);
        }

        let formats = formats_from_media_types(&context.buildpack.info.sbom_formats)?;
        self.scanner
            .scan_launch(&context.application_path, &formats)?;

        Ok(BuildResult {
            processes,
            unmet: Vec::new(),
        })
    }
}

/// `dist-zip`, `task` and `web`, all running the script directly; `web` is the default.
pub fn baseline_processes(script: &Path) -> Vec<Process> {
    let command = script.display().to_string();
    vec![
        Process::new(PROCESS_DIST_ZIP, command.clone()),
        Process::new(PROCESS_TASK, command.clone()),
        Process {
            default: true,
            ..Process::new(PROCESS_WEB, command)
        },
    ]
}

/// Demotes every existing process and appends a `reload` process that wraps the script
/// in `watchexec`. Afterwards `reload` is the only default.
pub fn enable_live_reload(processes: &mut Vec<Process>, script: &Path) {
    for process in processes.iter_mut() {
        process.default = false;
    }

    processes.push(Process {
        process_type: PROCESS_RELOAD.to_string(),
        command: RELOAD_COMMAND.to_string(),
        arguments: vec!["-r".to_string(), script.display().to_string()],
        direct: false,
        default: true,
    });
}

/// Every plan entry, once, in plan order.
pub fn unmet_entries(plan: &BuildpackPlan) -> Vec<UnmetPlanEntry> {
    let mut seen = HashSet::new();
    plan.entries
        .iter()
        .filter(|e| seen.insert(e.name.as_str()))
        .map(|e| UnmetPlanEntry {
            name: e.name.clone(),
        })
        .collect()
}
