use super::commands::{BuildArgs, DetectArgs, PhaseArgs};
use crate::cnb::{read_buildpack_plan, write_build_result, write_plan, Buildpack};
use crate::config::ConfigurationResolver;
use crate::distzip::{Build, BuildContext, Detect, DetectContext, SyftCliScanner};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

pub const EXIT_PASS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_DETECT_FAIL: i32 = 100;

pub fn handle_detect(args: &DetectArgs) -> i32 {
    match run_detect(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            EXIT_ERROR
        }
    }
}

pub fn handle_build(args: &BuildArgs) -> i32 {
    match run_build(args) {
        Ok(()) => EXIT_PASS,
        Err(e) => {
            error!("{:#}", e);
            EXIT_ERROR
        }
    }
}

fn run_detect(args: &DetectArgs) -> Result<i32> {
    let application_path = application_dir(&args.phase)?;
    let buildpack = Buildpack::load(&buildpack_dir(&args.phase)?)?;
    debug!(
        application = %application_path.display(),
        platform = %args.platform_dir.display(),
        "Detecting"
    );

    let context = DetectContext {
        application_path,
        configuration: ConfigurationResolver::new(&buildpack),
    };
    let result = Detect.detect(&context)?;

    if !result.pass {
        return Ok(EXIT_DETECT_FAIL);
    }
    write_plan(&args.plan_path, &result)?;
    Ok(EXIT_PASS)
}

fn run_build(args: &BuildArgs) -> Result<()> {
    let application_path = application_dir(&args.phase)?;
    let buildpack = Buildpack::load(&buildpack_dir(&args.phase)?)?;
    let plan = read_buildpack_plan(&args.plan_path)?;
    debug!(
        application = %application_path.display(),
        layers = %args.layers_dir.display(),
        entries = plan.entries.len(),
        "Building"
    );

    let context = BuildContext {
        application_path,
        configuration: ConfigurationResolver::new(&buildpack),
        buildpack,
        plan,
    };
    let build = Build::new(Box::new(SyftCliScanner::new(&args.layers_dir)));
    let result = build.build(&context)?;

    write_build_result(&args.layers_dir, &result)
}

fn application_dir(args: &PhaseArgs) -> Result<PathBuf> {
    let path = match &args.application {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    if !path.is_dir() {
        return Err(anyhow!(
            "Application path is not a directory: {}",
            path.display()
        ));
    }

    path.canonicalize()
        .context(format!("Failed to canonicalize application path {}", path.display()))
}

/// `--buildpack-dir`, then `$CNB_BUILDPACK_DIR`, then the parent of the `bin/` directory
/// holding this executable.
fn buildpack_dir(args: &PhaseArgs) -> Result<PathBuf> {
    if let Some(dir) = &args.buildpack_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = env::var_os("CNB_BUILDPACK_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let exe = env::current_exe().context("Failed to locate executable")?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Unable to determine buildpack directory from {}", exe.display()))
}
