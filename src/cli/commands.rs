use clap::{Args, Parser, Subcommand};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Cloud Native Buildpack that contributes process types for DistZip-style applications
#[derive(Parser, Debug)]
#[command(
    name = "dist-zip",
    about = "Cloud Native Buildpack that contributes process types for DistZip-style applications",
    version,
    long_about = "dist-zip looks for a single start script in the application (by default \
                  matching */bin/*) and, when it finds one, contributes dist-zip, task and \
                  web process types that run it.\n\n\
                  The lifecycle invokes this binary as bin/detect and bin/build; the \
                  subcommand is implied by the name it was invoked under."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Decide whether this buildpack participates in the build",
        long_about = "Writes the build plan: always provides jvm-application, and \
                      jvm-application-package when a single start script is found.\n\n\
                      Examples:\n  \
                      dist-zip detect /platform /tmp/plan.toml\n  \
                      BP_APPLICATION_SCRIPT='build/install/*/bin/*' dist-zip detect /platform /tmp/plan.toml"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Contribute launch processes for the start script",
        long_about = "Writes launch.toml with the dist-zip, task and web processes (plus \
                      reload when BP_LIVE_RELOAD_ENABLED is set), or build.toml marking every \
                      plan entry unmet when no single start script is found.\n\n\
                      Examples:\n  \
                      dist-zip build /layers/paketo-buildpacks_dist-zip /platform /tmp/plan.toml"
    )]
    Build(BuildArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PhaseArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Application directory (defaults to current directory)"
    )]
    pub application: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory containing buildpack.toml (defaults to $CNB_BUILDPACK_DIR)"
    )]
    pub buildpack_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "PLATFORM", help = "Platform directory")]
    pub platform_dir: PathBuf,

    #[arg(value_name = "PLAN", help = "Path the build plan is written to")]
    pub plan_path: PathBuf,

    #[command(flatten)]
    pub phase: PhaseArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(value_name = "LAYERS", help = "Layers directory for this buildpack")]
    pub layers_dir: PathBuf,

    #[arg(value_name = "PLATFORM", help = "Platform directory")]
    pub platform_dir: PathBuf,

    #[arg(value_name = "PLAN", help = "Buildpack plan to read")]
    pub plan_path: PathBuf,

    #[command(flatten)]
    pub phase: PhaseArgs,
}

impl CliArgs {
    /// Parses the process arguments, honoring `bin/detect` and `bin/build` invocations.
    pub fn from_invocation() -> Self {
        Self::parse_from(with_implied_phase(env::args_os().collect()))
    }
}

/// Inserts the subcommand named by argv[0] when invoked as `detect` or `build`.
pub fn with_implied_phase(mut args: Vec<OsString>) -> Vec<OsString> {
    let phase = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| matches!(*name, "detect" | "build"))
        .map(OsString::from);

    if let Some(phase) = phase {
        args.insert(1, phase);
    }
    args
}
