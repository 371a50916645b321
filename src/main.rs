use dist_zip::cli::{handle_build, handle_detect, CliArgs, Commands};
use dist_zip::util::logging::{init_logging, parse_level, LoggingConfig};
use dist_zip::VERSION;

use std::process;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::from_invocation();
    init_logging_from_args(&args);

    debug!("dist-zip v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args),
        Commands::Build(build_args) => handle_build(build_args),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
