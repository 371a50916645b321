//! Structured logging setup
//!
//! Buildpack output is written through the `tracing` ecosystem. The lifecycle captures
//! stderr, so that is where events go. Nothing in the library requires a subscriber: with
//! none installed every event is dropped and behavior is unchanged.
//!
//! # Environment Variables
//!
//! - `BP_LOG_LEVEL`: minimum level (trace, debug, info, warn, error) - default: info
//! - `DIST_ZIP_LOG_JSON`: emit JSON lines instead of plain text - default: false
//! - `RUST_LOG`: standard filter directives, layered on top of the level above
//!
//! # Example
//!
//! ```no_run
//! use dist_zip::util::logging::{init_logging, LoggingConfig};
//! use tracing::Level;
//!
//! init_logging(LoggingConfig::with_level(Level::DEBUG));
//! tracing::debug!("too many application scripts");
//! ```

use crate::config::parse_bool;
use std::env;
use std::io::IsTerminal;
use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., dist_zip::distzip) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `BP_LOG_LEVEL` and `DIST_ZIP_LOG_JSON`.
    pub fn from_env() -> Self {
        let level = env::var("BP_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var("DIST_ZIP_LOG_JSON")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false);

        Self {
            level,
            use_json,
            // Targets are only shown at debug verbosity.
            include_target: level >= Level::DEBUG,
            ..Default::default()
        }
    }
}

/// Parses a log level, case-insensitively. Unknown values fall back to INFO.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(config.level).into())
            .from_env_lossy();

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .without_time()
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
