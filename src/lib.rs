//! dist-zip - Cloud Native Buildpack for DistZip-style applications
//!
//! Gradle's `distZip`/`installDist` tasks and similar tools produce an application tree
//! with a launch script under `<name>/bin/`. This buildpack finds that script and wires it
//! into launch processes.
//!
//! # Phases
//!
//! - **Detect** ([`distzip::Detect`]): always passes. Provides `jvm-application`, and
//!   `jvm-application-package` when exactly one start script is found.
//! - **Build** ([`distzip::Build`]): contributes `dist-zip`, `task` and `web` processes for
//!   the script (plus `reload` when live reload is enabled) and records a launch SBOM. With
//!   no single script it marks every plan entry unmet so later buildpacks can take over.
//!
//! Both phases rely on [`distzip::ScriptResolver`], which returns a three-way
//! [`distzip::Resolution`]: resolved, not found, or ambiguous.
//!
//! # Example
//!
//! ```no_run
//! use dist_zip::distzip::{Resolution, ScriptPattern, ScriptResolver};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ScriptResolver::new("/workspace");
//! match resolver.resolve(&ScriptPattern::default())? {
//!     Resolution::Resolved(script) => println!("start script: {}", script.display()),
//!     Resolution::NotFound => println!("no start script"),
//!     ambiguous @ Resolution::Ambiguous { .. } => {
//!         println!("{}", ambiguous.diagnostic().unwrap_or_default())
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod cnb;
pub mod config;
pub mod distzip;
pub mod util;

pub use cnb::{BuildResult, DetectResult, Process};
pub use config::{ConfigError, ConfigurationResolver};
pub use distzip::{Build, Detect, Resolution, ScriptPattern, ScriptResolver};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
