//! Detect and build phases for DistZip-style applications
//!
//! Both phases start from the same question, answered by [`ScriptResolver`]: does the
//! application tree contain exactly one start script? Detect turns the answer into a build
//! plan; build turns it into launch processes.

pub mod build;
pub mod detect;
pub mod sbom;
pub mod script_resolver;

pub use build::{Build, BuildContext, BuildError};
pub use detect::{Detect, DetectContext, DetectError};
pub use sbom::{SbomError, SbomFormat, SbomScanner, SyftCliScanner};
pub use script_resolver::{Resolution, ResolveError, ScriptPattern, ScriptResolver};
