pub mod commands;
pub mod handlers;

pub use commands::{BuildArgs, CliArgs, Commands, DetectArgs, PhaseArgs};
pub use handlers::{handle_build, handle_detect};
