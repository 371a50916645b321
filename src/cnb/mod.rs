//! Cloud Native Buildpack types and lifecycle file formats

pub mod buildpack;
pub mod layers;
pub mod plan;
pub mod process;

pub use buildpack::{Buildpack, BuildpackInfo, Configuration};
pub use layers::{read_buildpack_plan, write_build_result, write_plan};
pub use plan::{
    BuildPlan, BuildPlanProvide, BuildPlanRequire, BuildpackPlan, BuildpackPlanEntry, DetectResult,
};
pub use process::{BuildResult, Process, UnmetPlanEntry};
