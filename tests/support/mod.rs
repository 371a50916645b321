#![allow(dead_code)]

use dist_zip::cnb::{Buildpack, BuildpackPlan, BuildpackPlanEntry};
use dist_zip::distzip::{BuildContext, DetectContext, SbomError, SbomFormat, SbomScanner};
use dist_zip::ConfigurationResolver;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// The descriptor shipped at the repository root.
pub fn repository_buildpack_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn repository_buildpack() -> Buildpack {
    Buildpack::load(&repository_buildpack_dir()).expect("Failed to load buildpack.toml")
}

/// Creates an executable start script under `root`.
pub fn write_script(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("No parent")).expect("Failed to create script dir");
    fs::write(&path, "#!/bin/sh\nexec java -jar lib/app.jar \"$@\"\n")
        .expect("Failed to write script");
    make_executable(&path);
    path
}

#[cfg(unix)]
pub fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to set permissions");
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) {}

pub fn environment(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn detect_context(app: &Path, env: &[(&str, &str)]) -> DetectContext {
    DetectContext {
        application_path: app.to_path_buf(),
        configuration: ConfigurationResolver::with_environment(
            &repository_buildpack(),
            environment(env),
        ),
    }
}

pub fn build_context(app: &Path, env: &[(&str, &str)], entries: &[&str]) -> BuildContext {
    let buildpack = repository_buildpack();
    BuildContext {
        application_path: app.to_path_buf(),
        configuration: ConfigurationResolver::with_environment(&buildpack, environment(env)),
        buildpack,
        plan: BuildpackPlan {
            entries: entries.iter().map(|e| BuildpackPlanEntry::new(*e)).collect(),
        },
    }
}

/// Scanner double that records each request.
#[derive(Clone, Default)]
pub struct RecordingScanner {
    pub calls: Rc<RefCell<Vec<(PathBuf, Vec<SbomFormat>)>>>,
    pub fail: bool,
}

impl SbomScanner for RecordingScanner {
    fn scan_launch(&self, application_path: &Path, formats: &[SbomFormat]) -> Result<(), SbomError> {
        self.calls
            .borrow_mut()
            .push((application_path.to_path_buf(), formats.to_vec()));
        if self.fail {
            return Err(SbomError::Failed {
                command: "syft".to_string(),
                status: "exit status: 2".to_string(),
                stderr: "scan failed".to_string(),
            });
        }
        Ok(())
    }
}
