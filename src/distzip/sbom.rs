use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SbomFormat {
    CycloneDxJson,
    SyftJson,
}

impl SbomFormat {
    /// Formats scanned when the descriptor doesn't declare `sbom-formats`.
    pub const DEFAULT: [SbomFormat; 2] = [SbomFormat::CycloneDxJson, SbomFormat::SyftJson];

    pub fn from_media_type(media_type: &str) -> Option<Self> {
        [SbomFormat::CycloneDxJson, SbomFormat::SyftJson]
            .into_iter()
            .find(|f| f.media_type() == media_type)
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            SbomFormat::CycloneDxJson => "application/vnd.cyclonedx+json",
            SbomFormat::SyftJson => "application/vnd.syft+json",
        }
    }

    /// Name of the format as accepted by `syft -o`.
    pub fn syft_output(&self) -> &'static str {
        match self {
            SbomFormat::CycloneDxJson => "cyclonedx-json",
            SbomFormat::SyftJson => "syft-json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SbomFormat::CycloneDxJson => "cdx.json",
            SbomFormat::SyftJson => "syft.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum SbomError {
    #[error("no SBOM formats requested")]
    NoFormats,

    #[error("unsupported SBOM format {0}")]
    UnsupportedFormat(String),

    #[error("unable to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Maps the descriptor's `sbom-formats` media types onto scanner formats, in order.
pub fn formats_from_media_types(media_types: &[String]) -> Result<Vec<SbomFormat>, SbomError> {
    if media_types.is_empty() {
        return Ok(SbomFormat::DEFAULT.to_vec());
    }
    media_types
        .iter()
        .map(|media_type| {
            SbomFormat::from_media_type(media_type)
                .ok_or_else(|| SbomError::UnsupportedFormat(media_type.clone()))
        })
        .collect()
}

/// Records a bill of materials for the launch image.
pub trait SbomScanner {
    fn scan_launch(&self, application_path: &Path, formats: &[SbomFormat]) -> Result<(), SbomError>;
}

/// Shells out to the `syft` binary contributed by the syft buildpack.
pub struct SyftCliScanner {
    layers_path: PathBuf,
    executable: PathBuf,
}

impl SyftCliScanner {
    pub fn new(layers_path: impl Into<PathBuf>) -> Self {
        Self {
            layers_path: layers_path.into(),
            executable: PathBuf::from("syft"),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Where the lifecycle expects the launch SBOM in the given format.
    pub fn launch_sbom_path(&self, format: SbomFormat) -> PathBuf {
        self.layers_path
            .join(format!("launch.sbom.{}", format.extension()))
    }

    fn arguments(&self, application_path: &Path, formats: &[SbomFormat]) -> Vec<String> {
        let mut args = vec!["packages".to_string(), "-q".to_string()];
        for format in formats {
            args.push("-o".to_string());
            args.push(format!(
                "{}={}",
                format.syft_output(),
                self.launch_sbom_path(*format).display()
            ));
        }
        args.push(format!("dir:{}", application_path.display()));
        args
    }
}

impl SbomScanner for SyftCliScanner {
    fn scan_launch(&self, application_path: &Path, formats: &[SbomFormat]) -> Result<(), SbomError> {
        if formats.is_empty() {
            return Err(SbomError::NoFormats);
        }

        let command = self.executable.display().to_string();
        let args = self.arguments(application_path, formats);
        debug!(command = %command, args = ?args, "Running SBOM scan");

        let output = Command::new(&self.executable)
            .args(&args)
            .output()
            .map_err(|source| SbomError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SbomError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Wrote launch SBOM for {}", application_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(SbomFormat::CycloneDxJson.syft_output(), "cyclonedx-json");
        assert_eq!(SbomFormat::SyftJson.syft_output(), "syft-json");
        assert_eq!(
            SbomFormat::CycloneDxJson.media_type(),
            "application/vnd.cyclonedx+json"
        );
    }

    #[test]
    fn test_from_media_type() {
        assert_eq!(
            SbomFormat::from_media_type("application/vnd.syft+json"),
            Some(SbomFormat::SyftJson)
        );
        assert_eq!(SbomFormat::from_media_type("application/spdx+json"), None);
    }

    #[test]
    fn test_formats_from_media_types() {
        let formats = formats_from_media_types(&["application/vnd.syft+json".to_string()]).unwrap();
        assert_eq!(formats, vec![SbomFormat::SyftJson]);

        assert_eq!(
            formats_from_media_types(&[]).unwrap(),
            SbomFormat::DEFAULT.to_vec()
        );

        let err = formats_from_media_types(&["application/spdx+json".to_string()]).unwrap_err();
        assert!(matches!(err, SbomError::UnsupportedFormat(ref m) if m == "application/spdx+json"));
    }

    #[test]
    fn test_launch_sbom_path() {
        let scanner = SyftCliScanner::new("/layers/paketo-buildpacks_dist-zip");
        assert_eq!(
            scanner.launch_sbom_path(SbomFormat::SyftJson),
            PathBuf::from("/layers/paketo-buildpacks_dist-zip/launch.sbom.syft.json")
        );
    }

    #[test]
    fn test_arguments() {
        let scanner = SyftCliScanner::new("/layers/dz");
        let args = scanner.arguments(
            Path::new("/workspace"),
            &[SbomFormat::CycloneDxJson, SbomFormat::SyftJson],
        );

        assert_eq!(
            args,
            vec![
                "packages",
                "-q",
                "-o",
                "cyclonedx-json=/layers/dz/launch.sbom.cdx.json",
                "-o",
                "syft-json=/layers/dz/launch.sbom.syft.json",
                "dir:/workspace",
            ]
        );
    }

    #[test]
    fn test_no_formats() {
        let scanner = SyftCliScanner::new("/layers/dz");
        let err = scanner.scan_launch(Path::new("/workspace"), &[]).unwrap_err();
        assert!(matches!(err, SbomError::NoFormats));
    }

    #[test]
    fn test_missing_executable() {
        let scanner = SyftCliScanner::new("/layers/dz").with_executable("/nonexistent/syft-12345");
        let err = scanner
            .scan_launch(Path::new("/workspace"), &[SbomFormat::SyftJson])
            .unwrap_err();
        assert!(matches!(err, SbomError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/syft-12345"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_executable() {
        let scanner = SyftCliScanner::new("/layers/dz").with_executable("false");
        let err = scanner
            .scan_launch(Path::new("/workspace"), &[SbomFormat::SyftJson])
            .unwrap_err();
        assert!(matches!(err, SbomError::Failed { .. }));
    }
}
