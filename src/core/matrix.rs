//! Cross-platform build matrix.
//!
//! Unlike the validation pipeline, the matrix does not fail fast: every
//! declared target is attempted and the per-target outcomes are accumulated,
//! so one broken cross-target never hides the state of the others.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::report;
use crate::utils::command;

/// Platforms the aggregator ships for, in release order.
pub const SUPPORTED_PLATFORMS: &[(&str, &str)] = &[
    ("linux", "amd64"),
    ("windows", "amd64"),
    ("darwin", "amd64"),
    ("linux", "arm64"),
    ("darwin", "arm64"),
];

/// Compiler flags for release artifacts: static linking, stripped debug
/// info, and pure-Go networking/user-lookup implementations.
const BUILD_LDFLAGS: &str = "-s -w -extldflags=-static";
const BUILD_TAGS: &str = "netgo,osusergo";

/// One (OS, architecture) pair. Identity is the pair itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformTarget {
    pub os: String,
    pub arch: String,
}

impl PlatformTarget {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Parse an `os/arch` spec and check it against the supported set.
    pub fn parse(spec: &str) -> Result<Self> {
        let (os, arch) = spec
            .split_once('/')
            .filter(|(os, arch)| !os.is_empty() && !arch.is_empty())
            .ok_or_else(|| {
                Error::platform_invalid(spec)
                    .with_hint("Use the form os/arch, e.g. linux/amd64 or darwin/arm64")
            })?;

        if !SUPPORTED_PLATFORMS
            .iter()
            .any(|&(o, a)| o == os && a == arch)
        {
            return Err(Error::platform_invalid(spec).with_hint(format!(
                "Supported platforms: {}",
                supported_list()
            )));
        }

        Ok(Self::new(os, arch))
    }

    /// The full supported matrix, in declaration order.
    pub fn supported() -> Vec<PlatformTarget> {
        SUPPORTED_PLATFORMS
            .iter()
            .map(|&(os, arch)| PlatformTarget::new(os, arch))
            .collect()
    }

    /// Deterministic artifact filename: `<product>-<os>-<arch>[.exe]`.
    /// Re-running a build overwrites rather than accumulates.
    pub fn artifact_name(&self, product: &str) -> String {
        let ext = if self.os == "windows" { ".exe" } else { "" };
        format!("{}-{}-{}{}", product, self.os, self.arch, ext)
    }
}

impl std::fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

fn supported_list() -> String {
    SUPPORTED_PLATFORMS
        .iter()
        .map(|&(os, arch)| format!("{}/{}", os, arch))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Artifact produced by one successful per-platform build.
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    pub target: PlatformTarget,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl BuildArtifact {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Per-target verdict within one matrix run.
#[derive(Debug, Clone)]
pub struct TargetOutcome {
    pub target: PlatformTarget,
    pub success: bool,
}

/// Aggregated matrix result. Entries follow target declaration order and
/// every declared target has exactly one entry, failed or not.
#[derive(Debug, Clone)]
pub struct MatrixReport {
    pub results: Vec<TargetOutcome>,
}

impl MatrixReport {
    /// Overall success: every target built.
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Cross-compile the product for one target.
///
/// `GOOS`/`GOARCH` are passed as a per-invocation override map; the ambient
/// environment is never mutated, so each matrix target computes its own
/// overrides independently.
pub fn build_for_platform(
    root: &Path,
    config: &RunnerConfig,
    target: &PlatformTarget,
) -> Result<BuildArtifact> {
    report::step(&format!("Building for {}", target));

    let build_dir = config.build_dir_path(root);
    fs::create_dir_all(&build_dir)
        .map_err(|e| Error::internal_io(format!("Failed to create build directory: {}", e)))?;

    let binary_path = build_dir.join(target.artifact_name(&config.product));
    let out_arg = binary_path.to_string_lossy().to_string();

    let env = [("GOOS", target.os.as_str()), ("GOARCH", target.arch.as_str())];
    let result = command::run(
        "go",
        &[
            "build",
            "-ldflags",
            BUILD_LDFLAGS,
            "-tags",
            BUILD_TAGS,
            "-o",
            &out_arg,
            &config.main_package,
        ],
        Some(root),
        &env,
    );

    if !result.success() {
        if result.missing_executable() {
            return Err(Error::tool_missing("go"));
        }
        return Err(Error::tool_failed(
            &format!("go build for {}", target),
            command::error_text(&result),
        ));
    }

    let metadata = fs::metadata(&binary_path).map_err(|_| Error::artifact_missing(&binary_path))?;

    Ok(BuildArtifact {
        target: target.clone(),
        path: binary_path,
        size_bytes: metadata.len(),
    })
}

/// Build every supported platform, accumulating per-target outcomes.
pub fn build_all(root: &Path, config: &RunnerConfig) -> MatrixReport {
    report::header("Building for all supported platforms");

    build_all_with(&PlatformTarget::supported(), |target| {
        match build_for_platform(root, config, target) {
            Ok(artifact) => {
                report::success(&format!(
                    "Built: {} ({:.1} MB)",
                    artifact.path.display(),
                    artifact.size_mb()
                ));
                true
            }
            Err(e) => {
                report::error(&format!("Failed to build for {}: {}", target, e));
                false
            }
        }
    })
}

/// Matrix accumulation loop, generic over the per-target build operation.
/// A failed target never prevents the remaining targets from being attempted.
pub fn build_all_with<F>(targets: &[PlatformTarget], mut build: F) -> MatrixReport
where
    F: FnMut(&PlatformTarget) -> bool,
{
    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let success = build(target);
        results.push(TargetOutcome {
            target: target.clone(),
            success,
        });
    }

    MatrixReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_supported_pair() {
        let target = PlatformTarget::parse("linux/amd64").unwrap();
        assert_eq!(target.os, "linux");
        assert_eq!(target.arch, "amd64");
        assert_eq!(target.to_string(), "linux/amd64");
    }

    #[test]
    fn parse_rejects_malformed_spec() {
        for spec in ["linux", "linux/", "/amd64", ""] {
            let err = PlatformTarget::parse(spec).unwrap_err();
            assert_eq!(err.code, crate::ErrorCode::PlatformInvalid);
        }
    }

    #[test]
    fn parse_rejects_unsupported_pair() {
        let err = PlatformTarget::parse("plan9/mips").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::PlatformInvalid);
        assert!(err.hints.iter().any(|h| h.contains("linux/amd64")));
    }

    #[test]
    fn supported_matrix_has_no_duplicates() {
        let targets = PlatformTarget::supported();
        let unique: std::collections::HashSet<_> = targets.iter().collect();
        assert_eq!(unique.len(), targets.len());
    }

    #[test]
    fn artifact_name_is_deterministic_and_windows_gets_exe() {
        let linux = PlatformTarget::new("linux", "arm64");
        assert_eq!(linux.artifact_name("aggregator"), "aggregator-linux-arm64");

        let windows = PlatformTarget::new("windows", "amd64");
        assert_eq!(
            windows.artifact_name("aggregator"),
            "aggregator-windows-amd64.exe"
        );
    }

    #[test]
    fn matrix_attempts_every_target_despite_failures() {
        let dir = tempfile::tempdir().unwrap();
        let targets = vec![
            PlatformTarget::new("linux", "amd64"),
            PlatformTarget::new("windows", "amd64"),
            PlatformTarget::new("darwin", "arm64"),
        ];

        let report = build_all_with(&targets, |target| {
            if target.os == "windows" {
                return false;
            }
            let path = dir.path().join(target.artifact_name("aggregator"));
            std::fs::write(path, b"binary").unwrap();
            true
        });

        // All three entries present, in declaration order
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].target.os, "linux");
        assert_eq!(report.results[1].target.os, "windows");
        assert_eq!(report.results[2].target.os, "darwin");

        // Aggregate failure, but no fail-fast leakage
        assert!(!report.success());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);

        // Artifact count equals the number of successful targets
        let artifacts = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(artifacts, 2);
    }

    #[test]
    fn all_targets_succeeding_is_aggregate_success() {
        let targets = PlatformTarget::supported();
        let report = build_all_with(&targets, |_| true);
        assert!(report.success());
        assert_eq!(report.succeeded(), targets.len());
    }
}
