//! Provenance metadata for known-good builds.
//!
//! A `build-info.json` record is written only after a validation run has
//! passed; it documents where a good build came from, never a failed one.
//! Every probe is best-effort: a missing tool or a non-repository working
//! directory degrades to a placeholder value and never fails the run.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::utils::command;

pub const BUILD_INFO_FILE: &str = "build-info.json";

const UNKNOWN: &str = "unknown";

/// Metadata describing the provenance of a successful build. Written once,
/// overwriting any prior record; never mutated after write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub timestamp: String,
    pub go_version: String,
    pub git_commit: String,
    pub git_branch: String,
    pub git_dirty: bool,
    pub platform: String,
    pub architecture: String,
}

/// Gather build metadata from the environment and version control.
pub fn gather(root: &Path) -> BuildInfo {
    let git_commit = command::run_optional("git", &["rev-parse", "HEAD"], Some(root))
        .map(|hash| hash.chars().take(8).collect())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let git_branch = command::run_optional("git", &["branch", "--show-current"], Some(root))
        .unwrap_or_else(|| UNKNOWN.to_string());

    // Dirty iff the status probe succeeded AND reported entries. A failed
    // probe (not a repository, git absent) means clean, not an error.
    let status = command::run("git", &["status", "--porcelain"], Some(root), &[]);
    let git_dirty = status.success() && !status.stdout.trim().is_empty();

    let go_version = command::run_optional("go", &["version"], Some(root))
        .unwrap_or_else(|| UNKNOWN.to_string());

    BuildInfo {
        timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        go_version,
        git_commit,
        git_branch,
        git_dirty,
        platform: std::env::consts::OS.to_string(),
        architecture: std::env::consts::ARCH.to_string(),
    }
}

/// Gather and persist the record under the build directory, overwriting any
/// previous one. Only the final write can fail; the probes cannot.
pub fn record(root: &Path, config: &RunnerConfig) -> Result<BuildInfo> {
    let info = gather(root);

    let build_dir = config.build_dir_path(root);
    fs::create_dir_all(&build_dir)
        .map_err(|e| Error::internal_io(format!("Failed to create build directory: {}", e)))?;

    let path = build_dir.join(BUILD_INFO_FILE);
    let json = serde_json::to_string_pretty(&info).map_err(|e| Error::internal_json(e.to_string()))?;
    fs::write(&path, json)
        .map_err(|e| Error::internal_io(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(info)
}

/// Parse a previously written record.
pub fn read(path: &Path) -> Result<BuildInfo> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::internal_io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| Error::internal_json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BUILD_INFO_FILE);

        let info = BuildInfo {
            timestamp: "2026-08-26 12:00:00 UTC".to_string(),
            go_version: "go version go1.24.1 linux/amd64".to_string(),
            git_commit: "deadbeef".to_string(),
            git_branch: "main".to_string(),
            git_dirty: true,
            platform: "linux".to_string(),
            architecture: "x86_64".to_string(),
        };

        let json = serde_json::to_string_pretty(&info).unwrap();
        fs::write(&path, &json).unwrap();

        let parsed = read(&path).unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn json_uses_the_documented_field_names() {
        let info = gather(Path::new("."));
        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&info).unwrap()).unwrap();
        for key in [
            "timestamp",
            "go_version",
            "git_commit",
            "git_branch",
            "git_dirty",
            "platform",
            "architecture",
        ] {
            assert!(value.get(key).is_some(), "missing field {}", key);
        }
    }

    #[test]
    fn probes_degrade_to_placeholders_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let info = gather(dir.path());

        assert_eq!(info.git_commit, UNKNOWN);
        assert_eq!(info.git_branch, UNKNOWN);
        assert!(!info.git_dirty);
        assert_eq!(info.platform, std::env::consts::OS);
    }

    #[test]
    fn record_overwrites_the_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::default();

        let first = record(dir.path(), &config).unwrap();
        let second = record(dir.path(), &config).unwrap();

        let path = config.build_dir_path(dir.path()).join(BUILD_INFO_FILE);
        let on_disk = read(&path).unwrap();
        assert_eq!(on_disk, second);
        assert_eq!(first.git_commit, second.git_commit);
    }
}
