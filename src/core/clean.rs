//! Build artifact cleanup.

use std::fs;
use std::path::Path;

use crate::config::RunnerConfig;
use crate::report;

/// Test and database leftovers removed by `clean`, matched recursively from
/// the project root.
const ARTIFACT_PATTERNS: &[&str] = &[
    "**/coverage.out",
    "**/coverage.html",
    "**/coverage.txt",
    "**/*.test",
    "**/*.db",
    "**/*.sqlite",
    "**/*.sqlite3",
];

/// Remove the build directory, the root-level binary, and test artifacts.
/// Idempotent: an already-clean tree is a success, not an error.
pub fn clean(root: &Path, config: &RunnerConfig) -> bool {
    report::step("Cleaning build artifacts");

    let build_dir = config.build_dir_path(root);
    if build_dir.exists() {
        if let Err(e) = fs::remove_dir_all(&build_dir) {
            report::error(&format!("Failed to remove build directory: {}", e));
            return false;
        }
        report::success("Removed build directory");
    }

    let binary = root.join(config.host_binary_name());
    if binary.is_file() && fs::remove_file(&binary).is_ok() {
        report::success(&format!("Removed {}", config.host_binary_name()));
    }

    for pattern in ARTIFACT_PATTERNS {
        let full = root.join(pattern);
        let Ok(entries) = glob::glob(&full.to_string_lossy()) else {
            continue;
        };
        for path in entries.filter_map(|e| e.ok()).filter(|p| p.is_file()) {
            let _ = fs::remove_file(&path);
        }
    }

    report::success("Cleaned test artifacts");
    true
}
