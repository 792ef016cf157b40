//! Concrete pipeline step actions.
//!
//! Each action narrates its own progress and returns plain success. Fallback
//! behavior (the lint step's golangci-lint → go vet downgrade, the security
//! step's optional scanner) lives here, inside the step, never in the
//! pipeline runner.

use std::fs;
use std::path::{Path, PathBuf};

use regex::RegexBuilder;

use crate::config::RunnerConfig;
use crate::report;
use crate::utils::command::{self, CommandResult};

pub const COVERAGE_PROFILE: &str = "coverage.out";
pub const COVERAGE_REPORT: &str = "coverage.html";

/// Compiler flags for the host binary, matching the matrix build: static
/// linking, stripped debug info, pure-Go networking and user lookups.
const BUILD_LDFLAGS: &str = "-s -w -extldflags=-static";
const BUILD_TAGS: &str = "netgo,osusergo";

/// Source patterns that should never appear with a plaintext value in
/// committed code. The scan is advisory: redacted examples and this list
/// itself match too.
const SECRET_PATTERNS: &[&str] = &[
    "password=",
    "secret=",
    "token=",
    "api_key=",
    "private_key=",
    "-----BEGIN.*PRIVATE KEY-----",
];

/// Verify the toolchain is installed and we are in a module root.
pub fn check_prerequisites(root: &Path) -> bool {
    report::step("Checking prerequisites");

    let result = command::run("go", &["version"], Some(root), &[]);
    if !result.success() {
        report::error("Go is not installed or not in PATH");
        return false;
    }
    report::success(&format!("Found {}", result.stdout.trim()));

    if !root.join("go.mod").exists() {
        report::error("go.mod not found - not in a Go module directory");
        return false;
    }

    report::success("All prerequisites met");
    true
}

/// Download and verify module dependencies.
pub fn download_dependencies(root: &Path) -> bool {
    report::step("Downloading dependencies");

    if !run_checked(root, "go", &["mod", "download"]) {
        return false;
    }

    let verify = command::run("go", &["mod", "verify"], Some(root), &[]);
    if !verify.success() {
        report::error("Dependency verification failed");
        dump_output(&verify);
        return false;
    }

    report::success("Dependencies downloaded and verified");
    true
}

pub fn format_code(root: &Path) -> bool {
    report::step("Formatting code");

    if !run_checked(root, "go", &["fmt", "./..."]) {
        return false;
    }

    report::success("Code formatted");
    true
}

/// Lint with golangci-lint when installed, `go vet` otherwise.
pub fn lint_code(root: &Path) -> bool {
    report::step("Linting code");

    let probe = command::run("golangci-lint", &["--version"], Some(root), &[]);
    if probe.success() {
        if !run_checked(root, "golangci-lint", &["run"]) {
            return false;
        }
        report::success("Linting passed (golangci-lint)");
        return true;
    }

    if !run_checked(root, "go", &["vet", "./..."]) {
        return false;
    }

    report::success("Static analysis passed (go vet)");
    true
}

/// Run the test suite, optionally with coverage instrumentation and a
/// rendered HTML report.
pub fn run_tests(root: &Path, with_coverage: bool) -> bool {
    report::step("Running tests");

    let mut args = vec!["test"];
    if with_coverage {
        args.push("-coverprofile=coverage.out");
    }
    args.extend(["-v", "./..."]);

    if !run_checked(root, "go", &args) {
        return false;
    }

    report::success("All tests passed");

    if with_coverage && root.join(COVERAGE_PROFILE).exists() {
        report_coverage(root);
    }

    true
}

fn report_coverage(root: &Path) {
    let summary = command::run(
        "go",
        &["tool", "cover", "-func=coverage.out"],
        Some(root),
        &[],
    );
    if !summary.success() {
        return;
    }

    if let Some(total) = extract_total_coverage(&summary.stdout) {
        report::success(&format!("Test coverage: {}", total));
    }

    command::run(
        "go",
        &["tool", "cover", "-html=coverage.out", "-o", COVERAGE_REPORT],
        Some(root),
        &[],
    );
    if root.join(COVERAGE_REPORT).exists() {
        report::success(&format!("Coverage report generated: {}", COVERAGE_REPORT));
    }
}

/// Pull the aggregate percentage out of `go tool cover -func` output.
fn extract_total_coverage(output: &str) -> Option<&str> {
    output
        .lines()
        .find(|line| line.contains("total:"))
        .and_then(|line| line.split_whitespace().last())
}

/// Security checks.
///
/// Findings from an installed gosec fail the step; a missing scanner is a
/// warning, not a failure. The secret-pattern scan is advisory only.
pub fn security_checks(root: &Path) -> bool {
    report::step("Running security checks");

    let probe = command::run("gosec", &["-version"], Some(root), &[]);
    if probe.success() {
        let scan = command::run("gosec", &["./..."], Some(root), &[]);
        if !scan.success() {
            report::error("Security scan found issues");
            dump_output(&scan);
            return false;
        }
        report::success("Security scan passed");
    } else {
        report::warning("gosec not available - skipping security scan");
    }

    scan_for_secrets(root);
    true
}

/// Scan non-test, non-vendor Go sources for committed secret patterns.
/// Returns the number of matching lines; findings are warned, never fatal.
fn scan_for_secrets(root: &Path) -> usize {
    report::detail("Scanning for accidentally committed secrets...");

    let regexes: Vec<_> = SECRET_PATTERNS
        .iter()
        .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
        .collect();

    let mut matches = Vec::new();
    for path in go_sources(root) {
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (lineno, line) in contents.lines().enumerate() {
            if regexes.iter().any(|re| re.is_match(line)) {
                matches.push(format!("{}:{}: {}", path.display(), lineno + 1, line.trim()));
            }
        }
    }

    if matches.is_empty() {
        report::success("No secrets detected in codebase");
        return 0;
    }

    report::warning(&format!(
        "Found {} potential secret match(es) - please review",
        matches.len()
    ));
    for line in matches.iter().take(3) {
        report::detail(line);
    }
    if matches.len() > 3 {
        report::detail(&format!("... ({} more matches)", matches.len() - 3));
    }
    report::warning("If these are false positives (e.g., redacted examples), ignore this warning");

    matches.len()
}

fn go_sources(root: &Path) -> Vec<PathBuf> {
    let pattern = root.join("**").join("*.go");
    let Ok(entries) = glob::glob(&pattern.to_string_lossy()) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .filter(|p| !p.components().any(|c| c.as_os_str() == "vendor"))
        .filter(|p| {
            p.file_name()
                .map(|n| !n.to_string_lossy().ends_with("_test.go"))
                .unwrap_or(false)
        })
        .collect()
}

/// Build the host binary into the build directory and smoke-test it.
pub fn build_binary(root: &Path, config: &RunnerConfig) -> bool {
    report::step("Building application");

    let build_dir = config.build_dir_path(root);
    if let Err(e) = fs::create_dir_all(&build_dir) {
        report::error(&format!("Failed to create build directory: {}", e));
        return false;
    }

    let binary_path = build_dir.join(config.host_binary_name());
    let out_arg = binary_path.to_string_lossy().to_string();

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
        &[],
    );
    if !result.success() {
        report::error("Command failed: go build");
        dump_output(&result);
        return false;
    }

    let Ok(metadata) = fs::metadata(&binary_path) else {
        report::error("Binary was not created");
        return false;
    };

    report::success(&format!(
        "Binary built: {} ({:.1} MB)",
        binary_path.display(),
        metadata.len() as f64 / (1024.0 * 1024.0)
    ));

    let smoke = command::run(&out_arg, &["-h"], Some(root), &[]);
    if smoke.success() {
        report::success("Binary execution test passed");
    } else {
        report::warning("Binary execution test failed (may be normal)");
    }

    true
}

fn run_checked(root: &Path, program: &str, args: &[&str]) -> bool {
    let result = command::run(program, args, Some(root), &[]);
    if !result.success() {
        report::error(&format!("Command failed: {} {}", program, args.join(" ")));
        dump_output(&result);
        return false;
    }
    true
}

fn dump_output(result: &CommandResult) {
    if !result.stdout.trim().is_empty() {
        report::detail(&format!("STDOUT:\n{}", result.stdout.trim_end()));
    }
    if !result.stderr.trim().is_empty() {
        report::detail(&format!("STDERR:\n{}", result.stderr.trim_end()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_total_coverage_finds_the_total_line() {
        let output = "\
slipway/internal/a.go:10:\tHandle\t\t80.0%
slipway/internal/b.go:22:\tServe\t\t66.7%
total:\t\t\t(statements)\t73.9%
";
        assert_eq!(extract_total_coverage(output), Some("73.9%"));
    }

    #[test]
    fn extract_total_coverage_handles_missing_total() {
        assert_eq!(extract_total_coverage("no summary here"), None);
    }

    #[test]
    fn secret_scan_counts_matches_outside_tests_and_vendor() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("main.go"),
            "package main\nvar apiKey = \"api_key=hunter2\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("main_test.go"),
            "package main\n// password=mock-credential\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("vendor/dep")).unwrap();
        fs::write(
            dir.path().join("vendor/dep/dep.go"),
            "package dep\n// token=vendored\n",
        )
        .unwrap();

        assert_eq!(scan_for_secrets(dir.path()), 1);
    }

    #[test]
    fn secret_scan_is_silent_on_clean_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.go"), "package main\n").unwrap();
        assert_eq!(scan_for_secrets(dir.path()), 0);
    }

    #[test]
    fn prerequisites_fail_outside_a_module_root() {
        // No go.mod in an empty directory; the step must fail regardless of
        // whether the toolchain itself is installed.
        let dir = tempfile::tempdir().unwrap();
        assert!(!check_prerequisites(dir.path()));
    }
}
