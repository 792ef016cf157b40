use std::path::Path;

use slipway::config::RunnerConfig;
use slipway::pipeline::{self, Step};
use slipway::{build_info, report, steps};

/// The full validation pipeline: prerequisites through build, fail-fast,
/// then provenance metadata for the known-good result.
pub fn run(root: &Path, config: &RunnerConfig) -> bool {
    report::header("Build & Test Validation");

    let outcome = pipeline::run_sequence(vec![
        Step::new("Prerequisites", || steps::check_prerequisites(root)),
        Step::new("Dependencies", || steps::download_dependencies(root)),
        Step::new("Format", || steps::format_code(root)),
        Step::new("Lint", || steps::lint_code(root)),
        Step::new("Tests", || steps::run_tests(root, true)),
        Step::new("Security", || steps::security_checks(root)),
        Step::new("Build", || steps::build_binary(root, config)),
    ]);

    if !outcome.success {
        return false;
    }

    match build_info::record(root, config) {
        Ok(_) => {
            report::success("Build info generated");
            true
        }
        Err(e) => {
            report::error(&format!("Failed to record build info: {}", e));
            false
        }
    }
}
