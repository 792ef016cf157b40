//! Single-step subcommands: each runs the prerequisite check, then the
//! corresponding step action.

use std::path::Path;

use slipway::config::RunnerConfig;
use slipway::steps;

pub fn deps(root: &Path) -> bool {
    steps::check_prerequisites(root) && steps::download_dependencies(root)
}

pub fn fmt(root: &Path) -> bool {
    steps::check_prerequisites(root) && steps::format_code(root)
}

pub fn lint(root: &Path) -> bool {
    steps::check_prerequisites(root) && steps::lint_code(root)
}

pub fn test(root: &Path) -> bool {
    steps::check_prerequisites(root)
        && steps::download_dependencies(root)
        && steps::run_tests(root, false)
}

pub fn coverage(root: &Path) -> bool {
    steps::check_prerequisites(root)
        && steps::download_dependencies(root)
        && steps::run_tests(root, true)
}

pub fn clean(root: &Path, config: &RunnerConfig) -> bool {
    slipway::clean::clean(root, config)
}
