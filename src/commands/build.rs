use std::path::Path;

use clap::Args;

use slipway::config::RunnerConfig;
use slipway::{matrix, report, steps};

#[derive(Args)]
pub struct BuildArgs {
    /// Target platform in the form os/arch (e.g. linux/amd64, darwin/arm64)
    #[arg(long, value_name = "OS/ARCH")]
    pub platform: Option<String>,
}

/// Resolve `--platform` into a validated target. Runs before any step that
/// touches the toolchain or the network, so a typo fails immediately.
fn resolve_target(args: &BuildArgs) -> slipway::Result<Option<matrix::PlatformTarget>> {
    args.platform
        .as_deref()
        .map(matrix::PlatformTarget::parse)
        .transpose()
}

/// Build for the host platform, or for one cross-target with `--platform`.
pub fn run(args: BuildArgs, root: &Path, config: &RunnerConfig) -> bool {
    let target = match resolve_target(&args) {
        Ok(target) => target,
        Err(e) => {
            report::error(&e.to_string());
            for hint in &e.hints {
                report::detail(hint);
            }
            return false;
        }
    };

    if !steps::check_prerequisites(root) || !steps::download_dependencies(root) {
        return false;
    }

    let Some(target) = target else {
        return steps::build_binary(root, config);
    };

    match matrix::build_for_platform(root, config, &target) {
        Ok(artifact) => {
            report::success(&format!(
                "Built: {} ({:.1} MB)",
                artifact.path.display(),
                artifact.size_mb()
            ));
            true
        }
        Err(e) => {
            report::error(&e.to_string());
            false
        }
    }
}

/// Build every supported platform; one failure never stops the rest.
pub fn run_all(root: &Path, config: &RunnerConfig) -> bool {
    if !steps::check_prerequisites(root) || !steps::download_dependencies(root) {
        return false;
    }

    let matrix_report = matrix::build_all(root, config);
    if !matrix_report.success() {
        report::error(&format!(
            "{} of {} platform build(s) failed",
            matrix_report.failed(),
            matrix_report.results.len()
        ));
    }

    matrix_report.success()
}
