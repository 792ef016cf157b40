use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};

use slipway::config::RunnerConfig;
use slipway::{interrupt, report};

mod commands;

use commands::{build, toolchain, validate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "slipway")]
#[command(version = VERSION)]
#[command(about = "Build and validation pipeline for the aggregator service")]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the host binary, or one cross-target with --platform
    Build(build::BuildArgs),
    /// Build binaries for every supported platform
    BuildAll,
    /// Run the test suite
    Test,
    /// Run tests with coverage and render an HTML report
    Coverage,
    /// Remove build output and test artifacts
    Clean,
    /// Format source code
    Fmt,
    /// Run linting (golangci-lint when available, go vet otherwise)
    Lint,
    /// Check prerequisites and download dependencies
    Deps,
    /// Run the full validation pipeline (default)
    Validate,
}

fn main() -> ExitCode {
    interrupt::install();

    let cli = Cli::parse();
    let started = Instant::now();

    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
    let config = match RunnerConfig::load(&root) {
        Ok(config) => config,
        Err(e) => {
            report::error(&e.to_string());
            return ExitCode::from(1);
        }
    };

    let mut success = match cli.command.unwrap_or(Commands::Validate) {
        Commands::Build(args) => build::run(args, &root, &config),
        Commands::BuildAll => build::run_all(&root, &config),
        Commands::Test => toolchain::test(&root),
        Commands::Coverage => toolchain::coverage(&root),
        Commands::Clean => toolchain::clean(&root, &config),
        Commands::Fmt => toolchain::fmt(&root),
        Commands::Lint => toolchain::lint(&root),
        Commands::Deps => toolchain::deps(&root),
        Commands::Validate => validate::run(&root, &config),
    };

    if interrupt::interrupted() {
        report::error("Build interrupted by user");
        success = false;
    }

    let binary = config.build_dir_path(&root).join(config.host_binary_name());
    let built = if success && binary.is_file() {
        Some(binary.as_path())
    } else {
        None
    };
    report::summary(success, started.elapsed(), built);

    ExitCode::from(if success { 0 } else { 1 })
}
