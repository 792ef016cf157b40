//! Colored terminal narration for pipeline progress.
//!
//! The styled step log is the runner's primary user interface: every step
//! narrates what it is doing and how it ended, and a run always closes with
//! a summary block.

use std::path::Path;
use std::time::Duration;

use console::style;

pub fn header(title: &str) {
    let bar = "=".repeat(60);
    println!();
    println!("{}", style(&bar).blue().bold());
    println!("{}", style(format!(" {}", title)).blue().bold());
    println!("{}", style(&bar).blue().bold());
    println!();
}

pub fn step(message: &str) {
    println!("{} {}", style("→").cyan().bold(), message);
}

pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

pub fn error(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Indented continuation line under a step/error message.
pub fn detail(message: &str) {
    for line in message.lines() {
        println!("  {}", line);
    }
}

/// Final summary block: overall status, elapsed wall-clock time, and the
/// built binary when the run produced one.
pub fn summary(success: bool, elapsed: Duration, binary: Option<&Path>) {
    header("Build Summary");

    let status = if success {
        style("SUCCESS").green().bold()
    } else {
        style("FAILED").red().bold()
    };

    println!("Status: {}", status);
    println!("Time: {:.1}s", elapsed.as_secs_f64());

    if let Some(path) = binary {
        println!("Binary: {}", path.display());
    }
}
