//! Command execution primitives with consistent error handling.
//!
//! Every external tool invocation in the runner goes through [`run`]. Failure
//! to start the process and a nonzero exit are both represented inside the
//! returned [`CommandResult`], never as an error the caller has to unwind.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

const NOT_FOUND_PREFIX: &str = "command not found:";

/// Captured result of one external command invocation.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether this failure means the executable itself could not be found.
    /// Callers must not read further exit-code semantics into such a result:
    /// the process never started, so the code is synthesized.
    pub fn missing_executable(&self) -> bool {
        self.exit_code != 0 && self.stderr.starts_with(NOT_FOUND_PREFIX)
    }
}

/// Run an external command, capturing exit code and output.
///
/// A missing executable is reported as exit code 1 with an explanatory
/// message in stderr, indistinguishable at the type level from an ordinary
/// failing invocation. Environment overrides are merged on top of the
/// inherited environment for this invocation only; the ambient process
/// environment is never mutated.
///
/// Blocks until the subprocess terminates. No timeout is enforced, so a hung
/// tool hangs the caller.
pub fn run(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    env: &[(&str, &str)],
) -> CommandResult {
    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    if !env.is_empty() {
        cmd.envs(env.iter().copied());
    }

    match cmd.output() {
        Ok(out) => CommandResult {
            exit_code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => CommandResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: format!("{} {}", NOT_FOUND_PREFIX, program),
        },
        Err(e) => CommandResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: format!("failed to run {}: {}", program, e),
        },
    }
}

/// Run a command in `dir`, returning trimmed stdout only on success.
///
/// Useful for best-effort probes (git metadata, toolchain version) where
/// failure is expected and maps to an absent value, not an error.
pub fn run_optional(program: &str, args: &[&str], cwd: Option<&Path>) -> Option<String> {
    let result = run(program, args, cwd, &[]);
    if !result.success() {
        return None;
    }

    let stdout = result.stdout.trim().to_string();
    if stdout.is_empty() {
        None
    } else {
        Some(stdout)
    }
}

/// Extract error text from a command result.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(result: &CommandResult) -> &str {
    let stderr = result.stderr.trim();
    if !stderr.is_empty() {
        stderr
    } else {
        result.stdout.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captures_stdout() {
        let result = run("echo", &["hello"], None, &[]);
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn missing_executable_is_a_result_not_a_fault() {
        let result = run("definitely-not-a-real-tool-xyz", &[], None, &[]);
        assert_eq!(result.exit_code, 1);
        assert!(result.missing_executable());
        assert!(result.stderr.contains("command not found"));
    }

    #[test]
    fn nonzero_exit_is_captured() {
        let result = run("sh", &["-c", "exit 3"], None, &[]);
        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
        assert!(!result.missing_executable());
    }

    #[test]
    fn env_overrides_merge_onto_inherited_environment() {
        let result = run(
            "sh",
            &["-c", "echo $SLIPWAY_TEST_VAR:$PATH"],
            None,
            &[("SLIPWAY_TEST_VAR", "42")],
        );
        assert!(result.success());
        let out = result.stdout.trim();
        assert!(out.starts_with("42:"));
        // PATH survives the override - merged, not replaced
        assert!(out.len() > "42:".len());
    }

    #[test]
    fn run_respects_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let result = run("ls", &[], Some(dir.path()), &[]);
        assert!(result.success());
        assert!(result.stdout.contains("marker.txt"));
    }

    #[test]
    fn run_optional_returns_none_on_failure() {
        assert!(run_optional("false", &[], None).is_none());
        assert!(run_optional("definitely-not-a-real-tool-xyz", &[], None).is_none());
    }

    #[test]
    fn run_optional_returns_trimmed_stdout() {
        let out = run_optional("echo", &["  probe  "], None);
        assert_eq!(out.as_deref(), Some("probe"));
    }

    #[test]
    fn error_text_prefers_stderr() {
        let result = CommandResult {
            exit_code: 1,
            stdout: "stdout content".to_string(),
            stderr: "stderr content".to_string(),
        };
        assert_eq!(error_text(&result), "stderr content");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let result = CommandResult {
            exit_code: 1,
            stdout: "stdout content".to_string(),
            stderr: String::new(),
        };
        assert_eq!(error_text(&result), "stdout content");
    }
}
