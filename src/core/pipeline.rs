//! Fail-fast sequential step execution.
//!
//! A pipeline is an ordered list of named steps; the first failing step stops
//! the run and its name is recorded in the outcome. The pipeline is also the
//! outermost fault boundary: a panic inside a step action is captured here
//! and reported as that step's failure, so every run terminates with a
//! definite verdict.
//!
//! Steps that are conditionally meaningful (a linter falling back to a
//! simpler tool, a scanner that may be absent) encode that fallback inside
//! their own action. The pipeline itself never reorders, retries, or skips.

use std::panic::{self, AssertUnwindSafe};

use crate::report;

/// One named, ordered unit of pipeline work with a boolean success contract.
pub struct Step<'a> {
    pub name: &'static str,
    pub action: Box<dyn FnOnce() -> bool + 'a>,
}

impl<'a> Step<'a> {
    pub fn new(name: &'static str, action: impl FnOnce() -> bool + 'a) -> Self {
        Self {
            name,
            action: Box::new(action),
        }
    }
}

/// Terminal verdict of one pipeline run. No further mutation after the run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub success: bool,
    pub failed_step: Option<String>,
}

impl PipelineOutcome {
    fn passed() -> Self {
        Self {
            success: true,
            failed_step: None,
        }
    }

    fn failed_at(name: &str) -> Self {
        Self {
            success: false,
            failed_step: Some(name.to_string()),
        }
    }
}

/// Run steps in declared order, stopping at the first failure.
///
/// Exactly one of {all steps succeeded} or {first failing step identified}
/// is reported; a step past the failure point never executes.
pub fn run_sequence(steps: Vec<Step<'_>>) -> PipelineOutcome {
    for step in steps {
        let name = step.name;
        match panic::catch_unwind(AssertUnwindSafe(step.action)) {
            Ok(true) => {}
            Ok(false) => {
                report::error(&format!("Step '{}' failed", name));
                return PipelineOutcome::failed_at(name);
            }
            Err(payload) => {
                report::error(&format!(
                    "Step '{}' failed unexpectedly: {}",
                    name,
                    panic_message(payload.as_ref())
                ));
                return PipelineOutcome::failed_at(name);
            }
        }
    }

    PipelineOutcome::passed()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
