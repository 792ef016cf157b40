//! Top-level operator interrupt handling.
//!
//! SIGINT is hooked once, at process start, and the hook only flags the run.
//! The in-flight subprocess still exits with the foreground process group, so
//! the current step fails on its own; `main` then reports overall failure
//! with the usual summary block instead of dying mid-narration. Partial
//! artifacts from an interrupted run are left in place — no cleanup is
//! attempted.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn flag_interrupt(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the process-wide SIGINT hook. Call once, before the run starts.
pub fn install() {
    #[cfg(unix)]
    {
        let handler = flag_interrupt as extern "C" fn(libc::c_int);
        // SAFETY: the handler performs a single atomic store, which is
        // async-signal-safe.
        unsafe {
            libc::signal(libc::SIGINT, handler as libc::sighandler_t);
        }
    }
}

/// Whether the operator interrupted the run.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn sigint_flags_the_run_instead_of_killing_the_process() {
        install();
        assert!(!interrupted());

        unsafe {
            libc::raise(libc::SIGINT);
        }

        assert!(interrupted());
        INTERRUPTED.store(false, Ordering::SeqCst);
    }
}
