//! Ctrl-C handling while a suite runs
//!
//! The first Ctrl-C during a run lets the current test finish and then
//! stops, so the partial results are still reported. A second Ctrl-C, or
//! one outside a run, exits immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

/// Exit status used when the process is interrupted
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static INSTALL: Once = Once::new();
static STATE: InterruptState = InterruptState::new();

/// What the signal handler should do with one Ctrl-C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Finish the current test, then stop
    StopAfterCurrent,
    Exit,
}

#[derive(Debug)]
pub struct InterruptState {
    armed: AtomicBool,
    interrupted: AtomicBool,
}

impl Default for InterruptState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptState {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            interrupted: AtomicBool::new(false),
        }
    }

    pub fn arm(&self) {
        self.interrupted.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn signal(&self) -> Response {
        if self.armed.load(Ordering::SeqCst) && !self.interrupted.swap(true, Ordering::SeqCst) {
            Response::StopAfterCurrent
        } else {
            Response::Exit
        }
    }
}

fn install_handler() {
    INSTALL.call_once(|| {
        let installed = ctrlc::set_handler(|| match STATE.signal() {
            Response::StopAfterCurrent => {
                eprintln!("\nInterrupted: stopping after the current test (Ctrl-C again to abort)");
            }
            Response::Exit => std::process::exit(INTERRUPTED_EXIT_CODE),
        });
        if let Err(e) = installed {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    });
}

/// Armed for as long as it lives; dropping it restores exit-on-Ctrl-C
#[derive(Debug)]
pub struct InterruptGuard {
    _private: (),
}

impl InterruptGuard {
    pub fn arm() -> Self {
        install_handler();
        STATE.arm();
        Self { _private: () }
    }

    pub fn interrupted(&self) -> bool {
        STATE.interrupted()
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        STATE.disarm();
    }
}
