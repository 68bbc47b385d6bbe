//! Process-wide interrupt flag.
//!
//! The REPL's SIGINT handler (out of this crate's scope) is the only
//! expected writer of [`request`]; long-running passes (extraction loop,
//! phase-polynomial rounds, matroid partition) poll [`is_requested`] once
//! per documented checkpoint and bail out with their best intermediate
//! result on a hit, then [`clear`] before returning to the REPL: one
//! process-wide singleton, no reinitialization.

use std::sync::atomic::{AtomicBool, Ordering};

static STOP_FLAG: AtomicBool = AtomicBool::new(false);

/// Raise the stop flag. Called by the (out-of-scope) signal handler.
pub fn request() {
    STOP_FLAG.store(true, Ordering::SeqCst);
}

/// Poll the stop flag without clearing it.
pub fn is_requested() -> bool {
    STOP_FLAG.load(Ordering::SeqCst)
}

/// Clear the stop flag. Called by the REPL once it has recorded the
/// `[INT]`-suffixed procedure name and resumed normal operation.
pub fn clear() {
    STOP_FLAG.store(false, Ordering::SeqCst);
}

/// Serializes tests that set the process-wide flag, across modules, so
/// parallel test execution doesn't let one test's interrupt leak into
/// another's.
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_then_clear_round_trips() {
        let _guard = TEST_LOCK.lock().unwrap();
        clear();
        assert!(!is_requested());
        request();
        assert!(is_requested());
        clear();
        assert!(!is_requested());
    }
}
