use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Trait for checking if a render pass should stop
pub trait CancellationChecker: Clone {
    /// Returns true if the pass should stop before its next row
    fn is_cancelled(&self) -> bool;
}

/// Never cancels - for passes that always run to completion
#[derive(Clone, Copy, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Checks an atomic boolean flag, typically set by the viewer's event loop
#[derive(Clone)]
pub struct AtomicBoolChecker {
    flag: Arc<AtomicBool>,
}

impl AtomicBoolChecker {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl CancellationChecker for AtomicBoolChecker {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Cancels once a fixed number of rows has been polled.
#[derive(Clone)]
pub struct RowBudget {
    remaining: Arc<AtomicUsize>,
}

impl RowBudget {
    pub fn new(rows: usize) -> Self {
        Self {
            remaining: Arc::new(AtomicUsize::new(rows)),
        }
    }
}

impl CancellationChecker for RowBudget {
    fn is_cancelled(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_err()
    }
}
