//! Per-use-case in-flight guard: a run that finds the previous one still
//! executing is skipped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another run holds the permit.
    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit { busy: &self.busy })
    }
}

/// Released on drop, including when the holding future is cancelled.
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    busy: &'a AtomicBool,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
