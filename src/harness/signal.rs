//! Set-once "bug observed" flag shared between the reader and the driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raised by the reader when the closed predicate changes between samples.
///
/// Never cleared. The driver reads it only after joining the reader.
#[derive(Debug, Clone, Default)]
pub struct BugSignal {
    raised: Arc<AtomicBool>,
}

impl BugSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns `true` if this call raised it.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::SeqCst)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
