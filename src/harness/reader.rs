//! Reader side of an iteration.
//!
//! Issues one blocking read. When the read fails, the closed predicate is
//! sampled immediately, then again after the configured delay, and the two
//! answers are compared.

use std::thread;
use std::time::Duration;

use crate::config::READ_BUFFER_SIZE;
use crate::harness::signal::BugSignal;
use crate::net::Connection;

/// What the reader observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The read returned data (or end-of-stream) instead of failing.
    Received(usize),
    /// The read failed and both samples agreed.
    Consistent { closed: bool },
    /// The read failed and the closed predicate changed between samples.
    Inconsistent { before: bool, after: bool },
}

impl ReadOutcome {
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, ReadOutcome::Inconsistent { .. })
    }
}

/// Block on one read of `conn`, then compare closed-state samples if it fails.
///
/// Raises `signal` on an inconsistent pair. The predicate is sampled exactly
/// twice on the failure path, even when `delay` is zero.
pub fn read_and_compare(conn: &dyn Connection, delay: Duration, signal: &BugSignal) -> ReadOutcome {
    let mut buf = [0u8; READ_BUFFER_SIZE];

    tracing::info!(connection_id = %conn.id(), "Calling read...");

    let error = match conn.read(&mut buf) {
        Ok(bytes) => {
            tracing::info!(connection_id = %conn.id(), bytes, "Read returned bytes");
            return ReadOutcome::Received(bytes);
        }
        Err(error) => error,
    };

    let before = conn.is_closed();
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    let after = conn.is_closed();

    tracing::info!(connection_id = %conn.id(), error = %error, "Read failed");

    if before != after {
        signal.raise();
        tracing::error!(
            connection_id = %conn.id(),
            before,
            after,
            "{}",
            bug_banner(before, after)
        );
        ReadOutcome::Inconsistent { before, after }
    } else {
        tracing::info!(
            connection_id = %conn.id(),
            closed = before,
            "Bug not encountered. Closed state stayed={}",
            before
        );
        ReadOutcome::Consistent { closed: before }
    }
}

fn bug_banner(before: bool, after: bool) -> String {
    format!(
        "\n***********************\n\
         *** BUG BUG BUG BUG BUG\n\
         ***\n\
         *** Closed state changed from={} to={}!!!!!\n\
         ***\n\
         *** BUG BUG BUG BUG BUG\n\
         ***********************",
        before, after
    )
}
