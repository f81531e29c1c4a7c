//! Loop driver.
//!
//! # States
//! ```text
//! RUNNING: banner → connect → spawn reader → sleep → spawn closer → join
//! RUNNING → DONE: BugSignal raised after the joins
//! DONE: report the iteration count
//! ```
//!
//! There is no iteration bound. If the connection never reports an
//! inconsistent closed state, the driver never finishes.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::harness::closer::close_connection;
use crate::harness::reader::{read_and_compare, ReadOutcome};
use crate::harness::signal::BugSignal;
use crate::net::Connector;

/// Driver state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Done,
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Number of iterations started, including the one that observed the bug.
    pub iterations: u64,
    /// Outcome of the final iteration.
    pub observation: ReadOutcome,
}

/// Repeats connect/read/close iterations until the reader raises the bug signal.
pub struct Harness<C> {
    connector: C,
    config: HarnessConfig,
    signal: BugSignal,
}

impl<C: Connector> Harness<C> {
    pub fn new(connector: C, config: HarnessConfig) -> Self {
        Self {
            connector,
            config,
            signal: BugSignal::new(),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn signal(&self) -> &BugSignal {
        &self.signal
    }

    /// Current state, derived from the bug signal.
    pub fn state(&self) -> DriverState {
        if self.signal.is_raised() {
            DriverState::Done
        } else {
            DriverState::Running
        }
    }

    /// Run until an inconsistency is observed.
    ///
    /// Returns immediately without starting an iteration if the signal is
    /// already raised from an earlier run.
    pub fn run(&self) -> Result<Option<Report>, HarnessError> {
        let mut iterations = 0;
        let mut observation = None;

        while self.state() == DriverState::Running {
            iterations += 1;
            observation = Some(self.run_iteration(iterations)?);
        }

        let Some(observation) = observation else {
            return Ok(None);
        };

        tracing::info!(iterations, "Finished after {} attempt(s).", iterations);
        Ok(Some(Report {
            iterations,
            observation,
        }))
    }

    /// One connect → read → close sequence.
    pub fn run_iteration(&self, iteration: u64) -> Result<ReadOutcome, HarnessError> {
        let config = &self.config;
        tracing::info!(
            iteration,
            "Testing (loop={}) against host={}, port={}, tls={}, delay_ms={}.",
            iteration,
            config.target.host,
            config.target.port,
            config.transport.is_tls(),
            config.post_failure_delay.as_millis()
        );

        let conn = self.connector.connect(&config.target)?;

        let reader = {
            let conn = Arc::clone(&conn);
            let signal = self.signal.clone();
            let delay = config.post_failure_delay;
            spawn("reader", iteration, move || read_and_compare(conn.as_ref(), delay, &signal))?
        };

        // Give the reader time to reach its blocking read. Not a barrier.
        thread::sleep(config.close_delay);

        let closer = {
            let conn = Arc::clone(&conn);
            spawn("closer", iteration, move || close_connection(conn.as_ref()))?
        };

        // A failed close may leave the reader blocked forever; it is left
        // detached and the error is returned.
        closer
            .join()
            .map_err(|_| HarnessError::ThreadPanicked { role: "closer" })??;

        reader
            .join()
            .map_err(|_| HarnessError::ThreadPanicked { role: "reader" })
    }
}

fn spawn<T, F>(role: &'static str, iteration: u64, f: F) -> Result<JoinHandle<T>, HarnessError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(format!("{}-{}", role, iteration))
        .spawn(f)
        .map_err(|source| HarnessError::Spawn { role, source })
}
