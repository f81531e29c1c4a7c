//! Race harness subsystem.
//!
//! # Data Flow
//! ```text
//! driver.rs (one iteration)
//!     → Connector::connect
//!     → reader.rs   [thread reader-N]  blocking read; on failure sample
//!                                      is_closed(), sleep, sample again
//!     → sleep(close_delay)
//!     → closer.rs   [thread closer-N]  Connection::close
//!     → join closer, join reader
//!     → BugSignal checked: RUNNING → next iteration, DONE → report
//! ```
//!
//! # Design Decisions
//! - Native OS threads per iteration, sharing the connection through an `Arc`
//! - The close delay is a plain sleep, not a barrier; the reader may not have
//!   reached its blocking read when the closer fires
//! - No timeouts on the read or the joins

pub mod closer;
pub mod driver;
pub mod reader;
pub mod signal;

pub use driver::{DriverState, Harness, Report};
pub use reader::{read_and_compare, ReadOutcome};
pub use signal::BugSignal;
