//! Closed-state race harness library.
//!
//! Repeatedly connects to a host, blocks one thread in a read, closes the
//! connection from another thread, and checks whether the connection's closed
//! predicate gives the same answer immediately after the read fails and a
//! short delay later.

pub mod config;
pub mod error;
pub mod harness;
pub mod net;
pub mod observability;

pub use config::HarnessConfig;
pub use error::{ConnectError, HarnessError};
pub use harness::{Harness, Report};
