//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! argv (HOST PORT USE_TLS DELAY_MS)
//!     → cli.rs (positional parsing, clap)
//!     → HarnessConfig (immutable)
//!     → net::SocketConnector + harness::Harness
//! ```
//!
//! # Design Decisions
//! - Four positional arguments, nothing else; values are type-checked only
//! - The close delay is a named constant, not a command-line option
//! - Config is immutable once built

pub mod cli;
pub mod schema;

pub use cli::Cli;
pub use schema::{HarnessConfig, Target, Transport, CLOSE_DELAY, READ_BUFFER_SIZE};
