//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! connector, reader, closer, driver
//!     → tracing events (structured fields: iteration, connection_id, ...)
//!     → logging.rs subscriber (EnvFilter + fmt layer)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Human-readable lines only; no machine-readable output
//! - Thread names are printed so reader and closer lines can be told apart

pub mod logging;
