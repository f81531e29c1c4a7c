//! Error taxonomy for the harness.
//!
//! Every variant here is fatal: the driver propagates it to `main` and the
//! process stops. The expected read failure after a concurrent close is not an
//! error at this level; the reader routine handles it.

use std::io;
use thiserror::Error;

/// Errors that can occur while opening a connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// TCP connect to the target failed.
    #[error("failed to connect to {addr}: {source}")]
    Io {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Host cannot be used as a TLS server name.
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// TLS client session could not be created.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),
}

/// Fatal harness errors.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Connection establishment failed.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Closing an open connection failed.
    #[error("close failed: {0}")]
    Close(#[source] io::Error),

    /// The OS refused to start a worker thread.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked before it could be joined.
    #[error("{role} thread panicked")]
    ThreadPanicked { role: &'static str },
}
