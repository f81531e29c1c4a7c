//! Connection abstraction and identity.
//!
//! # Responsibilities
//! - Define the operations the harness needs from a socket handle
//! - Generate unique connection IDs for log correlation
//! - Provide the error returned when reading from a closed connection

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough since we only need uniqueness.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A stream socket shared between a reading thread and a closing thread.
///
/// All methods take `&self`: `read` may be blocked in one thread while
/// `close` is called from another.
pub trait Connection: Send + Sync {
    /// Identifier used in log lines.
    fn id(&self) -> ConnectionId;

    /// Remote address, if known.
    fn peer_addr(&self) -> Option<SocketAddr>;

    /// Blocking read into `buf`.
    ///
    /// Fails with [`closed_error`] if the connection was closed before or
    /// during the call.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Close the connection, unblocking any pending `read`. Closing twice is a no-op.
    fn close(&self) -> io::Result<()>;

    /// Whether the connection reports itself closed.
    fn is_closed(&self) -> bool;
}

/// Error returned by reads on a closed connection.
pub fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "socket is closed")
}
