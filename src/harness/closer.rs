//! Closer side of an iteration.

use crate::error::HarnessError;
use crate::net::Connection;

/// Close `conn`, unblocking the reader. Any failure is fatal.
pub fn close_connection(conn: &dyn Connection) -> Result<(), HarnessError> {
    tracing::info!(connection_id = %conn.id(), "Calling close.");
    conn.close().map_err(HarnessError::Close)
}
