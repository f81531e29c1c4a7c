//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Target + Transport
//!     → connector.rs (blocking TCP connect, optional TLS session)
//!     → plain.rs / tls.rs (Connection implementations)
//!     → shared by reference with the reader and closer threads
//!
//! Connection States:
//!     Open → Closed (set by close(), observed through is_closed())
//! ```
//!
//! # Design Decisions
//! - Blocking sockets; each connection is read by one thread and closed by another
//! - Closing is done through `&self` so the closer never waits for the reader
//!   to give up a borrow
//! - TLS handshake is deferred until the first read

pub mod connection;
pub mod connector;
pub mod plain;
pub mod tls;

pub use connection::{Connection, ConnectionId};
pub use connector::{Connector, SocketConnector};
pub use plain::PlainConnection;
pub use tls::{HandshakeEvent, HandshakeListener, TlsConnection};
