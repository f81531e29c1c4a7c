//! Plain TCP connection.

use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::net::connection::{closed_error, Connection, ConnectionId};

/// Blocking TCP stream with a local closed flag.
///
/// The flag is set before the stream is shut down, so a read unblocked by
/// `close` always observes the connection as closed.
#[derive(Debug)]
pub struct PlainConnection {
    id: ConnectionId,
    stream: TcpStream,
    peer: Option<SocketAddr>,
    closed: AtomicBool,
}

impl PlainConnection {
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self {
            id: ConnectionId::new(),
            stream,
            peer,
            closed: AtomicBool::new(false),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }
}

impl Connection for PlainConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        if self.is_closed() {
            return Err(closed_error());
        }

        match (&self.stream).read(buf) {
            // End-of-stream caused by our own shutdown, not by the peer.
            Ok(0) if self.is_closed() => Err(closed_error()),
            Err(_) if self.is_closed() => Err(closed_error()),
            other => other,
        }
    }

    fn close(&self) -> io::Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.stream.shutdown(Shutdown::Both) {
            // Peer already tore the connection down.
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
