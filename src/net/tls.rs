//! TLS client connection and configuration.
//!
//! # Responsibilities
//! - Build the rustls client configuration (webpki trust anchors)
//! - Drive the deferred handshake on first read and report its completion
//! - Tear the session down on close
//!
//! # Closed-state reporting
//! ```text
//! close():  shutdown transport → lock session → queue close_notify → closed = true
//! read():   lock session → handshake (once) → blocking read → unlock
//! ```
//! The reader holds the session lock while blocked, so `close()` can only
//! finish tearing the session down after the failed read has returned. A
//! closed-state query made in that window still answers `false`.

use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rustls::{CipherSuite, ClientConfig, ClientConnection, ProtocolVersion, RootCertStore};

use crate::net::connection::{closed_error, Connection, ConnectionId};

/// Build a client configuration trusting the webpki root set.
pub fn client_config() -> Result<Arc<ClientConfig>, rustls::Error> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Details of a completed handshake.
#[derive(Debug, Clone)]
pub struct HandshakeEvent {
    pub connection: ConnectionId,
    pub peer: Option<SocketAddr>,
    pub protocol: Option<ProtocolVersion>,
    pub cipher_suite: Option<CipherSuite>,
}

/// Callback invoked once per connection when its handshake completes.
pub type HandshakeListener = Arc<dyn Fn(&HandshakeEvent) + Send + Sync>;

struct Session {
    tls: ClientConnection,
    sock: TcpStream,
    handshake_reported: bool,
}

/// TLS client session over a blocking TCP stream.
pub struct TlsConnection {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    /// Second handle on the socket so `close` can interrupt a read without the session lock.
    transport: TcpStream,
    session: Mutex<Session>,
    closing: AtomicBool,
    closed: AtomicBool,
    listener: Option<HandshakeListener>,
}

impl TlsConnection {
    /// Wrap a connected stream. No bytes are exchanged until the first read.
    pub fn new(stream: TcpStream, tls: ClientConnection) -> io::Result<Self> {
        let transport = stream.try_clone()?;
        let peer = stream.peer_addr().ok();

        Ok(Self {
            id: ConnectionId::new(),
            peer,
            transport,
            session: Mutex::new(Session {
                tls,
                sock: stream,
                handshake_reported: false,
            }),
            closing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            listener: None,
        })
    }

    /// Register the handshake completion callback.
    pub fn with_handshake_listener(mut self, listener: HandshakeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    fn session(&self) -> io::Result<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|_| io::Error::other("TLS session lock poisoned"))
    }

    fn report_handshake(&self, tls: &ClientConnection) {
        let Some(listener) = &self.listener else {
            return;
        };

        listener(&HandshakeEvent {
            connection: self.id,
            peer: self.peer,
            protocol: tls.protocol_version(),
            cipher_suite: tls.negotiated_cipher_suite().map(|suite| suite.suite()),
        });
    }
}

impl std::fmt::Debug for TlsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConnection")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Connection for TlsConnection {
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

        let mut session = self.session()?;
        let Session {
            tls,
            sock,
            handshake_reported,
        } = &mut *session;

        while tls.is_handshaking() {
            tls.complete_io(sock)?;
        }
        if !*handshake_reported {
            *handshake_reported = true;
            self.report_handshake(tls);
        }

        rustls::Stream::new(tls, sock).read(buf)
    }

    fn close(&self) -> io::Result<()> {
        if self.closing.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.transport.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => return Err(e),
            _ => {}
        }

        let mut session = self.session()?;
        let Session { tls, sock, .. } = &mut *session;
        tls.send_close_notify();
        // Transport is already shut down; the alert is best effort.
        let _ = tls.write_tls(sock);

        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
