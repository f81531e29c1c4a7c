//! Connection establishment.
//!
//! # Design Decisions
//! - No retries: a failed connect is a fatal configuration problem
//! - TLS client config is built once and shared by every connection
//! - The TLS handshake is not driven here; it happens on first read

use std::net::TcpStream;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};

use crate::config::{Target, Transport};
use crate::error::ConnectError;
use crate::net::connection::Connection;
use crate::net::plain::PlainConnection;
use crate::net::tls::{self, HandshakeEvent, HandshakeListener, TlsConnection};

/// Opens connections to a target.
pub trait Connector: Send + Sync {
    fn connect(&self, target: &Target) -> Result<Arc<dyn Connection>, ConnectError>;
}

/// Connector backed by real blocking sockets.
pub struct SocketConnector {
    tls: Option<Arc<ClientConfig>>,
    on_handshake: HandshakeListener,
}

impl SocketConnector {
    pub fn new(transport: Transport) -> Result<Self, ConnectError> {
        let tls = match transport {
            Transport::Plain => None,
            Transport::Tls => Some(tls::client_config()?),
        };

        Ok(Self {
            tls,
            on_handshake: Arc::new(log_handshake),
        })
    }

    /// TLS connector using a caller-built client config (e.g. private trust anchors).
    pub fn with_client_config(config: Arc<ClientConfig>) -> Self {
        Self {
            tls: Some(config),
            on_handshake: Arc::new(log_handshake),
        }
    }

    /// Replace the default handshake logger.
    pub fn with_handshake_listener(mut self, listener: HandshakeListener) -> Self {
        self.on_handshake = listener;
        self
    }

    pub fn transport(&self) -> Transport {
        if self.tls.is_some() {
            Transport::Tls
        } else {
            Transport::Plain
        }
    }
}

impl Connector for SocketConnector {
    fn connect(&self, target: &Target) -> Result<Arc<dyn Connection>, ConnectError> {
        let io_error = |source: std::io::Error| ConnectError::Io {
            addr: target.to_string(),
            source,
        };

        let stream = TcpStream::connect((target.host.as_str(), target.port)).map_err(io_error)?;
        let local_addr = stream.local_addr().map_err(io_error)?;

        let connection: Arc<dyn Connection> = match &self.tls {
            None => Arc::new(PlainConnection::new(stream)),
            Some(config) => {
                let name = ServerName::try_from(target.host.clone())
                    .map_err(|_| ConnectError::InvalidServerName(target.host.clone()))?;
                let session = ClientConnection::new(Arc::clone(config), name)?;

                Arc::new(
                    TlsConnection::new(stream, session)
                        .map_err(io_error)?
                        .with_handshake_listener(Arc::clone(&self.on_handshake)),
                )
            }
        };

        tracing::info!(
            connection_id = %connection.id(),
            peer_addr = ?connection.peer_addr(),
            local_addr = %local_addr,
            transport = %self.transport(),
            "Connected socket"
        );

        Ok(connection)
    }
}

fn log_handshake(event: &HandshakeEvent) {
    tracing::info!(
        connection_id = %event.connection,
        peer_addr = ?event.peer,
        protocol = ?event.protocol,
        cipher_suite = ?event.cipher_suite,
        "TLS handshake completed"
    );
}
