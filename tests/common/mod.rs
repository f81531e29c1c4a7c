//! Shared utilities for integration testing.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use is_closed_demo::config::Target;
use is_closed_demo::net::connection::closed_error;
use is_closed_demo::net::{Connection, ConnectionId, Connector};
use is_closed_demo::ConnectError;
use tokio::net::TcpListener;

/// Start a local echo server and return its address.
///
/// Connections stay open until the client closes them.
#[allow(dead_code)]
pub async fn start_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let (mut rd, mut wr) = socket.split();
                        let _ = tokio::io::copy(&mut rd, &mut wr).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Connection that keeps reporting open for `lag` after `close` returns.
///
/// `read` blocks until the connection is closed, then fails.
pub struct LaggingConnection {
    id: ConnectionId,
    lag: Duration,
    closed_at: Mutex<Option<Instant>>,
    wake: Condvar,
}

impl LaggingConnection {
    pub fn new(lag: Duration) -> Self {
        Self {
            id: ConnectionId::new(),
            lag,
            closed_at: Mutex::new(None),
            wake: Condvar::new(),
        }
    }
}

impl Connection for LaggingConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        None
    }

    fn read(&self, _buf: &mut [u8]) -> io::Result<usize> {
        let mut closed_at = self.closed_at.lock().unwrap();
        while closed_at.is_none() {
            closed_at = self.wake.wait(closed_at).unwrap();
        }
        Err(closed_error())
    }

    fn close(&self) -> io::Result<()> {
        self.closed_at.lock().unwrap().get_or_insert_with(Instant::now);
        self.wake.notify_all();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed_at
            .lock()
            .unwrap()
            .is_some_and(|at| at.elapsed() >= self.lag)
    }
}

/// Connector handing out [`LaggingConnection`]s and counting connects.
#[allow(dead_code)]
pub struct LaggingConnector {
    pub lag: Duration,
    pub connects: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl LaggingConnector {
    pub fn new(lag: Duration) -> Self {
        Self {
            lag,
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Connector for LaggingConnector {
    fn connect(&self, _target: &Target) -> Result<Arc<dyn Connection>, ConnectError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(LaggingConnection::new(self.lag)))
    }
}

/// Start a local TLS server with a self-signed `localhost` certificate.
///
/// Returns the server address and a client config trusting that certificate.
/// Each accepted connection completes the handshake and then reads until the
/// client goes away.
#[allow(dead_code)]
pub fn start_tls_server() -> (SocketAddr, Arc<rustls::ClientConfig>) {
    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
    use std::io::Read;

    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der = cert.der().clone();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let server_config = Arc::new(
        rustls::ServerConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![cert_der.clone()], key_der)
            .unwrap(),
    );

    let mut roots = rustls::RootCertStore::empty();
    roots.add(cert_der).unwrap();
    let client_config = Arc::new(
        rustls::ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    );

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        for socket in listener.incoming() {
            let Ok(socket) = socket else { break };
            let server_config = server_config.clone();
            std::thread::spawn(move || {
                let session = rustls::ServerConnection::new(server_config).unwrap();
                let mut stream = rustls::StreamOwned::new(session, socket);
                let mut buf = [0u8; 1024];
                while let Ok(n) = stream.read(&mut buf) {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    (addr, client_config)
}
