//! Configuration schema definitions.

use std::fmt;
use std::time::Duration;

/// Time the driver waits after spawning the reader before it spawns the closer.
///
/// This is sleep-based synchronisation, not a barrier: nothing guarantees the
/// reader has entered its blocking read when the closer fires.
pub const CLOSE_DELAY: Duration = Duration::from_secs(5);

/// Size of the reader's fixed buffer.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Transport used for each connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Plain TCP stream.
    Plain,
    /// TLS client session over TCP.
    Tls,
}

impl Transport {
    /// Map the command-line `USE_TLS` flag to a transport.
    pub fn from_flag(use_tls: bool) -> Self {
        if use_tls {
            Transport::Tls
        } else {
            Transport::Plain
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Plain => write!(f, "plain"),
            Transport::Tls => write!(f, "tls"),
        }
    }
}

/// Host and port to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Root configuration for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Where every iteration connects.
    pub target: Target,

    /// Plain or TLS.
    pub transport: Transport,

    /// Pause between the two closed-predicate samples (may be zero).
    pub post_failure_delay: Duration,

    /// Pause before the closer is spawned. Defaults to [`CLOSE_DELAY`].
    pub close_delay: Duration,
}

impl HarnessConfig {
    pub fn new(target: Target, transport: Transport, post_failure_delay: Duration) -> Self {
        Self {
            target,
            transport,
            post_failure_delay,
            close_delay: CLOSE_DELAY,
        }
    }

    /// Override the close delay. Not reachable from the command line.
    pub fn with_close_delay(mut self, close_delay: Duration) -> Self {
        self.close_delay = close_delay;
        self
    }
}
