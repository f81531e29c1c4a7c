//! is-closed-demo
//!
//! Reproduces a stale closed-state report after a concurrent close.
//!
//! # Iteration
//!
//! ```text
//!   main (driver)            reader-N                    closer-N
//!   ─────────────            ────────                    ────────
//!   connect ──────────────▶  read() blocks ...
//!   sleep(CLOSE_DELAY)            .
//!   spawn ─────────────────────────────────────────────▶ close()
//!                            read() fails
//!                            A = is_closed()
//!                            sleep(DELAY_MS)
//!                            B = is_closed()
//!                            A != B → raise bug signal
//!   join, check signal ◀────
//! ```
//!
//! Usage: `is-closed-demo HOST PORT USE_TLS DELAY_MS`

use clap::Parser;

use is_closed_demo::config::Cli;
use is_closed_demo::net::SocketConnector;
use is_closed_demo::observability::logging;
use is_closed_demo::Harness;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();

    logging::init_logging()?;

    tracing::info!(
        target_addr = %config.target,
        transport = %config.transport,
        delay_ms = config.post_failure_delay.as_millis() as u64,
        close_delay_ms = config.close_delay.as_millis() as u64,
        "is-closed-demo v0.1.0 starting"
    );

    let connector = SocketConnector::new(config.transport)?;
    let harness = Harness::new(connector, config);
    harness.run()?;

    Ok(())
}
