//! Command-line arguments.

use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::schema::{HarnessConfig, Target, Transport};

/// Loop connect/read/close until the closed predicate is caught changing its answer.
#[derive(Debug, Parser)]
#[command(name = "is-closed-demo", version)]
#[command(about = "Reproduce a stale closed-state report after a concurrent close", long_about = None)]
pub struct Cli {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to.
    pub port: u16,

    /// Wrap the connection in TLS (`true` or `false`).
    #[arg(action = ArgAction::Set, value_parser = parse_bool_literal)]
    pub use_tls: bool,

    /// Milliseconds to wait between the two closed-state samples (may be 0).
    pub delay_ms: u64,
}

impl Cli {
    pub fn into_config(self) -> HarnessConfig {
        HarnessConfig::new(
            Target::new(self.host, self.port),
            Transport::from_flag(self.use_tls),
            Duration::from_millis(self.delay_ms),
        )
    }
}

fn parse_bool_literal(value: &str) -> Result<bool, String> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("expected `true` or `false`, got `{}`", value))
    }
}
