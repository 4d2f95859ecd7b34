//! Process-wide tracing setup shared by the coordinator and shard binaries.
//!
//! Mirrors the `telemetry::configure()` builder used throughout this workspace, reduced to the
//! pieces this project needs: a filter-directive string and a stdout-vs-tty choice. Metrics
//! export and OpenTelemetry forwarding are external concerns and are not reimplemented here; see
//! `SPEC_FULL.md` for the non-goal this narrows.

use tracing_subscriber::{
    fmt,
    EnvFilter,
};

/// A builder for process-wide tracing configuration.
#[must_use]
pub struct Configure {
    filter_directives: String,
    force_stdout: bool,
}

/// Starts building a [`Configure`] with the crate's default filter (`info`).
pub fn configure() -> Configure {
    Configure {
        filter_directives: "info".to_string(),
        force_stdout: false,
    }
}

impl Configure {
    /// Sets the `tracing_subscriber::EnvFilter` directive string, e.g. `"tpc_shard=debug,info"`.
    pub fn set_filter_directives(mut self, directives: &str) -> Self {
        self.filter_directives = directives.to_string();
        self
    }

    /// Forces human-readable output even when stdout is not a tty.
    pub fn set_force_stdout(mut self, force: bool) -> Self {
        self.force_stdout = force;
        self
    }

    /// Installs the global tracing subscriber.
    ///
    /// # Errors
    /// Returns an error if a global subscriber has already been installed.
    pub fn try_init(self) -> Result<(), tracing_subscriber::util::TryInitError> {
        let filter = EnvFilter::try_new(&self.filter_directives)
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let is_tty = atty_stdout();
        let builder = fmt().with_env_filter(filter);
        if self.force_stdout || is_tty {
            builder.try_init()
        } else {
            builder.json().try_init()
        }
    }
}

#[cfg(unix)]
fn atty_stdout() -> bool {
    use std::io::IsTerminal as _;
    std::io::stdout().is_terminal()
}

#[cfg(not(unix))]
fn atty_stdout() -> bool {
    false
}

/// Renders a serializable value as a single-line JSON string, falling back to a placeholder if
/// serialization somehow fails (it shouldn't, for the types this is called with).
pub fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{\"error\":\"failed to serialize\"}".into())
}

/// Formats bytes as a lowercase hex string, for logging addresses and transaction hashes.
pub fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}
