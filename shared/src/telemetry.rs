use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Crates whose log level `--verbose` raises to `debug`.
const WORKSPACE_CRATES: &[&str] = &["application", "infrastructure", "presentation", "finance_agent"];

pub struct Telemetry {
    start: Instant,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the log filter. `RUST_LOG` wins when set.
pub fn log_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut directives = String::from("warn");
    if verbose {
        for name in WORKSPACE_CRATES {
            directives.push_str(&format!(",{name}=debug"));
        }
    }
    EnvFilter::new(directives)
}

/// Install the global subscriber. Logs go to stderr so answers on stdout stay clean.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
