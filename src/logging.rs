//! Diagnostics output
//!
//! Logs go to stderr so stdout only carries results. `RUST_LOG` takes
//! precedence; otherwise `--debug` enables this crate's debug output.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn default_directive(debug: bool) -> &'static str {
    if debug { "electron_info=debug" } else { "warn" }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(debug: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(debug)
        .with_span_events(FmtSpan::NONE);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_depends_on_debug_flag() {
        assert_eq!(default_directive(true), "electron_info=debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn init_logging_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
