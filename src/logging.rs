// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// Progress for humans goes to stdout with println!. Diagnostics (which
// directory is being listed, which file was skipped and why) go through
// `tracing` and are printed on stderr, so `--json` output stays clean.
//
// RUST_LOG always wins. Without it, -v / -vv raise the level.
// =============================================================================

use tracing_subscriber::EnvFilter;

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // try_init: a second call (tests) must not panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
