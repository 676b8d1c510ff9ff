// Terminal logging for the dropper.
// Visual: one line per lifecycle step (tool on/off, magnifier added/removed,
// color committed). `--debug` adds a line per magnifier paint; with `--debug`
// set, `RUST_LOG=color_dropper=trace` also shows every surface sample.

use tracing_subscriber::EnvFilter;

/// Our own events at `info` (or `debug`), dependencies only when they warn.
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "warn,color_dropper=debug"
    } else {
        "warn,color_dropper=info"
    }
}

/// Install the global subscriber. Later calls keep the first one.
pub fn init(debug: bool) {
    // RUST_LOG is only honoured together with --debug.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(true)))
    } else {
        EnvFilter::new(default_directives(false))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
