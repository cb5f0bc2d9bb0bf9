//! Logger initialisation for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages from the border engine are
/// printed. Otherwise only info level and above are shown. `RUST_LOG` takes
/// precedence over both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_with_filter(&level.to_string());
}

/// Initializes the global logger with an explicit default filter such as
/// `"lisiere=trace"`.
pub fn init_with_filter(filter: &str) {
    let env = Env::default().default_filter_or(filter);
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}
