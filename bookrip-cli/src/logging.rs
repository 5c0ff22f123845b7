// ============================================================================
// bookrip-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Logger setup and timestamps
//
// The application uses the standard `log` crate with `env_logger` as the
// backend. The default level is info, debug with --verbose, and the RUST_LOG
// environment variable overrides both:
// - RUST_LOG=info: Normal operation logs
// - RUST_LOG=debug: Every external command line
// - RUST_LOG=trace: ffmpeg progress and mp3splt output

use log::LevelFilter;

/// Log level selected by the command-line flags alone.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes env_logger. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env();
    let _ = builder.try_init();
}

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
