//! Logger bootstrap for the command line tool.

use log::LevelFilter;

/// Initialize the process-wide logger.
///
/// Logs at `Info` by default and at `Debug` when `debug_enabled` is set.
/// `RUST_LOG`, when present, overrides both.
pub fn init_logger(debug_enabled: bool) {
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // A logger may already be installed, e.g. by a test harness.
    if builder.try_init().is_ok() {
        log::debug!("logger initialized at {level:?} level");
    }
}
