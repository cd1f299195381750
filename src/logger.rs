//! Logger setup for the nodebaker binary.

use log::LevelFilter;

/// Initializes `env_logger`. `RUST_LOG`, when set, overrides the level
/// chosen by `--verbose`.
pub fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(verbose)
        .parse_default_env()
        .init();
}
