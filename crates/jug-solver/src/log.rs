use log::LevelFilter;

/// Initialize logging for the CLI.
///
/// Logs go to stderr so stdout stays clean for solutions and JSON reports.
/// `verbose` selects `Debug` over `Warn`; an explicit `RUST_LOG` overrides
/// both.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A second init (e.g. from tests) is harmless
    if builder.try_init().is_ok() {
        log::debug!("logger initialized at {level:?} level");
    }
}
