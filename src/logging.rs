use std::env;
use std::io::Write;

use log::{Level, LevelFilter, Metadata, Record};

/// Writes `LEVEL [target] message` lines to stderr. Records from other crates
/// are only shown at `warn` and above.
struct StderrLogger {
    level: LevelFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr().lock(),
                "{:<5} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger with a level taken from the `BATTLESHIP_LOG`
/// environment variable (`error`, `warn`, `info`, `debug`, `trace`, `off`).
/// Defaults to `info` if the variable is not set or invalid. Calling it twice
/// is harmless.
pub fn init_logging() {
    let level = env::var("BATTLESHIP_LOG")
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info);
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level.max(LevelFilter::Warn));
    }
}
