//! Minimal `log` backend: timestamped lines on stderr.

use std::io::Write;

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger {
    level: LevelFilter,
}

fn format_line(timestamp: &str, record: &Record<'_>) -> String {
    format!(
        "{} {:<5} {}: {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
        // Nothing sensible to do if stderr is gone.
        let _ = writeln!(std::io::stderr().lock(), "{}", format_line(&timestamp, record));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs the stderr logger at `level`. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}
