//! Plain-text logger behind the `log` facade.
//!
//! Lines go to stderr in the format:
//!
//! ```text
//! 20261018T09:14:03.512 - src/sync.rs:58 - INFO - bootstrap: remote mode, 4 contact(s)
//! ```
//!
//! The level comes from `SMARTCONTACT_LOG` (`error`, `warn`, `info`, `debug`,
//! `trace`, `off`) and defaults to `info`.

use std::io::Write;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

pub const LOG_ENV: &str = "SMARTCONTACT_LOG";

struct StderrLogger {
    level: LevelFilter,
}

static LOGGER: OnceCell<StderrLogger> = OnceCell::new();

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.level(),
            &record.args().to_string(),
        );
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Format the current wall-clock time as `YYYYMMDDTHH:MM:SS.mmm`.
pub fn format_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%dT%H:%M:%S%.3f").to_string()
}

fn format_line(file: &str, line: u32, level: log::Level, msg: &str) -> String {
    format!("{} - {file}:{line} - {level} - {msg}", format_timestamp())
}

fn level_from_env() -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the logger. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let level = level_from_env();
    let logger = LOGGER.get_or_init(|| StderrLogger { level });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
}
