// Fri Oct 16 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the logger. `RUST_LOG` wins over the verbosity flag when set.
    pub fn init(verbosity: u8) {
        if std::env::var_os("RUST_LOG").is_some() {
            let _ = env_logger::Builder::from_default_env()
                .format_timestamp(None)
                .try_init();
            return;
        }
        Self::init_logger(Self::level_from_verbosity(verbosity));
    }

    pub fn init_logger(level: LevelFilter) {
        let logger = Box::new(ColoredLogger::new(level));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
}

impl ColoredLogger {
    fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn format_level(level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = format!("[{}]", record.target());
        eprintln!(
            "{} {} {}",
            Self::format_level(record.level()),
            target.dimmed(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Logs the elapsed time of a scope at debug level when dropped.
pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("{} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!(
            "{} took {}",
            self.name,
            super::format_duration(self.start.elapsed())
        );
    }
}
