//! Colored stderr logger for the terminal front end

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Environment variable holding a level name (`error`..`trace`).
pub const LOG_ENV: &str = "COMPING_LOG";

struct TerminalLogger {
    level: LevelFilter,
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error".bright_red().bold(),
            Level::Warn => "warn".yellow().bold(),
            Level::Info => "info".bright_green(),
            Level::Debug => "debug".cyan(),
            Level::Trace => "trace".dimmed(),
        };
        eprintln!("{} {} {}", tag, record.target().dimmed(), record.args());
    }

    fn flush(&self) {}
}

/// Level from the flags and environment: `--verbose` wins, then `COMPING_LOG`,
/// then warnings only.
pub fn level_from(verbose: bool, env: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    env.and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install the logger. Fails if another logger is already set.
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    log::set_boxed_logger(Box::new(TerminalLogger { level }))
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    log::set_max_level(level);
    Ok(())
}
