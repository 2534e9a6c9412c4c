//! Logging setup: `log` facade backed by env_logger.
//!
//! The filter comes from `PROOFBADGE_LOG` (same syntax as `RUST_LOG`) and
//! falls back to the configured `app.log_level`. Output goes to stderr so
//! `proofbadge score --json` keeps stdout clean.

use chrono::Local;
use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env, Target};
use log::Level;
use std::io::Write;

pub const LOG_ENV: &str = "PROOFBADGE_LOG";

fn level_label(level: Level) -> ColoredString {
    match level {
        | Level::Error => "ERROR".red().bold(),
        | Level::Warn => "WARN ".yellow(),
        | Level::Info => "INFO ".green(),
        | Level::Debug => "DEBUG".cyan(),
        | Level::Trace => "TRACE".magenta(),
    }
}

/// Install the global logger. Later calls leave the first logger in place.
pub fn init_logging(level: &str) {
    let installed = Builder::from_env(Env::default().filter_or(LOG_ENV, level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {} {}",
                Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                level_label(record.level()),
                record.target().dimmed(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init()
        .is_ok();

    if installed {
        log::debug!("logging at {} ({} overrides)", level, LOG_ENV);
    }
}

#[cfg(test)]
pub fn init_test_logging() {
    let _ = Builder::new().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
}
