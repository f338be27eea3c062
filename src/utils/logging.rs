use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;

/// Initialize the logger with the specified log level and optional output file.
/// Records always go to stderr; with a log path they are appended there too.
pub fn initialize_logger(log_path: Option<&Path>, log_level_str: &str) -> Result<()> {
    let log_level = match log_level_str.parse::<log::LevelFilter>() {
        Ok(level) => level,
        Err(_) => log::LevelFilter::Info,
    };

    let log_file = match log_path {
        Some(path) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    let logger = env_logger::Builder::new()
        .format(move |buf, record| {
            let line = format_line(&Utc::now().to_rfc3339(), record.level(), record.args());

            if let Some(file) = &log_file
                && let Ok(mut file) = file.lock()
            {
                let _ = writeln!(file, "{line}");
            }

            writeln!(buf, "{line}")
        })
        .filter_level(log_level)
        .build();

    // A second initialization (e.g. from tests) keeps the first logger.
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(log_level);
    }

    Ok(())
}

fn format_line(timestamp: &str, level: log::Level, args: &std::fmt::Arguments<'_>) -> String {
    format!("{timestamp} [{level}] - {args}")
}
