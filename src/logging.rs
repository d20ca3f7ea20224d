//! logging setup
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Level, info, subscriber};
use tracing_subscriber::FmtSubscriber;

use crate::config::LoggingConfig;
use crate::utils;

/// Where log lines go. The TUI owns the terminal, so it logs to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Unknown log level: {0}")]
    InvalidLevel(String),
    #[error("Could not determine data directory for the log file")]
    NoDataDir,
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to install global subscriber: {0}")]
    Install(#[from] subscriber::SetGlobalDefaultError),
}

pub fn string_to_log_level(level: &str) -> Result<Level, LoggingError> {
    Level::from_str(level.trim()).map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// Path of the log file used in TUI mode
pub fn log_file_path() -> Option<PathBuf> {
    utils::get_data_dir().map(|dir| dir.join("dantags.log"))
}

/// setup logging
pub fn setup(config: &LoggingConfig, target: LogTarget, verbose: bool) -> Result<(), LoggingError> {
    if !config.enable && !verbose {
        return Ok(());
    }

    let configured = string_to_log_level(&config.level)?;
    let max_level = match (verbose, target) {
        (true, _) => Level::DEBUG,
        // stderr is shared with command output, keep it to warnings and errors
        (false, LogTarget::Stderr) => configured.min(Level::WARN),
        (false, LogTarget::File) => configured,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false);

    match target {
        LogTarget::Stderr => {
            subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
        }
        LogTarget::File => {
            let path = log_file_path().ok_or(LoggingError::NoDataDir)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            subscriber::set_global_default(
                builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .finish(),
            )?;
        }
    }

    info!(?target, "logging setup successfully");
    Ok(())
}
