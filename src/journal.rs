//! Append-only transaction log.

use crate::error::{AtmError, Result};
use chrono::{DateTime, TimeZone};
use log::debug;
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `ctime`-style timestamp, e.g. `Mon Oct 19 13:45:00 2026`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Text file receiving one line per completed menu operation.
///
/// The file is opened, written, and closed on every append.
#[derive(Debug, Clone)]
pub struct TransactionLog {
    path: PathBuf,
}

impl TransactionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TransactionLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `Transaction: <option> - Time: <timestamp>`.
    pub fn append<Tz>(&self, option: char, timestamp: &DateTime<Tz>) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let line = format_entry(option, timestamp);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AtmError::storage(&self.path, e))?;

        file.write_all(line.as_bytes())
            .map_err(|e| AtmError::storage(&self.path, e))?;

        debug!("Logged transaction {} to {}", option, self.path.display());
        Ok(())
    }
}

/// Formats a single log line, including the trailing newline.
pub fn format_entry<Tz>(option: char, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Transaction: {} - Time: {}\n",
        option,
        timestamp.format(TIMESTAMP_FORMAT)
    )
}
