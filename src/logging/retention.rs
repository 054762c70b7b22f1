//! Log file retention management
//!
//! Log files carry their date in the name (`[prefix-]YYYY.MM.DD.log`), so age
//! is read from the file name rather than from file metadata.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};

/// Date format used in log file names
pub const FILE_DATE_FORMAT: &str = "%Y.%m.%d";

/// Clean up log files older than the specified number of days
///
/// A file dated D is removed once D + `retention_days` is before today.
/// Returns the number of files deleted.
pub fn cleanup_old_logs_with_retention(logs_dir: &Path, retention_days: u32) -> Result<usize> {
    cleanup_old_logs_before(logs_dir, retention_days, Local::now().date_naive())
}

/// Same as [`cleanup_old_logs_with_retention`] with an explicit "today"
pub fn cleanup_old_logs_before(
    logs_dir: &Path,
    retention_days: u32,
    today: NaiveDate,
) -> Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let retention = Duration::days(i64::from(retention_days));
    let mut deleted_count = 0;

    let entries = fs::read_dir(logs_dir)
        .with_context(|| format!("Failed to read logs directory {}", logs_dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        // Only process dated log files
        let date = match path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(log_file_date)
        {
            Some(date) => date,
            None => continue,
        };

        let expires = date.checked_add_signed(retention).unwrap_or(NaiveDate::MAX);
        if expires < today {
            match fs::remove_file(&path) {
                Ok(()) => deleted_count += 1,
                Err(e) => tracing::warn!("Failed to delete old log {}: {}", path.display(), e),
            }
        }
    }

    if deleted_count > 0 {
        tracing::debug!("Deleted {} old log file(s)", deleted_count);
    }

    Ok(deleted_count)
}

/// Date encoded in the trailing `YYYY.MM.DD` of a `.log` file name
pub fn log_file_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(".log")?;
    let start = stem.len().checked_sub("YYYY.MM.DD".len())?;
    let date = stem.get(start..)?;
    NaiveDate::parse_from_str(date, FILE_DATE_FORMAT).ok()
}
