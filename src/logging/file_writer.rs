//! Daily log files
//!
//! Each day gets one file under `<root>/log/`, opened with a greeting line and
//! appended to with timestamped entries.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use super::retention::{cleanup_old_logs_with_retention, FILE_DATE_FORMAT};

/// Folder created inside the root directory for log files
pub const LOGS_DIR_NAME: &str = "log";

/// Generate the dated log file path
pub fn create_log_file_path(logs_dir: &Path, prefix: Option<&str>, date: NaiveDate) -> PathBuf {
    let date = date.format(FILE_DATE_FORMAT);
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => logs_dir.join(format!("{}-{}.log", prefix, date)),
        None => logs_dir.join(format!("{}.log", date)),
    }
}

/// First line of every new log file
pub fn greeting(date: NaiveDate) -> String {
    format!(
        "====---- Hello! This is log file of {} ! ----====",
        date.format(FILE_DATE_FORMAT)
    )
}

/// An append-only log file
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Open today's log file, creating it if needed
    ///
    /// With an explicit `file_path` that file is used as is. Otherwise files
    /// live in `<root>/log/`, which is swept for files older than
    /// `retention_days` first.
    pub fn open(
        root: &Path,
        prefix: Option<&str>,
        file_path: Option<&Path>,
        retention_days: u32,
    ) -> Result<Self> {
        let today = Local::now().date_naive();

        let path = match file_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .context("Failed to create directory for log file")?;
                }
                path.to_path_buf()
            }
            None => {
                let logs_dir = root.join(LOGS_DIR_NAME);
                fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;

                match cleanup_old_logs_with_retention(&logs_dir, retention_days) {
                    Ok(0) => {}
                    Ok(count) => tracing::info!("Removed {} expired log file(s)", count),
                    Err(e) => tracing::warn!("Failed to clean up old logs: {:#}", e),
                }

                create_log_file_path(&logs_dir, prefix, today)
            }
        };

        if !path.exists() {
            fs::write(&path, greeting(today))
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
        }

        Ok(Self { path })
    }

    /// Full path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped entry
    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;

        write!(file, "\n[{}]: {}", Local::now().to_rfc3339(), text)
            .context("Failed to write log entry")?;

        Ok(())
    }
}
