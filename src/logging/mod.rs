//! Log files for tintlog loggers
//!
//! Provides dated append-only log files, filename-based retention, and the
//! `tracing` setup for the library's own diagnostics.

mod file_writer;
mod retention;

pub use file_writer::{create_log_file_path, greeting, LogFile, LOGS_DIR_NAME};
pub use retention::{
    cleanup_old_logs_before, cleanup_old_logs_with_retention, log_file_date, FILE_DATE_FORMAT,
};

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
