use anyhow::Result;

use tintlog::logging;
use tintlog::{Context, ExecuteOptions, Logger, LoggerOptions};

fn main() -> Result<()> {
    // Initialize tracing BEFORE any config is loaded
    logging::init_tracing("tintlog=warn")?;

    let ctx = Context::new();
    let logger = Logger::new(&ctx, "Cli", LoggerOptions::default())?;

    let message = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if message.is_empty() {
        tracing::info!("Nothing to log");
        return Ok(());
    }

    logger.execute(&message, ExecuteOptions::default())?;
    Ok(())
}
