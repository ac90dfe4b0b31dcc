//! Homework Bot - Main Entry Point

use anyhow::{Context, Result};
use hwbot_bot::HomeworkBot;
use hwbot_common::{init_default_logging, init_logging};
use hwbot_config::ConfigLoader;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match ConfigLoader::from_env().load() {
        Ok(config) => config,
        Err(e) => {
            init_default_logging().context("Failed to initialize logging")?;
            error!(critical = true, error = %e, "Failed to load configuration");
            return Err(e).context("Failed to load configuration");
        }
    };

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    info!("Starting homework bot v{}", env!("CARGO_PKG_VERSION"));

    let mut bot = match HomeworkBot::new(&config) {
        Ok(bot) => bot,
        Err(e) => {
            error!(critical = true, error = %e, "Startup aborted");
            return Err(e).context("Failed to start homework bot");
        }
    };

    tokio::select! {
        () = bot.run() => {}
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received shutdown signal"),
                Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
            }
        }
    }

    info!("Homework bot stopped at cursor {}", bot.cursor());
    Ok(())
}
