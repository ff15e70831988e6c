use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use dispatch_engine::config::Config;
use dispatch_engine::{Engine, reminders};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Open the record store and user directories
    let engine = Arc::new(Engine::open(&config.data_dir).await?);
    info!(data_dir = %config.data_dir.display(), "engine ready");

    // Start the periodic reminder sweep
    let scheduler = reminders::spawn_reminder_scheduler(engine, config.reminder_interval);

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    scheduler.abort();

    Ok(())
}
