use std::path::Path;

use tracing::info;

use dispatch_core::errors::DispatchResult;

use crate::store::CHATS_DIR;

/// Creates the on-disk layout the store expects: the data directory itself
/// plus the subdirectory holding one log file per chat pair. Collection files
/// are not seeded; a missing file reads as an empty collection.
pub async fn initialize_data_dir(data_dir: &Path) -> DispatchResult<()> {
    info!("Initializing data directory at {}", data_dir.display());

    tokio::fs::create_dir_all(data_dir.join(CHATS_DIR)).await?;

    Ok(())
}
