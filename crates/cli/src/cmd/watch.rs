use std::sync::Arc;
use std::thread;
use std::time::Duration;

use color_eyre::eyre::Result;
use mdtasks_core::config::ConfigFile;
use mdtasks_core::storage::LocalStore;
use mdtasks_core::task::Selector;
use mdtasks_core::vault::Vault;
use tracing::info;

/// Build the index, then keep it current from store change signals until the
/// process is interrupted.
pub fn run(cf: &ConfigFile, all: bool) -> Result<()> {
    let vault = Arc::new(Vault::new(Arc::new(LocalStore::new()), cf.vault.clone()));

    let selector = if all { Selector::All } else { Selector::Scheduled };
    vault.refresh(selector)?;
    info!(tasks = vault.get_tasks().len(), "initial index built");

    vault.start_watching()?;
    info!(root = %cf.vault.base_dir.display(), "watching for changes");

    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
