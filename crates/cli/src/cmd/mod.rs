//! Subcommand implementations.

pub mod add;
pub mod mutate;
pub mod tasks;
pub mod watch;

use std::sync::Arc;

use color_eyre::eyre::{Result, bail};
use mdtasks_core::config::ConfigFile;
use mdtasks_core::storage::LocalStore;
use mdtasks_core::task::Task;
use mdtasks_core::vault::Vault;

/// Open the configured vault for a one-shot command. Mutations run inline so
/// the command observes its own failure before exiting.
fn open_vault(cf: &ConfigFile) -> Vault {
    let mut config = cf.vault.clone();
    config.async_mutations = false;
    Vault::new(Arc::new(LocalStore::new()), config)
}

/// Find the single indexed task whose id starts with `prefix`.
fn resolve_task(vault: &Vault, prefix: &str) -> Result<(String, Task)> {
    let mut matches: Vec<(String, Task)> = vault
        .get_tasks()
        .into_iter()
        .map(|t| (t.hash(), t))
        .filter(|(hash, _)| hash.starts_with(prefix))
        .collect();

    match matches.len() {
        0 => bail!("no task matches id '{prefix}'"),
        1 => Ok(matches.remove(0)),
        n => bail!("id '{prefix}' is ambiguous ({n} matches); use a longer prefix"),
    }
}
