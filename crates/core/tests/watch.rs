//! End-to-end: change signals drive incremental updates.

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use mdtasks_core::config::VaultConfig;
use mdtasks_core::storage::LocalStore;
use mdtasks_core::task::Selector;
use mdtasks_core::vault::Vault;
use tempfile::TempDir;

#[test]
fn watcher_signal_refreshes_the_index() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "- [ ] existing \u{1f4c5} 2024-01-01\n").unwrap();

    let store = Arc::new(LocalStore::with_poll_interval(Duration::from_millis(30)));
    let vault = Arc::new(Vault::new(store, VaultConfig::rooted_at(dir.path())));
    vault.refresh(Selector::All).unwrap();
    vault.start_watching().unwrap();

    fs::write(dir.path().join("b.md"), "- [ ] arrived \u{1f4c5} 2024-01-02\n").unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if vault.get_tasks().iter().any(|t| t.text == "arrived") {
            break;
        }
        assert!(Instant::now() < deadline, "watcher never picked up the change");
        thread::sleep(Duration::from_millis(10));
    }

    vault.stop();
}

#[test]
fn stop_terminates_the_listener() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LocalStore::with_poll_interval(Duration::from_millis(30)));
    let vault = Arc::new(Vault::new(store, VaultConfig::rooted_at(dir.path())));
    vault.refresh(Selector::All).unwrap();
    vault.start_watching().unwrap();

    // stop() joins the listener; returning at all is the assertion.
    vault.stop();
}
