//! Incremental updates: new, changed, and deleted notes.

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mdtasks_core::config::VaultConfig;
use mdtasks_core::storage::LocalStore;
use mdtasks_core::task::Selector;
use mdtasks_core::vault::Vault;
use tempfile::TempDir;

fn vault_over(dir: &TempDir) -> Vault {
    Vault::new(Arc::new(LocalStore::new()), VaultConfig::rooted_at(dir.path()))
}

#[test]
fn new_note_is_indexed_by_update_pass() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "- [ ] first \u{1f4c5} 2024-01-01\n").unwrap();

    let vault = vault_over(&dir);
    vault.refresh(Selector::All).unwrap();
    assert_eq!(vault.get_tasks().len(), 1);

    fs::write(dir.path().join("b.md"), "- [ ] second \u{1f4c5} 2024-01-02\n").unwrap();
    vault.handle_updates();

    let mut texts: Vec<String> = vault.get_tasks().into_iter().map(|t| t.text).collect();
    texts.sort();
    assert_eq!(texts, vec!["first", "second"]);
}

#[test]
fn deleted_note_is_pruned() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keep.md"), "- [ ] keep\n").unwrap();
    fs::write(dir.path().join("drop.md"), "- [ ] drop\n").unwrap();

    let vault = vault_over(&dir);
    vault.refresh(Selector::All).unwrap();
    assert_eq!(vault.get_tasks().len(), 2);

    fs::remove_file(dir.path().join("drop.md")).unwrap();
    vault.handle_updates();

    let tasks = vault.get_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "keep");
}

#[test]
fn update_pass_reuses_the_refresh_selector() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "- [ ] dated \u{1f4c5} 2024-01-01\n").unwrap();

    let vault = vault_over(&dir);
    vault.refresh(Selector::Scheduled).unwrap();
    assert_eq!(vault.get_tasks().len(), 1);

    // An undated task arrives; Scheduled keeps it out of the index.
    fs::write(dir.path().join("b.md"), "- [ ] floating\n").unwrap();
    vault.handle_updates();

    let tasks = vault.get_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "dated");
}

#[test]
fn rewritten_note_replaces_its_tasks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.md");
    fs::write(&path, "- [ ] old one\n- [ ] old two\n").unwrap();

    let vault = vault_over(&dir);
    vault.refresh(Selector::All).unwrap();
    assert_eq!(vault.get_tasks().len(), 2);

    // mtime granularity guard.
    thread::sleep(Duration::from_millis(10));
    fs::write(&path, "- [ ] replacement\n").unwrap();
    vault.handle_updates();

    let tasks = vault.get_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "replacement");
}
