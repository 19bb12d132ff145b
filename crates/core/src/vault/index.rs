//! In-memory index structures and the full refresh pass.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::SystemTime;

use crate::storage::{StorageError, WalkFlow};
use crate::task::{Selector, Task};

use super::errors::VaultError;
use super::Vault;

/// Parsed state of one indexed note.
#[derive(Debug, Clone)]
pub(crate) struct NoteEntry {
    pub(crate) modified: SystemTime,
    pub(crate) tasks: Vec<Task>,
}

/// The task index for one vault.
///
/// Rebuilt wholesale by [`Vault::refresh`], patched incrementally by
/// [`Vault::handle_updates`] and the mutation methods. Always rebuildable
/// from the store; never persisted.
#[derive(Debug, Default)]
pub(crate) struct Index {
    /// Document path -> parsed note state.
    pub(crate) notes: HashMap<PathBuf, NoteEntry>,
    /// Task hash -> owning document path.
    pub(crate) task_owner: HashMap<String, PathBuf>,
    /// Task hash -> task value, for immediate-visibility mutation.
    pub(crate) tasks: HashMap<String, Task>,
    /// Filter active since the last full refresh.
    pub(crate) selector: Selector,
}

impl Index {
    /// Drop a note and every task entry owned by it.
    pub(crate) fn remove_note(&mut self, path: &Path) {
        let owned: Vec<String> = self
            .task_owner
            .iter()
            .filter(|(_, owner)| owner.as_path() == path)
            .map(|(hash, _)| hash.clone())
            .collect();
        for hash in owned {
            self.task_owner.remove(&hash);
            self.tasks.remove(&hash);
        }
        self.notes.remove(path);
    }

    pub(crate) fn insert_note(&mut self, path: PathBuf, modified: SystemTime, tasks: Vec<Task>) {
        for task in &tasks {
            let hash = task.hash();
            self.task_owner.insert(hash.clone(), path.clone());
            self.tasks.insert(hash, task.clone());
        }
        self.notes.insert(path, NoteEntry { modified, tasks });
    }

    /// Detach one task by hash, returning its owner and value.
    pub(crate) fn remove_task(&mut self, hash: &str) -> Option<(PathBuf, Task)> {
        let path = self.task_owner.remove(hash)?;
        let task = self.tasks.remove(hash)?;
        Some((path, task))
    }

    pub(crate) fn insert_task(&mut self, path: PathBuf, task: Task) {
        let hash = task.hash();
        self.task_owner.insert(hash.clone(), path);
        self.tasks.insert(hash, task);
    }
}

/// Directories pruned from every walk: hidden names cover vault metadata
/// (`.obsidian`) and trash (`.trash`).
pub(crate) fn is_reserved_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}

impl Vault {
    /// Full walk of the store: rebuild the index from scratch and swap it in
    /// atomically under the write lock. Per-document failures are logged and
    /// skipped; a walk-level failure aborts and propagates.
    pub fn refresh(&self, selector: Selector) -> Result<(), VaultError> {
        tracing::info!("extracting tasks");

        let root = self.config.base_dir.clone();
        let mut notes: HashMap<PathBuf, NoteEntry> = HashMap::new();
        let mut task_owner: HashMap<String, PathBuf> = HashMap::new();
        let mut tasks: HashMap<String, Task> = HashMap::new();

        self.store.walk(&root, &mut |entry| {
            if self.cancel.load(Ordering::SeqCst) {
                return Err(StorageError::Cancelled);
            }
            if entry.is_dir {
                if entry.path != root && is_reserved_dir(&entry.path) {
                    return Ok(WalkFlow::SkipDir);
                }
                return Ok(WalkFlow::Continue);
            }
            if !is_markdown(&entry.path) {
                return Ok(WalkFlow::Continue);
            }

            tracing::debug!(path = %entry.path.display(), "extracting");
            let file_tasks = match self.extract_tasks(&entry.path, selector) {
                Ok(file_tasks) => file_tasks,
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "extract tasks failed");
                    Vec::new()
                }
            };
            for task in &file_tasks {
                let hash = task.hash();
                task_owner.insert(hash.clone(), entry.path.clone());
                tasks.insert(hash, task.clone());
            }
            notes.insert(
                entry.path.clone(),
                NoteEntry { modified: entry.modified, tasks: file_tasks },
            );
            Ok(WalkFlow::Continue)
        })?;

        let mut idx = self.write_index();
        *idx = Index { notes, task_owner, tasks, selector };
        drop(idx);

        tracing::info!("extracting done");
        Ok(())
    }

    /// Parse every selected task line of one document.
    pub(crate) fn extract_tasks(
        &self,
        path: &Path,
        selector: Selector,
    ) -> Result<Vec<Task>, VaultError> {
        let data = self.store.read(path)?;
        let text = String::from_utf8_lossy(&data);
        Ok(text
            .lines()
            .filter_map(Task::parse)
            .filter(|task| selector.selects(task))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_note_drops_owned_tasks() {
        let mut index = Index::default();
        let path = PathBuf::from("/vault/a.md");
        let task = Task::new("one");
        index.insert_note(path.clone(), SystemTime::UNIX_EPOCH, vec![task.clone()]);

        // A mutation-patched hash pointing at the same note.
        let mut patched = task.clone();
        patched.text = "one patched".into();
        index.insert_task(path.clone(), patched.clone());

        index.remove_note(&path);
        assert!(index.notes.is_empty());
        assert!(index.task_owner.is_empty());
        assert!(index.tasks.is_empty());
    }

    #[test]
    fn reserved_dir_detection() {
        assert!(is_reserved_dir(Path::new("/vault/.obsidian")));
        assert!(is_reserved_dir(Path::new("/vault/.trash")));
        assert!(!is_reserved_dir(Path::new("/vault/projects")));
    }

    #[test]
    fn markdown_detection() {
        assert!(is_markdown(Path::new("/vault/a.md")));
        assert!(!is_markdown(Path::new("/vault/a.txt")));
        assert!(!is_markdown(Path::new("/vault/md")));
    }
}
