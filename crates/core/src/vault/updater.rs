//! Incremental index maintenance, driven by change signals.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::SystemTime;

use crate::storage::{StorageError, WalkFlow};

use super::Vault;
use super::index::{is_markdown, is_reserved_dir};

impl Vault {
    fn is_modified(&self, path: &Path, modified: SystemTime) -> bool {
        let idx = self.read_index();
        idx.notes.get(path).is_none_or(|note| note.modified != modified)
    }

    /// One incremental pass: re-walk the tree, reparse only documents whose
    /// modification time advanced, and prune index entries for documents the
    /// walk no longer sees. Unchanged documents keep their previously parsed
    /// tasks verbatim.
    pub fn handle_updates(&self) {
        tracing::info!("updating tasks");

        let selector = self.read_index().selector;
        let root = self.config.base_dir.clone();
        let mut visited: HashSet<PathBuf> = HashSet::new();

        let walk = self.store.walk(&root, &mut |entry| {
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

            visited.insert(entry.path.clone());
            if !self.is_modified(&entry.path, entry.modified) {
                return Ok(WalkFlow::Continue);
            }

            tracing::info!(path = %entry.path.display(), "note modified, reloading");
            match self.extract_tasks(&entry.path, selector) {
                Ok(tasks) => {
                    let mut idx = self.write_index();
                    idx.remove_note(&entry.path);
                    idx.insert_note(entry.path.clone(), entry.modified, tasks);
                }
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "extract tasks failed");
                }
            }
            Ok(WalkFlow::Continue)
        });

        if let Err(e) = walk {
            tracing::warn!(error = %e, "incremental update walk failed");
            return;
        }

        // Documents the walk no longer sees are pruned eagerly so this pass
        // converges to the same state a full refresh would produce.
        let mut idx = self.write_index();
        let stale: Vec<PathBuf> =
            idx.notes.keys().filter(|path| !visited.contains(*path)).cloned().collect();
        for path in stale {
            tracing::info!(path = %path.display(), "note removed, pruning");
            idx.remove_note(&path);
        }
        drop(idx);

        tracing::info!("updating done");
    }
}
