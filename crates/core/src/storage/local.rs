//! Local-filesystem accessor with a polling change watcher.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use crossbeam_channel::{RecvTimeoutError, bounded};
use walkdir::WalkDir;

use super::{Accessor, Entry, StorageError, Subscription, WalkFlow};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// [`Accessor`] over a plain directory tree.
///
/// Watching is implemented by a polling thread that snapshots modification
/// times on every tick and emits one coalesced signal per observed change.
#[derive(Debug, Clone)]
pub struct LocalStore {
    poll_interval: Duration,
}

impl LocalStore {
    pub fn new() -> Self {
        LocalStore { poll_interval: DEFAULT_POLL_INTERVAL }
    }

    /// Override the watcher poll interval (mainly for tests).
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        LocalStore { poll_interval }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Accessor for LocalStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        fs::read(path).map_err(|e| StorageError::io(path, e))
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| StorageError::io(path, e))
    }

    fn list(&self, path: &Path) -> Result<Vec<Entry>, StorageError> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(path).map_err(|e| StorageError::io(path, e))? {
            let dirent = dirent.map_err(|e| StorageError::io(path, e))?;
            let meta = dirent.metadata().map_err(|e| StorageError::io(&dirent.path(), e))?;
            entries.push(Entry {
                path: dirent.path(),
                is_dir: meta.is_dir(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Entry) -> Result<WalkFlow, StorageError>,
    ) -> Result<(), StorageError> {
        let mut iter = WalkDir::new(root).follow_links(false).into_iter();
        while let Some(item) = iter.next() {
            let dirent = item.map_err(|e| StorageError::Walk {
                root: root.to_path_buf(),
                message: e.to_string(),
            })?;
            let meta = dirent.metadata().map_err(|e| StorageError::Walk {
                root: root.to_path_buf(),
                message: e.to_string(),
            })?;

            let entry = Entry {
                path: dirent.path().to_path_buf(),
                is_dir: meta.is_dir(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            };

            match visit(&entry)? {
                WalkFlow::Continue => {}
                WalkFlow::SkipDir => {
                    if entry.is_dir {
                        iter.skip_current_dir();
                    }
                }
                WalkFlow::SkipAll => return Ok(()),
            }
        }
        Ok(())
    }

    fn watch(&self, path: &Path) -> Result<Subscription, StorageError> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }

        // Capacity 1 + try_send coalesces bursts into a single signal.
        let (changes_tx, changes_rx) = bounded::<()>(1);
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let root = path.to_path_buf();
        let interval = self.poll_interval;
        thread::spawn(move || {
            let mut seen = snapshot(&root);
            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                    Err(RecvTimeoutError::Timeout) => {}
                }
                let current = snapshot(&root);
                if current != seen {
                    tracing::debug!(root = %root.display(), "change detected");
                    seen = current;
                    let _ = changes_tx.try_send(());
                }
            }
        });

        Ok(Subscription::new(changes_rx, stop_tx))
    }
}

/// Modification-time snapshot of every file under `root`. Walk errors leave
/// entries out of the snapshot, which reads as a change on recovery.
fn snapshot(root: &Path) -> HashMap<PathBuf, SystemTime> {
    let mut state = HashMap::new();
    for dirent in WalkDir::new(root).follow_links(false).into_iter().flatten() {
        if !dirent.file_type().is_file() {
            continue;
        }
        if let Ok(meta) = dirent.metadata() {
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            state.insert(dirent.path().to_path_buf(), modified);
        }
    }
    state
}
