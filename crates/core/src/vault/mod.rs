//! The vault engine: live task index plus the serialized mutation pipeline.

mod errors;
mod index;
mod pipeline;
mod updater;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{
    Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::thread::{self, JoinHandle};

use chrono::Local;
use crossbeam_channel::{Receiver, Sender, bounded, select};

use crate::config::VaultConfig;
use crate::storage::{Accessor, StorageError};
use crate::task::{Recurrence, Task};

pub use errors::{MutationError, MutationKind, VaultError};
pub use pipeline::ErrorHandler;

use index::Index;
use pipeline::{Pipeline, QueuedJob};

/// One logical vault: an accessor-backed document tree, the in-memory task
/// index over it, and the workers that keep both consistent.
///
/// Cheap to share behind an [`Arc`]; [`Vault::start_watching`] requires it.
pub struct Vault {
    store: Arc<dyn Accessor>,
    config: VaultConfig,
    index: RwLock<Index>,
    cancel: AtomicBool,
    pipeline: Option<Pipeline>,
    stop_rx: Receiver<()>,
    stop_tx: Mutex<Option<Sender<()>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Vault {
    /// Construct a vault. Asynchronous-mutation failures go to `tracing` only;
    /// use [`Vault::with_error_handler`] to receive them.
    pub fn new(store: Arc<dyn Accessor>, config: VaultConfig) -> Self {
        Self::with_error_handler(store, config, Arc::new(|_err| {}))
    }

    /// Construct a vault with an injected handler for failures of
    /// asynchronously submitted mutations. When `config.async_mutations` is
    /// set, a pipeline worker is spawned immediately.
    pub fn with_error_handler(
        store: Arc<dyn Accessor>,
        config: VaultConfig,
        error_handler: ErrorHandler,
    ) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let pipeline = config
            .async_mutations
            .then(|| Pipeline::start(stop_rx.clone(), error_handler));

        Vault {
            store,
            config,
            index: RwLock::new(Index::default()),
            cancel: AtomicBool::new(false),
            pipeline,
            stop_rx,
            stop_tx: Mutex::new(Some(stop_tx)),
            listener: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Snapshot of the currently indexed tasks. Returns clones; the index is
    /// never exposed by reference.
    pub fn get_tasks(&self) -> Vec<Task> {
        self.read_index().tasks.values().cloned().collect()
    }

    /// Subscribe to store change signals and apply an incremental update per
    /// signal, until the vault is stopped.
    pub fn start_watching(self: &Arc<Self>) -> Result<(), VaultError> {
        let subscription = self.store.watch(&self.config.base_dir)?;
        let vault = Arc::clone(self);
        let stop_rx = self.stop_rx.clone();

        let handle = thread::spawn(move || {
            loop {
                select! {
                    recv(subscription.changes()) -> msg => {
                        if msg.is_err() {
                            return;
                        }
                        vault.handle_updates();
                    }
                    recv(stop_rx) -> _ => return,
                }
            }
        });
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Stop the vault: abort in-flight walks at their next check, stop the
    /// change listener, and shut the pipeline worker down. Queued jobs are
    /// abandoned, not drained.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        // Disconnecting the stop channel wakes the worker and the listener.
        drop(self.stop_tx.lock().unwrap_or_else(PoisonError::into_inner).take());

        let listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = listener {
            let _ = handle.join();
        }
        if let Some(pipeline) = &self.pipeline {
            pipeline.join();
        }
    }

    /// Create a new note under the notes directory; fails if a note with the
    /// escaped title already exists.
    pub fn add_note(&self, title: &str, content: &str) -> Result<(), MutationError> {
        let path = self.config.notes_path().join(escape_title(title) + ".md");
        let store = Arc::clone(&self.store);
        let title_owned = title.to_string();
        let content = content.to_string();

        self.modify(MutationKind::AddNote, title, move || match store.read(&path) {
            Ok(_) => Err(VaultError::NoteExists(title_owned)),
            Err(StorageError::NotFound(_)) => Ok(store.write(&path, content.as_bytes())?),
            Err(e) => Err(e.into()),
        })
    }

    /// Append a serialized task line to the well-known tasks file. A missing
    /// file is treated as empty content, not an error.
    pub fn add_task(&self, task: &Task) -> Result<(), MutationError> {
        let path = self.config.tasks_file_path();
        let store = Arc::clone(&self.store);
        let line = task.to_string();

        self.modify(MutationKind::AddTask, &task.text, move || {
            let existing = match store.read(&path) {
                Ok(data) => data,
                Err(StorageError::NotFound(_)) => Vec::new(),
                Err(e) => return Err(e.into()),
            };
            let mut content =
                String::from_utf8_lossy(&existing).trim_end_matches('\n').to_string();
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(&line);
            content.push('\n');
            Ok(store.write(&path, content.as_bytes())?)
        })
    }

    /// Mark a task done, stamping today's done date. A recurring task
    /// additionally gets a fresh open line inserted right after the completed
    /// one, due at the next recurrence date.
    pub fn done_task(&self, id: &str) -> Result<(), MutationError> {
        let kind = MutationKind::Done;
        // Patch the index up front: old hash out, new hash(es) in, all under
        // one write-lock critical section so readers never see a half-updated
        // state. The pipeline job then rewrites the document itself.
        let (path, task) = {
            let mut idx = self.write_index();
            let (path, task) = idx
                .remove_task(id)
                .ok_or_else(|| task_not_found(kind, id))?;
            let mut completed = task.clone();
            completed.done = true;
            completed.done_date = Some(Local::now().date_naive());
            if idx.selector.selects(&completed) {
                idx.insert_task(path.clone(), completed);
            }
            if task.recurrence != Recurrence::None {
                if let Some(next) = task.next_due_date() {
                    // Same fields the rewrite below produces, so the patched
                    // hash matches the line on disk.
                    let mut repeat = task.clone();
                    repeat.done = false;
                    repeat.done_date = None;
                    repeat.due_date = Some(next);
                    if idx.selector.selects(&repeat) {
                        idx.insert_task(path.clone(), repeat);
                    }
                }
            }
            (path, task)
        };

        let store = Arc::clone(&self.store);
        let id_owned = id.to_string();
        self.modify(kind, &task.text, move || {
            let mut lines = load_note(store.as_ref(), &path)?;
            let (i, original) = find_task_line(&lines, &id_owned)
                .ok_or(VaultError::TaskLineMissing(id_owned))?;

            let mut completed = original.clone();
            completed.done = true;
            completed.done_date = Some(Local::now().date_naive());
            lines[i] = completed.to_string();

            if original.recurrence != Recurrence::None {
                if let Some(next) = original.next_due_date() {
                    let mut repeat = original;
                    repeat.done = false;
                    repeat.done_date = None;
                    repeat.due_date = Some(next);
                    lines.insert(i + 1, repeat.to_string());
                }
            }
            save_note(store.as_ref(), &path, &lines)
        })
    }

    /// Move a task's due date, leaving every other field alone.
    pub fn snooze_task(
        &self,
        id: &str,
        date: chrono::NaiveDate,
    ) -> Result<(), MutationError> {
        let kind = MutationKind::Snooze;
        let (path, task) = {
            let mut idx = self.write_index();
            let (path, task) = idx
                .remove_task(id)
                .ok_or_else(|| task_not_found(kind, id))?;
            let mut snoozed = task.clone();
            snoozed.due_date = Some(date);
            if idx.selector.selects(&snoozed) {
                idx.insert_task(path.clone(), snoozed);
            }
            (path, task)
        };

        let store = Arc::clone(&self.store);
        let id_owned = id.to_string();
        self.modify(kind, &task.text, move || {
            let mut lines = load_note(store.as_ref(), &path)?;
            if let Some((i, mut found)) = find_task_line(&lines, &id_owned) {
                found.due_date = Some(date);
                lines[i] = found.to_string();
            }
            save_note(store.as_ref(), &path, &lines)
        })
    }

    /// Delete a task's line outright. Errors with `CannotRemove` when the
    /// index knew the task but the note no longer contains a matching line.
    pub fn remove_task(&self, id: &str) -> Result<(), MutationError> {
        let kind = MutationKind::Remove;
        let (path, task) = self
            .write_index()
            .remove_task(id)
            .ok_or_else(|| task_not_found(kind, id))?;

        let store = Arc::clone(&self.store);
        let id_owned = id.to_string();
        self.modify(kind, &task.text, move || {
            let mut lines = load_note(store.as_ref(), &path)?;
            let (i, _) = find_task_line(&lines, &id_owned)
                .ok_or(VaultError::CannotRemove(id_owned))?;
            lines.remove(i);
            save_note(store.as_ref(), &path, &lines)
        })
    }

    /// Run a mutation job: inline in synchronous mode, through the pipeline
    /// otherwise. Enqueueing blocks while the queue is at capacity.
    fn modify(
        &self,
        kind: MutationKind,
        item: &str,
        job: impl FnOnce() -> Result<(), VaultError> + Send + 'static,
    ) -> Result<(), MutationError> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(MutationError {
                kind,
                item: item.to_string(),
                source: VaultError::Cancelled,
            });
        }
        match &self.pipeline {
            Some(pipeline) => pipeline
                .submit(QueuedJob { kind, item: item.to_string(), run: Box::new(job) })
                .map_err(|source| MutationError { kind, item: item.to_string(), source }),
            None => job().map_err(|source| MutationError {
                kind,
                item: item.to_string(),
                source,
            }),
        }
    }

    fn read_index(&self) -> RwLockReadGuard<'_, Index> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, Index> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn task_not_found(kind: MutationKind, id: &str) -> MutationError {
    MutationError {
        kind,
        item: id.to_string(),
        source: VaultError::TaskNotFound(id.to_string()),
    }
}

/// Note titles may contain characters that are markup or path hazards;
/// flatten them to spaces before building a file name.
fn escape_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '#' | '^' | '[' | ']' | '|' => ' ',
            other => other,
        })
        .collect()
}

fn load_note(store: &dyn Accessor, path: &Path) -> Result<Vec<String>, VaultError> {
    let data = store.read(path)?;
    Ok(String::from_utf8_lossy(&data).lines().map(str::to_string).collect())
}

fn save_note(store: &dyn Accessor, path: &Path, lines: &[String]) -> Result<(), VaultError> {
    let mut content = lines.join("\n");
    content.push('\n');
    Ok(store.write(path, content.as_bytes())?)
}

/// Scan lines, reparsing each, until one's computed hash matches.
fn find_task_line(lines: &[String], hash: &str) -> Option<(usize, Task)> {
    lines.iter().enumerate().find_map(|(i, line)| {
        let task = Task::parse(line)?;
        (task.hash() == hash).then_some((i, task))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_escaping_flattens_markup_characters() {
        assert_eq!(escape_title("a#b^c[d]e|f"), "a b c d e f");
        assert_eq!(escape_title("plain title"), "plain title");
    }

    #[test]
    fn find_task_line_matches_by_hash() {
        let wanted = Task::new("find me");
        let lines = vec![
            "# heading".to_string(),
            "- [ ] other".to_string(),
            wanted.to_string(),
        ];
        let (i, found) = find_task_line(&lines, &wanted.hash()).unwrap();
        assert_eq!(i, 2);
        assert_eq!(found, wanted);
        assert!(find_task_line(&lines, "no such hash").is_none());
    }
}
