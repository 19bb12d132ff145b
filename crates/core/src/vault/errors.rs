//! Vault and mutation error types.

use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum VaultError {
    /// The index has no owner for this task hash.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// The index knew the task but its owning note no longer contains a
    /// matching line (stale index). Never auto-healed; callers decide
    /// whether to refresh.
    #[error("cannot remove task: {0}")]
    CannotRemove(String),

    /// Same stale-index condition, hit while completing a task.
    #[error("task line not found in note: {0}")]
    TaskLineMissing(String),

    #[error("note '{0}' already exists")]
    NoteExists(String),

    /// The vault is stopping; walks and submissions abort.
    #[error("vault stopped")]
    Cancelled,

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for VaultError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Cancelled => VaultError::Cancelled,
            other => VaultError::Storage(other),
        }
    }
}

/// Which mutation a pipeline job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    AddNote,
    AddTask,
    Snooze,
    Remove,
    Done,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MutationKind::AddNote => "add note",
            MutationKind::AddTask => "add task",
            MutationKind::Snooze => "snooze task",
            MutationKind::Remove => "remove task",
            MutationKind::Done => "done task",
        };
        f.write_str(label)
    }
}

/// A failed mutation, tagged with its kind and a human-readable item label
/// (note title or task text) for diagnostics.
#[derive(Debug, Error)]
#[error("{kind} '{item}' failed: {source}")]
pub struct MutationError {
    pub kind: MutationKind,
    pub item: String,
    #[source]
    pub source: VaultError,
}
