//! Storage capability contract the indexing engine depends on.
//!
//! The engine never assumes a particular transport; anything that can read,
//! write, list, recursively walk, and watch a document tree can back a
//! vault. The crate ships [`LocalStore`] for plain directories; remote
//! backends (e.g. WebDAV) implement the same trait elsewhere.

mod local;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

pub use local::LocalStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk failed under {root}: {message}")]
    Walk { root: PathBuf, message: String },

    #[error("operation cancelled")]
    Cancelled,
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::Io { path: path.to_path_buf(), source }
        }
    }
}

/// One entry reported by [`Accessor::list`] or [`Accessor::walk`].
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub modified: SystemTime,
}

/// Visitor verdict for one walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFlow {
    Continue,
    /// Prune the directory the entry names.
    SkipDir,
    /// Abort the remainder of the walk without error.
    SkipAll,
}

/// A change subscription for a vault subtree.
///
/// Signals carry no payload and implementations may coalesce bursts into a
/// single signal; consumers re-walk to discover what changed. A missed
/// signal is therefore safe, only less incremental.
#[derive(Debug)]
pub struct Subscription {
    changes: Receiver<()>,
    // Watcher threads exit when this side disconnects.
    _stop: Sender<()>,
}

impl Subscription {
    pub(crate) fn new(changes: Receiver<()>, stop: Sender<()>) -> Self {
        Subscription { changes, _stop: stop }
    }

    /// The channel change signals arrive on.
    pub fn changes(&self) -> &Receiver<()> {
        &self.changes
    }

    /// Stop watching. Dropping the subscription has the same effect.
    pub fn stop(self) {}
}

/// Capability set any vault backend must satisfy.
pub trait Accessor: Send + Sync {
    /// Read a document in full. Distinguishes `NotFound` from other I/O
    /// failures so callers can implement missing-file tolerance.
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Write a document, replacing any previous content and creating missing
    /// parent directories.
    fn write(&self, path: &Path, content: &[u8]) -> Result<(), StorageError>;

    /// List the immediate children of a directory.
    fn list(&self, path: &Path) -> Result<Vec<Entry>, StorageError>;

    /// Depth-first recursive traversal rooted at `root`. The visitor decides
    /// per entry whether to continue, prune a directory, or abort; an error
    /// returned by the visitor aborts the walk and propagates.
    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Entry) -> Result<WalkFlow, StorageError>,
    ) -> Result<(), StorageError>;

    /// Subscribe to change signals for the subtree rooted at `path`.
    fn watch(&self, path: &Path) -> Result<Subscription, StorageError>;
}
