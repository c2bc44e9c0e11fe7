//! Capability traits for the project hierarchy and the shared busy tracker.
//!
//! Action contexts hold non-owning references to folders, files, and project
//! data owned elsewhere in the application. The traits here describe the
//! minimum each collaborator must expose; the concrete in-memory hierarchy
//! lives in [`crate::domain::project`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared non-owning reference to a folder node.
pub type FolderRef = Arc<dyn Folder>;

/// Shared non-owning reference to a file node.
pub type FileRef = Arc<dyn File>;

/// Shared non-owning reference to an open project's data root.
pub type ProjectDataRef = Arc<dyn ProjectData>;

/// A node in the project hierarchy that can contain files and folders.
pub trait Folder: fmt::Debug + Send + Sync {
    /// Project-relative path identifying this folder. Empty for the root.
    fn path(&self) -> String;

    /// Display name of the folder.
    fn name(&self) -> String;

    /// Parent folder, or `None` when this folder is the project root.
    fn parent(&self) -> Option<FolderRef>;

    /// Whether the project owning this folder accepts mutations.
    fn is_in_writable_project(&self) -> bool;
}

/// A leaf node in the project hierarchy.
pub trait File: fmt::Debug + Send + Sync {
    /// Project-relative path identifying this file.
    fn path(&self) -> String;

    /// Display name of the file.
    fn name(&self) -> String;

    /// Folder containing this file.
    fn parent(&self) -> Option<FolderRef>;
}

/// The root of one open workspace.
pub trait ProjectData: fmt::Debug + Send + Sync {
    /// Human-readable project name.
    fn name(&self) -> String;

    /// Root folder of the hierarchy.
    fn root_folder(&self) -> FolderRef;
}

/// Shared flag marking a background operation in flight for a selection.
///
/// Cloning shares the underlying flag: every holder observes the latest
/// write, whether it happens on the UI thread or on the thread driving the
/// operation. Contexts never construct a tracker themselves; they only
/// forward reads and writes to one supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    busy: Arc<AtomicBool>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current busy state.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Publish a new busy state to every holder of this tracker.
    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_defaults_to_idle() {
        let tracker = OperationTracker::new();
        assert!(!tracker.is_busy());
    }

    #[test]
    fn cloned_trackers_share_state() {
        let tracker = OperationTracker::new();
        let other = tracker.clone();

        tracker.set_busy(true);
        assert!(other.is_busy());

        other.set_busy(false);
        assert!(!tracker.is_busy());
    }
}
