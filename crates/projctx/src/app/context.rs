//! Action contexts snapshotting the browser selection.
//!
//! A [`SelectionContext`] is built on the UI thread whenever an action is
//! being considered, consulted by enablement logic, and discarded when the
//! dispatch cycle ends. Every query is total: absent fields degrade to empty
//! slices, zero counts, and `false`, never to an error.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::domain::model::{FileRef, FolderRef, OperationTracker, ProjectDataRef};

/// Identifies a UI surface (pane, dialog, widget) in the browser shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields common to every action context produced by the shell: the owning
/// surface, an opaque payload for contextual lookups, and the visual anchor
/// the action was invoked from.
#[derive(Clone, Default)]
pub struct ActionContext {
    surface: Option<SurfaceId>,
    payload: Option<Arc<dyn Any + Send + Sync>>,
    anchor: Option<SurfaceId>,
}

impl ActionContext {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface: Some(surface),
            payload: None,
            anchor: None,
        }
    }

    pub fn with_payload(mut self, payload: Arc<dyn Any + Send + Sync>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_anchor(mut self, anchor: SurfaceId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn surface(&self) -> Option<&SurfaceId> {
        self.surface.as_ref()
    }

    pub fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.payload.as_deref()
    }

    /// Surface the action was anchored to, e.g. for popup placement.
    pub fn anchor(&self) -> Option<&SurfaceId> {
        self.anchor.as_ref()
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("surface", &self.surface)
            .field("payload", &self.payload.as_ref().map(|_| "<payload>"))
            .field("anchor", &self.anchor)
            .finish()
    }
}

/// Capability consumed by generic enablement logic that only cares about
/// selected files and ambient busy state.
pub trait FileContext {
    fn selected_files(&self) -> &[FileRef];
    fn file_count(&self) -> usize;
    fn is_in_active_project(&self) -> bool;
    fn is_busy(&self) -> bool;
    fn set_busy(&self, busy: bool);
}

/// Snapshot of the user's folder/file selection plus the ambient state
/// action handlers need to decide applicability.
///
/// Treat every field except the transient flag as set once at construction.
/// Selection sequences are stored as given, without copying or validation;
/// callers must not mutate them while the context is live.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    base: ActionContext,
    project: Option<ProjectDataRef>,
    tracker: Option<OperationTracker>,
    folders: Option<Vec<FolderRef>>,
    files: Option<Vec<FileRef>>,
    in_active_project: bool,
    transient: bool,
}

impl SelectionContext {
    /// Snapshot a selection with no busy tracker attached.
    pub fn new(
        base: ActionContext,
        project: Option<ProjectDataRef>,
        folders: Option<Vec<FolderRef>>,
        files: Option<Vec<FileRef>>,
        in_active_project: bool,
    ) -> Self {
        Self {
            base,
            project,
            tracker: None,
            folders,
            files,
            in_active_project,
            transient: false,
        }
    }

    /// Attach a shared busy tracker supplied by the operation-owning caller.
    pub fn with_tracker(mut self, tracker: OperationTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Common action-context fields (owning surface, payload, anchor).
    pub fn base(&self) -> &ActionContext {
        &self.base
    }

    /// Selected folders, oldest selection first. Never absent.
    pub fn selected_folders(&self) -> &[FolderRef] {
        self.folders.as_deref().unwrap_or(&[])
    }

    pub fn folder_count(&self) -> usize {
        self.folders.as_ref().map_or(0, Vec::len)
    }

    /// True when folders and files together hold exactly one entry.
    pub fn has_exactly_one_file_or_folder(&self) -> bool {
        self.folder_count() + self.file_count() == 1
    }

    /// True when anything at all is selected.
    pub fn has_any_selection(&self) -> bool {
        self.folder_count() + self.file_count() > 0
    }

    /// True when any selected folder is itself a root (absent parent link).
    /// A folder sitting directly under the root does not count.
    pub fn contains_root_folder(&self) -> bool {
        self.selected_folders()
            .iter()
            .any(|folder| folder.parent().is_none())
    }

    /// True when project data is present and its root folder belongs to a
    /// non-writable project. Absent project data reads as `false`, not as an
    /// error. Only the ambient root's writability is consulted, never the
    /// selected entries' owners.
    pub fn is_read_only_project(&self) -> bool {
        match &self.project {
            Some(project) => !project.root_folder().is_in_writable_project(),
            None => false,
        }
    }

    pub fn project_data(&self) -> Option<&ProjectDataRef> {
        self.project.as_ref()
    }

    /// Marks a selection originating from a temporary or preview workspace,
    /// so handlers can suppress operations unsafe for temporary data. The one
    /// field that may change after construction.
    pub fn set_transient(&mut self, transient: bool) {
        self.transient = transient;
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

impl FileContext for SelectionContext {
    /// Selected files, oldest selection first. Never absent.
    fn selected_files(&self) -> &[FileRef] {
        self.files.as_deref().unwrap_or(&[])
    }

    fn file_count(&self) -> usize {
        self.files.as_ref().map_or(0, Vec::len)
    }

    /// The active-project flag, verbatim as passed at construction.
    fn is_in_active_project(&self) -> bool {
        self.in_active_project
    }

    /// False whenever no tracker is attached.
    fn is_busy(&self) -> bool {
        match &self.tracker {
            Some(tracker) => tracker.is_busy(),
            None => false,
        }
    }

    /// Forwarded to the shared tracker; a no-op without one.
    fn set_busy(&self, busy: bool) {
        if let Some(tracker) = &self.tracker {
            tracker.set_busy(busy);
        }
    }
}
