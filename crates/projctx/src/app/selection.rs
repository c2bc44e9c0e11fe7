//! Tracking the browser's selection and snapshotting it into contexts.

use crate::app::context::{ActionContext, SelectionContext};
use crate::domain::model::{FileRef, FolderRef, OperationTracker, ProjectDataRef};

/// Ambient browser state folded into every snapshot.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    pub project: Option<ProjectDataRef>,
    pub tracker: Option<OperationTracker>,
    pub in_active_project: bool,
    pub transient: bool,
}

/// Ordered, duplicate-free lists of selected folder and file handles.
///
/// Entries are keyed by their project-relative path, preserving the order in
/// which the user picked them.
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    folders: Vec<FolderRef>,
    files: Vec<FileRef>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Drop every selected entry.
    pub fn clear(&mut self) {
        self.folders.clear();
        self.files.clear();
    }

    pub fn is_folder_selected(&self, path: &str) -> bool {
        self.folders.iter().any(|folder| folder.path() == path)
    }

    pub fn is_file_selected(&self, path: &str) -> bool {
        self.files.iter().any(|file| file.path() == path)
    }

    /// Add the folder when absent, remove it when present. Returns whether
    /// the folder is selected afterwards.
    pub fn toggle_folder(&mut self, folder: FolderRef) -> bool {
        let path = folder.path();
        let before = self.folders.len();
        self.folders.retain(|existing| existing.path() != path);
        if self.folders.len() == before {
            self.folders.push(folder);
            true
        } else {
            false
        }
    }

    /// Add the file when absent, remove it when present. Returns whether the
    /// file is selected afterwards.
    pub fn toggle_file(&mut self, file: FileRef) -> bool {
        let path = file.path();
        let before = self.files.len();
        self.files.retain(|existing| existing.path() != path);
        if self.files.len() == before {
            self.files.push(file);
            true
        } else {
            false
        }
    }

    /// Snapshot the current selection into a context for one evaluation
    /// cycle. The context receives its own handle lists; mutating the model
    /// afterwards does not affect an already-built snapshot.
    pub fn snapshot(&self, base: ActionContext, ambient: &Ambient) -> SelectionContext {
        let mut ctx = SelectionContext::new(
            base,
            ambient.project.clone(),
            Some(self.folders.clone()),
            Some(self.files.clone()),
            ambient.in_active_project,
        );
        if let Some(tracker) = &ambient.tracker {
            ctx = ctx.with_tracker(tracker.clone());
        }
        if ambient.transient {
            ctx.set_transient(true);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::app::context::{FileContext, SurfaceId};
    use crate::domain::project::Project;

    fn sample_project() -> Project {
        let project = Project::new("demo", true);
        project.add_folder("", "src").unwrap();
        project.add_file("", "README.md").unwrap();
        project.add_file("src", "main.c").unwrap();
        project
    }

    fn base() -> ActionContext {
        ActionContext::new(SurfaceId::new("tree"))
    }

    #[test]
    fn toggling_adds_then_removes() {
        let project = sample_project();
        let mut model = SelectionModel::new();

        assert!(model.toggle_folder(project.folder_at("src").unwrap()));
        assert!(model.is_folder_selected("src"));
        assert_eq!(model.folder_count(), 1);

        assert!(!model.toggle_folder(project.folder_at("src").unwrap()));
        assert!(model.is_empty());
    }

    #[test]
    fn selection_order_is_preserved() {
        let project = sample_project();
        let mut model = SelectionModel::new();
        model.toggle_file(project.file_at("src/main.c").unwrap());
        model.toggle_file(project.file_at("README.md").unwrap());

        let ctx = model.snapshot(base(), &Ambient::default());
        let paths: Vec<String> = ctx.selected_files().iter().map(|file| file.path()).collect();
        assert_eq!(paths, vec!["src/main.c", "README.md"]);
    }

    #[test]
    fn snapshot_carries_ambient_state() {
        let project = sample_project();
        let tracker = OperationTracker::new();
        let mut model = SelectionModel::new();
        model.toggle_file(project.file_at("README.md").unwrap());

        let ambient = Ambient {
            project: Some(project.as_data()),
            tracker: Some(tracker.clone()),
            in_active_project: true,
            transient: true,
        };
        let ctx = model.snapshot(base(), &ambient);

        assert!(ctx.is_in_active_project());
        assert!(ctx.is_transient());
        assert!(!ctx.is_read_only_project());

        tracker.set_busy(true);
        assert!(ctx.is_busy());
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let project = sample_project();
        let mut model = SelectionModel::new();
        model.toggle_file(project.file_at("README.md").unwrap());

        let ctx = model.snapshot(base(), &Ambient::default());
        model.clear();

        assert_eq!(ctx.file_count(), 1);
        assert!(model.is_empty());
    }
}
