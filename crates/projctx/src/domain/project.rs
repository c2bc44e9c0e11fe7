//! In-memory project hierarchy backing the browser.
//!
//! Nodes live in an arena behind a shared lock; handles carry the arena and
//! a node index, so parent links resolve lazily against the latest state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::domain::errors::ProjectError;
use crate::domain::model::{File, FileRef, Folder, FolderRef, ProjectData, ProjectDataRef};

/// Handle to one open project. Cloning shares the underlying hierarchy.
#[derive(Debug, Clone)]
pub struct Project {
    inner: Arc<ProjectInner>,
}

#[derive(Debug)]
struct ProjectInner {
    name: String,
    writable: AtomicBool,
    nodes: RwLock<Nodes>,
}

#[derive(Debug)]
struct Nodes {
    // Index 0 is always the root folder.
    folders: Vec<FolderEntry>,
    files: Vec<FileEntry>,
}

#[derive(Debug)]
struct FolderEntry {
    name: String,
    parent: Option<usize>,
}

#[derive(Debug)]
struct FileEntry {
    name: String,
    parent: usize,
}

impl Project {
    /// Open an empty project containing only a root folder.
    pub fn new(name: impl Into<String>, writable: bool) -> Self {
        let name = name.into();
        let root = FolderEntry {
            name: name.clone(),
            parent: None,
        };
        Self {
            inner: Arc::new(ProjectInner {
                name,
                writable: AtomicBool::new(writable),
                nodes: RwLock::new(Nodes {
                    folders: vec![root],
                    files: Vec::new(),
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_writable(&self) -> bool {
        self.inner.writable.load(Ordering::SeqCst)
    }

    /// Flip the project between writable and read-only views.
    pub fn set_writable(&self, writable: bool) {
        self.inner.writable.store(writable, Ordering::SeqCst);
    }

    /// Root folder handle. Its parent link is always absent.
    pub fn root(&self) -> FolderRef {
        Arc::new(ProjectFolder {
            inner: self.inner.clone(),
            index: 0,
        })
    }

    /// Shared project-data reference suitable for embedding in a context.
    pub fn as_data(&self) -> ProjectDataRef {
        Arc::new(self.clone())
    }

    /// Create a folder under `parent_path` (empty string for the root).
    pub fn add_folder(&self, parent_path: &str, name: &str) -> Result<FolderRef, ProjectError> {
        validate_name(name)?;
        let mut nodes = self.inner.nodes.write();
        let parent = nodes
            .find_folder(parent_path)
            .ok_or_else(|| ProjectError::UnknownFolder(parent_path.to_string()))?;
        if nodes.has_child_named(parent, name) {
            return Err(ProjectError::DuplicateEntry {
                parent: nodes.folder_path(parent),
                name: name.to_string(),
            });
        }
        nodes.folders.push(FolderEntry {
            name: name.to_string(),
            parent: Some(parent),
        });
        let index = nodes.folders.len() - 1;
        Ok(Arc::new(ProjectFolder {
            inner: self.inner.clone(),
            index,
        }))
    }

    /// Create a file under `parent_path` (empty string for the root).
    pub fn add_file(&self, parent_path: &str, name: &str) -> Result<FileRef, ProjectError> {
        validate_name(name)?;
        let mut nodes = self.inner.nodes.write();
        let parent = nodes
            .find_folder(parent_path)
            .ok_or_else(|| ProjectError::UnknownFolder(parent_path.to_string()))?;
        if nodes.has_child_named(parent, name) {
            return Err(ProjectError::DuplicateEntry {
                parent: nodes.folder_path(parent),
                name: name.to_string(),
            });
        }
        nodes.files.push(FileEntry {
            name: name.to_string(),
            parent,
        });
        let index = nodes.files.len() - 1;
        Ok(Arc::new(ProjectFile {
            inner: self.inner.clone(),
            index,
        }))
    }

    /// Resolve a folder by project-relative path. Empty path is the root.
    pub fn folder_at(&self, path: &str) -> Option<FolderRef> {
        let index = self.inner.nodes.read().find_folder(path)?;
        Some(Arc::new(ProjectFolder {
            inner: self.inner.clone(),
            index,
        }))
    }

    /// Resolve a file by project-relative path.
    pub fn file_at(&self, path: &str) -> Option<FileRef> {
        let index = self.inner.nodes.read().find_file(path)?;
        Some(Arc::new(ProjectFile {
            inner: self.inner.clone(),
            index,
        }))
    }

    /// Child folders of the folder at `path`, in creation order.
    pub fn child_folders(&self, path: &str) -> Vec<FolderRef> {
        let nodes = self.inner.nodes.read();
        let Some(parent) = nodes.find_folder(path) else {
            return Vec::new();
        };
        nodes
            .folders
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.parent == Some(parent))
            .map(|(index, _)| {
                Arc::new(ProjectFolder {
                    inner: self.inner.clone(),
                    index,
                }) as FolderRef
            })
            .collect()
    }

    /// Child files of the folder at `path`, in creation order.
    pub fn child_files(&self, path: &str) -> Vec<FileRef> {
        let nodes = self.inner.nodes.read();
        let Some(parent) = nodes.find_folder(path) else {
            return Vec::new();
        };
        nodes
            .files
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.parent == parent)
            .map(|(index, _)| {
                Arc::new(ProjectFile {
                    inner: self.inner.clone(),
                    index,
                }) as FileRef
            })
            .collect()
    }

    /// Total number of folders, the root included.
    pub fn folder_count(&self) -> usize {
        self.inner.nodes.read().folders.len()
    }

    /// Total number of files.
    pub fn file_count(&self) -> usize {
        self.inner.nodes.read().files.len()
    }
}

impl ProjectData for Project {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn root_folder(&self) -> FolderRef {
        self.root()
    }
}

fn validate_name(name: &str) -> Result<(), ProjectError> {
    if name.is_empty() || name.contains('/') {
        return Err(ProjectError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl Nodes {
    fn folder_path(&self, index: usize) -> String {
        let mut segments = Vec::new();
        let mut current = index;
        while let Some(parent) = self.folders[current].parent {
            segments.push(self.folders[current].name.as_str());
            current = parent;
        }
        segments.reverse();
        segments.join("/")
    }

    fn file_path(&self, index: usize) -> String {
        let entry = &self.files[index];
        let parent = self.folder_path(entry.parent);
        if parent.is_empty() {
            entry.name.clone()
        } else {
            format!("{parent}/{}", entry.name)
        }
    }

    fn find_folder(&self, path: &str) -> Option<usize> {
        let mut current = 0usize;
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current = self
                .folders
                .iter()
                .position(|entry| entry.parent == Some(current) && entry.name == segment)?;
        }
        Some(current)
    }

    fn find_file(&self, path: &str) -> Option<usize> {
        let (parent_path, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };
        let parent = self.find_folder(parent_path)?;
        self.files
            .iter()
            .position(|entry| entry.parent == parent && entry.name == name)
    }

    fn has_child_named(&self, parent: usize, name: &str) -> bool {
        let folder_clash = self
            .folders
            .iter()
            .any(|entry| entry.parent == Some(parent) && entry.name == name);
        let file_clash = self
            .files
            .iter()
            .any(|entry| entry.parent == parent && entry.name == name);
        folder_clash || file_clash
    }
}

#[derive(Debug, Clone)]
struct ProjectFolder {
    inner: Arc<ProjectInner>,
    index: usize,
}

impl Folder for ProjectFolder {
    fn path(&self) -> String {
        self.inner.nodes.read().folder_path(self.index)
    }

    fn name(&self) -> String {
        self.inner.nodes.read().folders[self.index].name.clone()
    }

    fn parent(&self) -> Option<FolderRef> {
        let parent = self.inner.nodes.read().folders[self.index].parent?;
        Some(Arc::new(ProjectFolder {
            inner: self.inner.clone(),
            index: parent,
        }))
    }

    fn is_in_writable_project(&self) -> bool {
        self.inner.writable.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct ProjectFile {
    inner: Arc<ProjectInner>,
    index: usize,
}

impl File for ProjectFile {
    fn path(&self) -> String {
        self.inner.nodes.read().file_path(self.index)
    }

    fn name(&self) -> String {
        self.inner.nodes.read().files[self.index].name.clone()
    }

    fn parent(&self) -> Option<FolderRef> {
        let parent = self.inner.nodes.read().files[self.index].parent;
        Some(Arc::new(ProjectFolder {
            inner: self.inner.clone(),
            index: parent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let project = Project::new("demo", true);
        project.add_folder("", "src").unwrap();
        project.add_folder("src", "core").unwrap();
        project.add_file("src", "main.c").unwrap();
        project.add_file("", "README.md").unwrap();
        project
    }

    #[test]
    fn root_has_no_parent() {
        let project = sample_project();
        let root = project.root();
        assert!(root.parent().is_none());
        assert_eq!(root.path(), "");
        assert_eq!(root.name(), "demo");
    }

    #[test]
    fn paths_follow_parent_links() {
        let project = sample_project();
        let core = project.folder_at("src/core").expect("core exists");
        assert_eq!(core.path(), "src/core");
        assert_eq!(core.name(), "core");

        let parent = core.parent().expect("src exists");
        assert_eq!(parent.path(), "src");
        let grandparent = parent.parent().expect("root exists");
        assert!(grandparent.parent().is_none());
    }

    #[test]
    fn files_resolve_by_path() {
        let project = sample_project();
        let main = project.file_at("src/main.c").expect("main.c exists");
        assert_eq!(main.name(), "main.c");
        assert_eq!(main.parent().unwrap().path(), "src");

        let readme = project.file_at("README.md").expect("README exists");
        assert_eq!(readme.parent().unwrap().path(), "");
    }

    #[test]
    fn duplicate_names_are_rejected_across_kinds() {
        let project = sample_project();
        let err = project.add_folder("src", "core").unwrap_err();
        assert!(matches!(err, ProjectError::DuplicateEntry { .. }));
        let err = project.add_folder("", "README.md").unwrap_err();
        assert!(matches!(err, ProjectError::DuplicateEntry { .. }));
    }

    #[test]
    fn unknown_parent_is_reported() {
        let project = sample_project();
        let err = project.add_file("missing", "x").unwrap_err();
        assert_eq!(err, ProjectError::UnknownFolder("missing".to_string()));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let project = sample_project();
        assert!(matches!(
            project.add_folder("", "a/b").unwrap_err(),
            ProjectError::InvalidName(_)
        ));
        assert!(matches!(
            project.add_file("", "").unwrap_err(),
            ProjectError::InvalidName(_)
        ));
    }

    #[test]
    fn writability_is_shared_across_handles() {
        let project = sample_project();
        let src = project.folder_at("src").unwrap();
        assert!(src.is_in_writable_project());

        project.set_writable(false);
        assert!(!src.is_in_writable_project());
        assert!(!project.root().is_in_writable_project());
    }

    #[test]
    fn children_keep_creation_order() {
        let project = Project::new("demo", true);
        project.add_folder("", "b").unwrap();
        project.add_folder("", "a").unwrap();
        project.add_file("", "z.txt").unwrap();
        project.add_file("", "a.txt").unwrap();

        let folders: Vec<String> = project
            .child_folders("")
            .iter()
            .map(|folder| folder.name())
            .collect();
        assert_eq!(folders, vec!["b", "a"]);

        let files: Vec<String> = project
            .child_files("")
            .iter()
            .map(|file| file.name())
            .collect();
        assert_eq!(files, vec!["z.txt", "a.txt"]);
    }
}
