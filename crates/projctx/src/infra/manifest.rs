//! Project manifests describing a hierarchy in TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::project::Project;

/// Serializable description of a project: name, writability, and the
/// folder/file paths it contains. Parent folders may be listed explicitly or
/// left implied by deeper paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub name: String,
    #[serde(default = "default_writable")]
    pub writable: bool,
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

fn default_writable() -> bool {
    true
}

impl ProjectManifest {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid project manifest")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize project manifest")
    }

    /// Materialize the manifest into an in-memory project.
    pub fn build(&self) -> Result<Project> {
        let project = Project::new(&self.name, self.writable);
        for path in &self.folders {
            ensure_folder(&project, path)
                .with_context(|| format!("failed to create folder '{path}'"))?;
        }
        for path in &self.files {
            let (parent, name) = split_path(path);
            ensure_folder(&project, parent)
                .with_context(|| format!("failed to create parent of '{path}'"))?;
            project
                .add_file(parent, name)
                .with_context(|| format!("failed to create file '{path}'"))?;
        }
        Ok(project)
    }
}

/// Load and materialize a manifest from disk.
pub fn load_project(path: &Path) -> Result<Project> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest at {}", path.display()))?;
    let manifest = ProjectManifest::from_toml(&text)
        .with_context(|| format!("failed to parse manifest at {}", path.display()))?;
    manifest.build()
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

fn ensure_folder(project: &Project, path: &str) -> Result<()> {
    let mut current = String::new();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        let next = if current.is_empty() {
            segment.to_string()
        } else {
            format!("{current}/{segment}")
        };
        if project.folder_at(&next).is_none() {
            project.add_folder(&current, segment)?;
        }
        current = next;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        name = "demo"
        writable = true
        folders = ["src", "src/core", "docs"]
        files = ["README.md", "src/main.c", "src/core/api.h"]
    "#;

    #[test]
    fn builds_the_described_hierarchy() {
        let manifest = ProjectManifest::from_toml(SAMPLE).unwrap();
        let project = manifest.build().unwrap();

        assert_eq!(project.name(), "demo");
        assert!(project.is_writable());
        assert!(project.folder_at("src/core").is_some());
        assert!(project.file_at("src/core/api.h").is_some());
        assert!(project.file_at("README.md").is_some());
    }

    #[test]
    fn missing_parents_are_created_implicitly() {
        let manifest = ProjectManifest::from_toml(
            r#"
            name = "implied"
            files = ["a/b/c.txt"]
            "#,
        )
        .unwrap();
        let project = manifest.build().unwrap();
        assert!(project.folder_at("a/b").is_some());
        assert!(project.file_at("a/b/c.txt").is_some());
    }

    #[test]
    fn writable_defaults_to_true() {
        let manifest = ProjectManifest::from_toml(r#"name = "bare""#).unwrap();
        assert!(manifest.writable);
        assert!(manifest.folders.is_empty());
    }

    #[test]
    fn read_only_flag_round_trips() {
        let manifest = ProjectManifest {
            name: "frozen".to_string(),
            writable: false,
            folders: vec!["src".to_string()],
            files: vec![],
        };
        let text = manifest.to_toml().unwrap();
        let parsed = ProjectManifest::from_toml(&text).unwrap();
        assert_eq!(parsed, manifest);
        assert!(!parsed.build().unwrap().is_writable());
    }

    #[test]
    fn duplicate_files_are_an_error() {
        let manifest = ProjectManifest::from_toml(
            r#"
            name = "dup"
            files = ["a.txt", "a.txt"]
            "#,
        )
        .unwrap();
        assert!(manifest.build().is_err());
    }
}
