//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static WORKSPACE_CONFIG_PATH: &str = ".projctx/config.toml";
static CONFIG_ENV: &str = "PROJCTX_CONFIG";

/// Application configuration, layered field by field: compiled-in
/// defaults, then the user file, then the workspace file, with an
/// explicit `PROJCTX_CONFIG` path applied last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub browser: Browser,
    #[serde(default)]
    pub project: ProjectDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Browser {
    #[serde(default = "Browser::default_expand_depth")]
    pub expand_depth: usize,
    #[serde(default = "Browser::default_show_files")]
    pub show_files: bool,
    #[serde(default = "Browser::default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Browser {
    fn default_expand_depth() -> usize {
        1
    }

    fn default_show_files() -> bool {
        true
    }

    fn default_tick_rate_ms() -> u64 {
        120
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self {
            expand_depth: Self::default_expand_depth(),
            show_files: Self::default_show_files(),
            tick_rate_ms: Self::default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectDefaults {
    /// Manifest opened when none is given on the command line.
    #[serde(default)]
    pub manifest: Option<String>,
    /// Force the project read-only regardless of its manifest.
    #[serde(default)]
    pub read_only: bool,
}

impl Config {
    /// Load configuration from defaults, the user file, the workspace
    /// file, and an explicit `PROJCTX_CONFIG` path in that order.
    pub fn load() -> Result<Self> {
        let explicit = env::var(CONFIG_ENV).ok().map(PathBuf::from);
        Self::load_with_layers(
            user_config_path(),
            Some(PathBuf::from(WORKSPACE_CONFIG_PATH)),
            explicit,
        )
    }

    fn load_with_layers(
        user: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
    ) -> Result<Self> {
        let mut merged: Config =
            toml::from_str(&DEFAULT_CONFIG).context("built-in default config is invalid")?;

        if let Some(path) = user.filter(|path| path.exists()) {
            merged = merged.merge(Self::from_file(&path)?);
        }
        if let Some(path) = workspace.filter(|path| path.exists()) {
            merged = merged.merge(Self::from_file(&path)?);
        }
        // An explicitly requested file must be readable.
        if let Some(path) = explicit {
            merged = merged.merge(Self::from_file(&path)?);
        }
        Ok(merged)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config at {}", path.display()))
    }

    fn merge(self, overlay: Self) -> Self {
        Self {
            browser: merge_browser(self.browser, overlay.browser),
            project: merge_project(self.project, overlay.project),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("projctx").join("config.toml"))
}

fn merge_browser(base: Browser, overlay: Browser) -> Browser {
    Browser {
        expand_depth: if overlay.expand_depth != Browser::default_expand_depth() {
            overlay.expand_depth
        } else {
            base.expand_depth
        },
        show_files: if overlay.show_files != Browser::default_show_files() {
            overlay.show_files
        } else {
            base.show_files
        },
        tick_rate_ms: if overlay.tick_rate_ms != Browser::default_tick_rate_ms() {
            overlay.tick_rate_ms
        } else {
            base.tick_rate_ms
        },
    }
}

fn merge_project(base: ProjectDefaults, overlay: ProjectDefaults) -> ProjectDefaults {
    ProjectDefaults {
        manifest: overlay.manifest.or(base.manifest),
        read_only: overlay.read_only || base.read_only,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults_parse() {
        let config: Config = toml::from_str(&DEFAULT_CONFIG).unwrap();
        assert_eq!(config.browser.expand_depth, 1);
        assert!(config.browser.show_files);
        assert_eq!(config.browser.tick_rate(), Duration::from_millis(120));
        assert!(!config.project.read_only);
        assert!(config.project.manifest.is_none());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [project]
            read_only = true
            "#,
        )
        .unwrap();
        assert!(config.project.read_only);
        assert_eq!(config.browser.expand_depth, 1);
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let config: Config = toml::from_str(
            r#"
            [browser]
            expand_depth = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.browser.expand_depth, 3);
        assert!(config.browser.show_files);
    }

    fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn user_and_workspace_layers_merge_field_by_field() {
        let dir = tempfile::tempdir().unwrap();
        let user = write_config(dir.path(), "user.toml", "[browser]\nexpand_depth = 7\n");
        let workspace = write_config(dir.path(), "workspace.toml", "[project]\nread_only = true\n");

        let config = Config::load_with_layers(Some(user), Some(workspace), None).unwrap();
        assert_eq!(config.browser.expand_depth, 7);
        assert!(config.project.read_only);
        assert!(config.browser.show_files);
    }

    #[test]
    fn later_layers_shadow_earlier_values() {
        let dir = tempfile::tempdir().unwrap();
        let user = write_config(dir.path(), "user.toml", "[browser]\nexpand_depth = 7\n");
        let workspace = write_config(dir.path(), "workspace.toml", "[browser]\nexpand_depth = 2\n");
        let explicit = write_config(dir.path(), "explicit.toml", "[browser]\ntick_rate_ms = 50\n");

        let config =
            Config::load_with_layers(Some(user), Some(workspace), Some(explicit)).unwrap();
        assert_eq!(config.browser.expand_depth, 2);
        assert_eq!(config.browser.tick_rate(), Duration::from_millis(50));
    }

    #[test]
    fn missing_optional_layers_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("nope.toml");

        let config = Config::load_with_layers(Some(absent.clone()), Some(absent), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_config_path_must_be_readable() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("nope.toml");

        let err = Config::load_with_layers(None, None, Some(absent)).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
