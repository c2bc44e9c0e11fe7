//! Action enablement over selection contexts.
//!
//! Actions never perform work here; they only decide whether they would be
//! applicable for a given snapshot. The registry evaluates every registered
//! action against one context and hands the resulting report to the UI or
//! the CLI.

use serde::Serialize;
use tracing::debug;

use crate::app::context::{FileContext, SelectionContext};

/// A user-triggerable operation gated on the current selection.
pub trait ProjectAction: Send + Sync {
    /// Stable identifier shown in menus and reports.
    fn name(&self) -> &str;

    /// Whether the action would be applicable for this snapshot.
    fn is_enabled(&self, ctx: &SelectionContext) -> bool;
}

/// One row of an enablement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionStatus {
    pub name: String,
    pub enabled: bool,
}

/// Holds the actions the browser offers and evaluates them per context.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Box<dyn ProjectAction>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the standard browser actions.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RenameAction));
        registry.register(Box::new(DeleteAction));
        registry.register(Box::new(ExportAction));
        registry.register(Box::new(NewFolderAction));
        registry.register(Box::new(RefreshAction));
        registry
    }

    pub fn register(&mut self, action: Box<dyn ProjectAction>) {
        self.actions.push(action);
    }

    /// Evaluate every action against one snapshot, in registration order.
    pub fn evaluate(&self, ctx: &SelectionContext) -> Vec<ActionStatus> {
        self.actions
            .iter()
            .map(|action| {
                let enabled = action.is_enabled(ctx);
                debug!(action = action.name(), enabled, "evaluated action");
                ActionStatus {
                    name: action.name().to_string(),
                    enabled,
                }
            })
            .collect()
    }
}

/// Renames a single folder or file in the active, writable project.
struct RenameAction;

impl ProjectAction for RenameAction {
    fn name(&self) -> &str {
        "rename"
    }

    fn is_enabled(&self, ctx: &SelectionContext) -> bool {
        ctx.has_exactly_one_file_or_folder()
            && ctx.is_in_active_project()
            && !ctx.is_read_only_project()
            && !ctx.is_busy()
            && !ctx.is_transient()
    }
}

/// Deletes the selected entries. Root folders can never be deleted.
struct DeleteAction;

impl ProjectAction for DeleteAction {
    fn name(&self) -> &str {
        "delete"
    }

    fn is_enabled(&self, ctx: &SelectionContext) -> bool {
        ctx.has_any_selection()
            && !ctx.contains_root_folder()
            && ctx.is_in_active_project()
            && !ctx.is_read_only_project()
            && !ctx.is_busy()
            && !ctx.is_transient()
    }
}

/// Exports the selected files. Reading is fine even from read-only or
/// transient workspaces.
struct ExportAction;

impl ProjectAction for ExportAction {
    fn name(&self) -> &str {
        "export"
    }

    fn is_enabled(&self, ctx: &SelectionContext) -> bool {
        ctx.file_count() > 0 && !ctx.is_busy()
    }
}

/// Creates a folder inside a single selected folder.
struct NewFolderAction;

impl ProjectAction for NewFolderAction {
    fn name(&self) -> &str {
        "new-folder"
    }

    fn is_enabled(&self, ctx: &SelectionContext) -> bool {
        ctx.folder_count() == 1
            && ctx.file_count() == 0
            && ctx.is_in_active_project()
            && !ctx.is_read_only_project()
            && !ctx.is_busy()
            && !ctx.is_transient()
    }
}

/// Re-reads the hierarchy; only blocked while an operation is in flight.
struct RefreshAction;

impl ProjectAction for RefreshAction {
    fn name(&self) -> &str {
        "refresh"
    }

    fn is_enabled(&self, ctx: &SelectionContext) -> bool {
        !ctx.is_busy()
    }
}
