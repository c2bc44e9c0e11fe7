//! Collection of reusable TUI components.

pub mod action_panel;
pub mod project_tree;
