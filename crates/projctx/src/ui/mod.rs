//! Terminal UI for browsing a project and inspecting action enablement.

pub mod app;
pub mod components;
