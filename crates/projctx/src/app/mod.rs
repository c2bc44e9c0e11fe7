//! Application layer: contexts, selection tracking, and action enablement.

pub mod actions;
pub mod context;
pub mod selection;
