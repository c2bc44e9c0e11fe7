//! Domain types: hierarchy capabilities, the in-memory project, and errors.

pub mod errors;
pub mod model;
pub mod project;
