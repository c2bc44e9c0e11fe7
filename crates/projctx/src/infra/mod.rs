//! Infrastructure adapters: configuration, manifests, and logging.

pub mod config;
pub mod logging;
pub mod manifest;
