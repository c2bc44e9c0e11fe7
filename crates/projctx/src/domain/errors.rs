//! Domain-specific errors.

use thiserror::Error;

/// Errors raised while building or mutating an in-memory project hierarchy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("no folder at '{0}'")]
    UnknownFolder(String),
    #[error("'{name}' already exists under '{parent}'")]
    DuplicateEntry { parent: String, name: String },
    #[error("entry name '{0}' is empty or contains a path separator")]
    InvalidName(String),
}
