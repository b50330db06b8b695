//! Error types for hierarchy construction.

use thiserror::Error;

/// Errors that can occur while building a type hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// A type with this name was already declared.
    #[error("type already declared: {0}")]
    DuplicateType(String),

    /// The declared parent type does not exist.
    #[error("unknown parent type {parent} for {name}")]
    UnknownParent {
        /// Name of the type being declared.
        name: String,
        /// Name of the missing parent.
        parent: String,
    },

    /// A type name could not be resolved.
    #[error("unknown type: {0}")]
    UnknownType(String),
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = std::result::Result<T, HierarchyError>;
