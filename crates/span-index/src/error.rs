//! Error types for index maintenance.

use thiserror::Error;

/// Errors that can occur while registering annotations in a document index.
///
/// Lookups never fail: unknown types, absent offsets and redundant removals
/// all have well-defined empty or `false` answers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The annotation ends before it begins.
    #[error("invalid span: begin {begin} is after end {end}")]
    InvalidSpan {
        /// Begin offset of the rejected annotation.
        begin: usize,
        /// End offset of the rejected annotation.
        end: usize,
    },
}

/// Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;
