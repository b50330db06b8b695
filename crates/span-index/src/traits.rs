//! Traits for annotation access.
//!
//! The index never owns annotations. It stores lightweight handles and reads
//! offsets and types through the [`Annotation`] trait, which the host
//! annotation store implements for its handle type.
//!
//! # Example: Implementing Annotation for a host handle
//!
//! ```ignore
//! use span_hierarchy::TypeId;
//! use span_index::Annotation;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! struct FsRef(u32);
//!
//! impl Annotation for FsRef {
//!     fn begin(&self) -> usize {
//!         HOST.begin_of(self.0)
//!     }
//!
//!     fn end(&self) -> usize {
//!         HOST.end_of(self.0)
//!     }
//!
//!     fn type_id(&self) -> TypeId {
//!         HOST.type_of(self.0)
//!     }
//! }
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use span_hierarchy::TypeId;

/// Trait for annotation handles stored in the index.
///
/// Handles are compared and hashed by identity: two handles are the same
/// annotation iff they are equal. Offsets and type must not change while the
/// handle is registered in an index.
pub trait Annotation: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Begin offset of the annotated span (inclusive).
    fn begin(&self) -> usize;

    /// End offset of the annotated span (exclusive).
    fn end(&self) -> usize;

    /// Type of the annotation.
    fn type_id(&self) -> TypeId;

    /// Returns true if both annotations cover exactly the same span.
    ///
    /// Types are not compared.
    fn is_coextensive_with(&self, other: &Self) -> bool {
        self.begin() == other.begin() && self.end() == other.end()
    }
}
