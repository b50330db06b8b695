//! # span-hierarchy
//!
//! Annotation type hierarchies for span indexing.
//!
//! This crate provides the type side of the span index:
//! - **[`TypeId`]**: a stable, interned identifier for an annotation type
//! - **[`TypeHierarchy`]**: the collaborator trait the index consumes
//!   (`parent_of`, `properly_subsumed_types`)
//! - **[`TypeTree`]**: a concrete single-inheritance tree with name interning
//! - **[`HierarchyTraverser`]**: ancestor/descendant walks over any hierarchy
//! - **[`SubsumptionClosure`]**: precomputed ancestor/descendant sets
//! - **[`CachedHierarchy`]**: LRU cache in front of descendant lookups
//!
//! ## Usage
//!
//! ```rust
//! use span_hierarchy::{HierarchyTraverser, TypeHierarchy, TypeTree};
//!
//! let mut builder = TypeTree::builder("Annotation");
//! let token = builder.declare("Token", "Annotation").unwrap();
//! let word = builder.declare("Word", "Token").unwrap();
//! let tree = builder.build();
//!
//! assert_eq!(tree.parent_of(word), Some(token));
//! assert_eq!(tree.properly_subsumed_types(token), vec![word]);
//!
//! let traverser = HierarchyTraverser::new(&tree);
//! assert!(traverser.subsumes(tree.root(), word));
//! ```
//!
//! ## Subsumption
//!
//! | Query | Meaning |
//! |-------|---------|
//! | `parent_of(t)` | Direct parent, `None` at the root |
//! | `properly_subsumed_types(t)` | All strict descendants of `t` |
//! | `subsumes(t, s)` | `s` is `t` or a descendant of `t` |
//!
//! Unknown type ids are never an error: they have no parent and no
//! descendants.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
pub mod closure;
mod error;
mod traits;
mod traverser;
mod tree;

pub use cache::{CacheConfig, CacheStats, CachedHierarchy};
pub use closure::{ClosureStats, SubsumptionClosure};
pub use error::{HierarchyError, HierarchyResult};
pub use traits::TypeHierarchy;
pub use traverser::{Ancestors, HierarchyTraverser};
pub use tree::{TypeTree, TypeTreeBuilder};

use std::fmt;

/// Interned identifier of an annotation type.
///
/// Ids are assigned by the hierarchy that owns the type and stay stable for
/// the lifetime of that hierarchy, so they are safe to use as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a type id from its raw index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index of this id.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
