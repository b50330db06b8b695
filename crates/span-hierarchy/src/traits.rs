//! Traits for type hierarchy access.
//!
//! This module defines the [`TypeHierarchy`] trait that the span index
//! consumes. The index never owns or defines types; it only asks the
//! hierarchy for parents (eager propagation) and proper descendants (lazy
//! lookups).
//!
//! # Example: Implementing TypeHierarchy for a host type system
//!
//! ```ignore
//! use span_hierarchy::{TypeHierarchy, TypeId};
//!
//! impl TypeHierarchy for HostTypeSystem {
//!     fn parent_of(&self, type_id: TypeId) -> Option<TypeId> {
//!         self.supertype(type_id)
//!     }
//!
//!     fn properly_subsumed_types(&self, type_id: TypeId) -> Vec<TypeId> {
//!         self.subtypes_transitive(type_id)
//!     }
//!
//!     fn contains_type(&self, type_id: TypeId) -> bool {
//!         self.is_registered(type_id)
//!     }
//!
//!     fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_> {
//!         Box::new(self.registered_types())
//!     }
//! }
//! ```

use crate::TypeId;

/// Trait for single-inheritance type hierarchies.
///
/// Implementations are the authority on type validity. Queries for an id the
/// hierarchy does not know must not fail: they report no parent and no
/// descendants.
///
/// # Required Methods
///
/// - [`parent_of`](Self::parent_of) - Direct parent, `None` at the root
/// - [`properly_subsumed_types`](Self::properly_subsumed_types) - Strict descendants
/// - [`contains_type`](Self::contains_type) - Membership check
/// - [`all_types`](Self::all_types) - Iterate every declared type
pub trait TypeHierarchy: Send + Sync {
    /// Gets the direct parent of a type.
    ///
    /// Returns `None` for the root and for unknown types.
    fn parent_of(&self, type_id: TypeId) -> Option<TypeId>;

    /// Gets every type properly subsumed by `type_id` (all strict descendants).
    ///
    /// The order is not significant but must be stable for one hierarchy
    /// instance. Returns an empty Vec for leaves and unknown types.
    fn properly_subsumed_types(&self, type_id: TypeId) -> Vec<TypeId>;

    /// Checks if a type is declared in this hierarchy.
    fn contains_type(&self, type_id: TypeId) -> bool;

    /// Returns an iterator over all declared type ids.
    fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_>;

    /// Returns the number of declared types.
    fn type_count(&self) -> usize {
        self.all_types().count()
    }

    /// Gets the display name of a type, if the hierarchy tracks names.
    fn type_name(&self, type_id: TypeId) -> Option<&str> {
        let _ = type_id;
        None
    }
}

impl<T: TypeHierarchy + ?Sized> TypeHierarchy for &T {
    fn parent_of(&self, type_id: TypeId) -> Option<TypeId> {
        (**self).parent_of(type_id)
    }

    fn properly_subsumed_types(&self, type_id: TypeId) -> Vec<TypeId> {
        (**self).properly_subsumed_types(type_id)
    }

    fn contains_type(&self, type_id: TypeId) -> bool {
        (**self).contains_type(type_id)
    }

    fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_> {
        (**self).all_types()
    }

    fn type_count(&self) -> usize {
        (**self).type_count()
    }

    fn type_name(&self, type_id: TypeId) -> Option<&str> {
        (**self).type_name(type_id)
    }
}
