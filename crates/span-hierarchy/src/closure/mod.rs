//! Precomputed subsumption closure for O(1) hierarchy lookups.
//!
//! The closure precomputes every ancestor chain and descendant list, trading
//! memory for speed. After building, lazy-mode index reads no longer walk the
//! hierarchy on every call.
//!
//! # Example
//!
//! ```rust
//! use span_hierarchy::{SubsumptionClosure, TypeHierarchy, TypeTree};
//!
//! let mut builder = TypeTree::builder("Annotation");
//! let token = builder.declare("Token", "Annotation").unwrap();
//! let word = builder.declare("Word", "Token").unwrap();
//! let tree = builder.build();
//!
//! let closure = SubsumptionClosure::build(&tree);
//! assert!(closure.is_ancestor_of(tree.root(), word));
//! assert_eq!(closure.get_descendants(token), &[word]);
//!
//! // The closure is itself a TypeHierarchy
//! assert_eq!(closure.parent_of(word), Some(token));
//! ```

mod stats;

pub use stats::ClosureStats;

use std::collections::{HashMap, HashSet};

use crate::traits::TypeHierarchy;
use crate::traverser::HierarchyTraverser;
use crate::TypeId;

/// Precomputed closure of a single-inheritance type hierarchy.
///
/// Provides O(1) lookup for:
/// - Is `A` an ancestor of `B`?
/// - Is `A` a descendant of `B`?
/// - All ancestors of `A` (nearest first)
/// - All descendants of `A` (in the source hierarchy's order)
///
/// This implements [`TypeHierarchy`], so it can stand in for the hierarchy
/// it was built from.
#[derive(Debug, Clone)]
pub struct SubsumptionClosure {
    /// Direct parent of each type.
    parents: HashMap<TypeId, TypeId>,
    /// For each type, its ancestor chain, nearest first.
    ancestors: HashMap<TypeId, Vec<TypeId>>,
    /// For each type, its ancestors as a set for membership tests.
    ancestor_sets: HashMap<TypeId, HashSet<TypeId>>,
    /// For each type, all strict descendants.
    descendants: HashMap<TypeId, Vec<TypeId>>,
    /// Type names, when the source hierarchy tracks them.
    names: HashMap<TypeId, String>,
    /// All known type ids, sorted.
    types: Vec<TypeId>,
    /// Build statistics.
    stats: ClosureStats,
}

impl SubsumptionClosure {
    /// Builds the closure from a hierarchy.
    ///
    /// This is a one-time O(n * d) operation where n is the type count and d
    /// the hierarchy depth, plus one descendant query per type.
    pub fn build<H: TypeHierarchy + ?Sized>(hierarchy: &H) -> Self {
        Self::build_with_progress(hierarchy, |_, _| {})
    }

    /// Builds the closure with a progress callback.
    ///
    /// The callback receives (current_type_index, total_types).
    pub fn build_with_progress<H, F>(hierarchy: &H, mut progress: F) -> Self
    where
        H: TypeHierarchy + ?Sized,
        F: FnMut(usize, usize),
    {
        let start = std::time::Instant::now();

        let mut types: Vec<TypeId> = hierarchy.all_types().collect();
        types.sort_unstable();
        let type_count = types.len();

        let mut parents = HashMap::with_capacity(type_count);
        let mut ancestors = HashMap::with_capacity(type_count);
        let mut ancestor_sets = HashMap::with_capacity(type_count);
        let mut descendants = HashMap::with_capacity(type_count);
        let mut names = HashMap::new();
        let mut max_depth = 0;
        let mut total_ancestors = 0usize;
        let mut total_descendants = 0usize;
        let mut widest_subtree = 0usize;
        let mut leaf_count = 0usize;

        let as_dyn: &dyn TypeHierarchy = &hierarchy;
        let traverser = HierarchyTraverser::new(as_dyn);

        for (idx, &type_id) in types.iter().enumerate() {
            progress(idx, type_count);

            if let Some(parent) = hierarchy.parent_of(type_id) {
                parents.insert(type_id, parent);
            }
            if let Some(name) = hierarchy.type_name(type_id) {
                names.insert(type_id, name.to_string());
            }

            let chain: Vec<TypeId> = traverser.ancestors(type_id).collect();
            max_depth = max_depth.max(chain.len());
            total_ancestors += chain.len();
            if !chain.is_empty() {
                ancestor_sets.insert(type_id, chain.iter().copied().collect());
                ancestors.insert(type_id, chain);
            }

            let below = hierarchy.properly_subsumed_types(type_id);
            total_descendants += below.len();
            widest_subtree = widest_subtree.max(below.len());
            if below.is_empty() {
                leaf_count += 1;
            } else {
                descendants.insert(type_id, below);
            }
        }

        let average = |total: usize| {
            if type_count > 0 {
                total as f64 / type_count as f64
            } else {
                0.0
            }
        };

        let stats = ClosureStats {
            type_count,
            leaf_count,
            max_depth,
            widest_subtree,
            avg_ancestors: average(total_ancestors),
            avg_descendants: average(total_descendants),
            // Ancestors are held twice: chain and set.
            stored_ids: total_ancestors * 2 + total_descendants,
            build_time_us: start.elapsed().as_micros() as u64,
        };

        tracing::debug!(
            types = stats.type_count,
            max_depth = stats.max_depth,
            build_time_us = stats.build_time_us,
            "built subsumption closure"
        );

        Self {
            parents,
            ancestors,
            ancestor_sets,
            descendants,
            names,
            types,
            stats,
        }
    }

    /// Returns true if `ancestor` is a strict ancestor of `type_id` (O(1)).
    #[inline]
    pub fn is_ancestor_of(&self, ancestor: TypeId, type_id: TypeId) -> bool {
        self.ancestor_sets
            .get(&type_id)
            .is_some_and(|set| set.contains(&ancestor))
    }

    /// Returns true if `type_id` is a strict descendant of `ancestor` (O(1)).
    #[inline]
    pub fn is_descendant_of(&self, type_id: TypeId, ancestor: TypeId) -> bool {
        self.is_ancestor_of(ancestor, type_id)
    }

    /// Returns true if `ancestor` subsumes `type_id` (same type or ancestor).
    #[inline]
    pub fn subsumes(&self, ancestor: TypeId, type_id: TypeId) -> bool {
        ancestor == type_id || self.is_ancestor_of(ancestor, type_id)
    }

    /// Gets the ancestor chain of a type, nearest first (O(1)).
    #[inline]
    pub fn get_ancestors(&self, type_id: TypeId) -> &[TypeId] {
        self.ancestors
            .get(&type_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Gets all strict descendants of a type (O(1)).
    #[inline]
    pub fn get_descendants(&self, type_id: TypeId) -> &[TypeId] {
        self.descendants
            .get(&type_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns build statistics.
    pub fn stats(&self) -> &ClosureStats {
        &self.stats
    }
}

impl TypeHierarchy for SubsumptionClosure {
    fn parent_of(&self, type_id: TypeId) -> Option<TypeId> {
        self.parents.get(&type_id).copied()
    }

    fn properly_subsumed_types(&self, type_id: TypeId) -> Vec<TypeId> {
        self.get_descendants(type_id).to_vec()
    }

    fn contains_type(&self, type_id: TypeId) -> bool {
        self.types.binary_search(&type_id).is_ok()
    }

    fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_> {
        Box::new(self.types.iter().copied())
    }

    fn type_count(&self) -> usize {
        self.types.len()
    }

    fn type_name(&self, type_id: TypeId) -> Option<&str> {
        self.names.get(&type_id).map(String::as_str)
    }
}
