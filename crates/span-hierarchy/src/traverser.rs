//! Hierarchy traversal over any [`TypeHierarchy`].
//!
//! Parent chains are walked with an explicit loop bounded by the number of
//! declared types, so a misbehaving collaborator that reports a cycle cannot
//! hang the caller.

use std::collections::{HashSet, VecDeque};
use std::iter::FusedIterator;

use crate::traits::TypeHierarchy;
use crate::TypeId;

/// Traverses a type hierarchy through the [`TypeHierarchy`] trait.
///
/// The traverser provides:
/// - The ancestor chain of a type (the eager propagation path)
/// - All descendants of a type (the lazy lookup set)
/// - Subsumption and depth queries
///
/// # Example
///
/// ```rust
/// use span_hierarchy::{HierarchyTraverser, TypeTree};
///
/// let mut builder = TypeTree::builder("Annotation");
/// builder.declare("Token", "Annotation").unwrap();
/// let word = builder.declare("Word", "Token").unwrap();
/// let tree = builder.build();
///
/// let traverser = HierarchyTraverser::new(&tree);
/// assert_eq!(traverser.depth(word), 2);
/// assert_eq!(traverser.ancestors(word).count(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct HierarchyTraverser<'a> {
    hierarchy: &'a dyn TypeHierarchy,
    depth_limit: usize,
}

impl<'a> HierarchyTraverser<'a> {
    /// Creates a new traverser over the given hierarchy.
    pub fn new(hierarchy: &'a dyn TypeHierarchy) -> Self {
        Self {
            hierarchy,
            depth_limit: hierarchy.type_count(),
        }
    }

    /// Returns the underlying hierarchy.
    pub fn hierarchy(&self) -> &'a dyn TypeHierarchy {
        self.hierarchy
    }

    /// Iterates the strict ancestors of a type, nearest first.
    ///
    /// Does NOT include the type itself. Empty for the root and for unknown
    /// types.
    pub fn ancestors(&self, type_id: TypeId) -> Ancestors<'a> {
        Ancestors {
            hierarchy: self.hierarchy,
            next: self.hierarchy.parent_of(type_id),
            remaining: self.depth_limit,
        }
    }

    /// Iterates a type followed by its ancestors, nearest first.
    ///
    /// This is the set of map keys touched by eager propagation.
    pub fn ancestors_or_self(&self, type_id: TypeId) -> Ancestors<'a> {
        Ancestors {
            hierarchy: self.hierarchy,
            next: Some(type_id),
            remaining: self.depth_limit + 1,
        }
    }

    /// Gets all strict descendants of a type.
    pub fn descendants(&self, type_id: TypeId) -> Vec<TypeId> {
        self.hierarchy.properly_subsumed_types(type_id)
    }

    /// Gets a type followed by all of its strict descendants.
    pub fn descendants_or_self(&self, type_id: TypeId) -> Vec<TypeId> {
        let mut result = Vec::with_capacity(1);
        result.push(type_id);
        result.extend(self.hierarchy.properly_subsumed_types(type_id));
        result
    }

    /// Gets direct children of a type by scanning every declared type.
    ///
    /// Prefer hierarchy-specific accessors such as
    /// [`TypeTree::children_of`](crate::TypeTree::children_of) when available.
    pub fn direct_children(&self, type_id: TypeId) -> Vec<TypeId> {
        self.hierarchy
            .all_types()
            .filter(|&candidate| self.hierarchy.parent_of(candidate) == Some(type_id))
            .collect()
    }

    /// Returns true if `ancestor` subsumes `type_id`, i.e. `type_id` is
    /// `ancestor` or one of its descendants.
    pub fn subsumes(&self, ancestor: TypeId, type_id: TypeId) -> bool {
        self.ancestors_or_self(type_id).any(|t| t == ancestor)
    }

    /// Returns true if `ancestor` properly subsumes `type_id`.
    pub fn properly_subsumes(&self, ancestor: TypeId, type_id: TypeId) -> bool {
        self.ancestors(type_id).any(|t| t == ancestor)
    }

    /// Returns the number of strict ancestors of a type (0 for the root).
    pub fn depth(&self, type_id: TypeId) -> usize {
        self.ancestors(type_id).count()
    }

    /// Collects the subtree rooted at `type_id` with a breadth-first walk
    /// over [`direct_children`](Self::direct_children).
    ///
    /// Useful for checking a collaborator's `properly_subsumed_types`
    /// against its parent pointers.
    pub fn collect_subtree(&self, type_id: TypeId) -> HashSet<TypeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        for child in self.direct_children(type_id) {
            if visited.insert(child) {
                queue.push_back(child);
            }
        }

        while let Some(current) = queue.pop_front() {
            for child in self.direct_children(current) {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        visited
    }
}

impl std::fmt::Debug for HierarchyTraverser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyTraverser")
            .field("depth_limit", &self.depth_limit)
            .finish()
    }
}

/// Iterator over a parent chain. See [`HierarchyTraverser::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    hierarchy: &'a dyn TypeHierarchy,
    next: Option<TypeId>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.hierarchy.parent_of(current);
        Some(current)
    }
}

impl FusedIterator for Ancestors<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeTree;

    /// Creates a test hierarchy:
    /// ```text
    ///        Annotation
    ///       /          \
    ///     Token      Sentence
    ///    /    \
    ///  Word   Punct
    ///   |
    ///  Cap
    /// ```
    fn create_test_tree() -> TypeTree {
        let mut builder = TypeTree::builder("Annotation");
        builder.declare("Token", "Annotation").unwrap();
        builder.declare("Sentence", "Annotation").unwrap();
        builder.declare("Word", "Token").unwrap();
        builder.declare("Punct", "Token").unwrap();
        builder.declare("Cap", "Word").unwrap();
        builder.build()
    }

    fn id(tree: &TypeTree, name: &str) -> TypeId {
        tree.type_id(name).unwrap()
    }

    /// Hierarchy whose parent pointers form a cycle.
    struct CyclicHierarchy;

    impl TypeHierarchy for CyclicHierarchy {
        fn parent_of(&self, type_id: TypeId) -> Option<TypeId> {
            Some(TypeId::new((type_id.raw() + 1) % 3))
        }

        fn properly_subsumed_types(&self, _type_id: TypeId) -> Vec<TypeId> {
            Vec::new()
        }

        fn contains_type(&self, type_id: TypeId) -> bool {
            type_id.raw() < 3
        }

        fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_> {
            Box::new((0..3).map(TypeId::new))
        }
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        let chain: Vec<TypeId> = traverser.ancestors(id(&tree, "Cap")).collect();
        assert_eq!(
            chain,
            vec![id(&tree, "Word"), id(&tree, "Token"), id(&tree, "Annotation")]
        );
    }

    #[test]
    fn test_ancestors_or_self_starts_with_self() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        let chain: Vec<TypeId> = traverser.ancestors_or_self(id(&tree, "Word")).collect();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], id(&tree, "Word"));
    }

    #[test]
    fn test_ancestors_of_root_is_empty() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        assert_eq!(traverser.ancestors(tree.root()).count(), 0);
    }

    #[test]
    fn test_unknown_type_has_no_ancestors() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);
        let unknown = TypeId::new(999);

        assert_eq!(traverser.ancestors(unknown).count(), 0);
        assert_eq!(traverser.ancestors_or_self(unknown).collect::<Vec<_>>(), vec![unknown]);
        assert!(traverser.descendants(unknown).is_empty());
    }

    #[test]
    fn test_cyclic_parents_terminate() {
        let hierarchy = CyclicHierarchy;
        let traverser = HierarchyTraverser::new(&hierarchy);

        assert_eq!(traverser.ancestors(TypeId::new(0)).count(), 3);
        assert_eq!(traverser.ancestors_or_self(TypeId::new(0)).count(), 4);
    }

    #[test]
    fn test_subsumes() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        assert!(traverser.subsumes(id(&tree, "Token"), id(&tree, "Cap")));
        assert!(traverser.subsumes(id(&tree, "Word"), id(&tree, "Word")));
        assert!(!traverser.subsumes(id(&tree, "Sentence"), id(&tree, "Word")));
        assert!(!traverser.properly_subsumes(id(&tree, "Word"), id(&tree, "Word")));
        assert!(traverser.properly_subsumes(tree.root(), id(&tree, "Punct")));
    }

    #[test]
    fn test_depth() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        assert_eq!(traverser.depth(tree.root()), 0);
        assert_eq!(traverser.depth(id(&tree, "Token")), 1);
        assert_eq!(traverser.depth(id(&tree, "Cap")), 3);
    }

    #[test]
    fn test_descendants_or_self() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        let result = traverser.descendants_or_self(id(&tree, "Word"));
        assert_eq!(result, vec![id(&tree, "Word"), id(&tree, "Cap")]);
    }

    #[test]
    fn test_direct_children() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        let mut children = traverser.direct_children(id(&tree, "Token"));
        children.sort_unstable();
        assert_eq!(children, vec![id(&tree, "Word"), id(&tree, "Punct")]);
    }

    #[test]
    fn test_subtree_matches_properly_subsumed_types() {
        let tree = create_test_tree();
        let traverser = HierarchyTraverser::new(&tree);

        for type_id in tree.all_types() {
            let expected: HashSet<TypeId> =
                tree.properly_subsumed_types(type_id).into_iter().collect();
            assert_eq!(traverser.collect_subtree(type_id), expected);
        }
    }

    #[test]
    fn test_deep_hierarchy() {
        let mut builder = TypeTree::builder("T0");
        for i in 1..100 {
            builder
                .declare(&format!("T{}", i), &format!("T{}", i - 1))
                .unwrap();
        }
        let tree = builder.build();
        let traverser = HierarchyTraverser::new(&tree);

        assert_eq!(traverser.depth(id(&tree, "T99")), 99);
        assert_eq!(traverser.descendants(tree.root()).len(), 99);
    }
}
