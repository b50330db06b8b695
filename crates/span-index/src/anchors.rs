//! Per-type anchor sets for one side (begin or end) of a position node.

use std::borrow::Cow;
use std::fmt;

use hashbrown::{HashMap, HashSet};
use span_hierarchy::TypeId;

use crate::config::PropagationMode;
use crate::node::Scope;
use crate::traits::Annotation;

/// Annotations anchored at a position under one type.
///
/// Borrowed straight from the node in eager mode, assembled on demand in
/// lazy mode. Either way it is a plain set with no duplicates and no
/// ordering.
pub struct AnchorSet<'a, A: Annotation> {
    set: Cow<'a, HashSet<A>>,
}

impl<'a, A: Annotation> AnchorSet<'a, A> {
    pub(crate) fn borrowed(set: &'a HashSet<A>) -> Self {
        Self {
            set: Cow::Borrowed(set),
        }
    }

    pub(crate) fn owned(set: HashSet<A>) -> Self {
        Self {
            set: Cow::Owned(set),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::owned(HashSet::new())
    }

    /// Number of annotations in the set.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns true if no annotation is anchored.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns true if `annotation` is in the set.
    pub fn contains(&self, annotation: &A) -> bool {
        self.set.contains(annotation)
    }

    /// Iterates the annotations in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &A> + '_ {
        self.set.iter()
    }

    /// Returns true if the set was assembled for this call rather than
    /// borrowed from the index.
    pub fn is_owned(&self) -> bool {
        matches!(self.set, Cow::Owned(_))
    }

    /// Collects the annotations into a sorted vector.
    pub fn to_sorted_vec(&self) -> Vec<A>
    where
        A: Ord,
    {
        let mut result: Vec<A> = self.set.iter().copied().collect();
        result.sort_unstable();
        result
    }
}

impl<'s, A: Annotation> IntoIterator for &'s AnchorSet<'_, A> {
    type Item = &'s A;
    type IntoIter = hashbrown::hash_set::Iter<'s, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.set.iter()
    }
}

impl<A: Annotation> PartialEq for AnchorSet<'_, A> {
    fn eq(&self, other: &Self) -> bool {
        *self.set == *other.set
    }
}

impl<A: Annotation> Eq for AnchorSet<'_, A> {}

impl<A: Annotation> fmt::Debug for AnchorSet<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.set.iter()).finish()
    }
}

/// Type-keyed anchor sets plus, in eager mode, the types each annotation was
/// registered with directly.
///
/// Empty sets are dropped, so a key is present iff its set is non-empty.
#[derive(Debug, Clone)]
pub(crate) struct AnchorTable<A> {
    sets: HashMap<TypeId, HashSet<A>>,
    origins: HashMap<A, Vec<TypeId>>,
}

impl<A> Default for AnchorTable<A> {
    fn default() -> Self {
        Self {
            sets: HashMap::new(),
            origins: HashMap::new(),
        }
    }
}

impl<A: Annotation> AnchorTable<A> {
    /// Returns false if the pair was already registered.
    pub(crate) fn insert(&mut self, annotation: A, type_id: TypeId, scope: &Scope<'_>) -> bool {
        match scope.mode {
            PropagationMode::Lazy => self.insert_one(type_id, annotation, scope.set_capacity),
            PropagationMode::Eager => {
                let origins = self.origins.entry(annotation).or_default();
                if origins.contains(&type_id) {
                    return false;
                }
                origins.push(type_id);
                for target in scope.traverser.ancestors_or_self(type_id) {
                    self.insert_one(target, annotation, scope.set_capacity);
                }
                true
            }
        }
    }

    /// Undoes one `insert` of the same pair. Returns false if the pair was
    /// not registered, in which case nothing changes.
    pub(crate) fn remove(&mut self, annotation: &A, type_id: TypeId, scope: &Scope<'_>) -> bool {
        match scope.mode {
            PropagationMode::Lazy => self.remove_one(type_id, annotation),
            PropagationMode::Eager => {
                let Some(origins) = self.origins.get_mut(annotation) else {
                    return false;
                };
                let Some(position) = origins.iter().position(|&t| t == type_id) else {
                    return false;
                };
                origins.swap_remove(position);

                // Ancestors shared with another origin of the same handle stay.
                let still_reached: Vec<TypeId> = origins
                    .iter()
                    .flat_map(|&origin| scope.traverser.ancestors_or_self(origin))
                    .collect();
                if origins.is_empty() {
                    self.origins.remove(annotation);
                }

                for target in scope.traverser.ancestors_or_self(type_id) {
                    if !still_reached.contains(&target) {
                        self.remove_one(target, annotation);
                    }
                }
                true
            }
        }
    }

    pub(crate) fn anchors<'a>(&'a self, type_id: TypeId, scope: &Scope<'_>) -> AnchorSet<'a, A> {
        match scope.mode {
            PropagationMode::Eager => match self.sets.get(&type_id) {
                Some(set) => AnchorSet::borrowed(set),
                None => AnchorSet::empty(),
            },
            PropagationMode::Lazy => {
                if self.sets.is_empty() {
                    return AnchorSet::empty();
                }
                let mut result = HashSet::new();
                if let Some(set) = self.sets.get(&type_id) {
                    result.extend(set.iter().copied());
                }
                for descendant in scope.traverser.descendants(type_id) {
                    if let Some(set) = self.sets.get(&descendant) {
                        result.extend(set.iter().copied());
                    }
                }
                AnchorSet::owned(result)
            }
        }
    }

    pub(crate) fn has_any(&self, type_id: TypeId, scope: &Scope<'_>) -> bool {
        if self.sets.contains_key(&type_id) {
            return true;
        }
        match scope.mode {
            PropagationMode::Eager => false,
            PropagationMode::Lazy => {
                !self.sets.is_empty()
                    && scope
                        .traverser
                        .descendants(type_id)
                        .iter()
                        .any(|descendant| self.sets.contains_key(descendant))
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of type keys with a non-empty set.
    pub(crate) fn type_count(&self) -> usize {
        self.sets.len()
    }

    /// Number of (type, annotation) entries across all sets.
    pub(crate) fn entry_count(&self) -> usize {
        self.sets.values().map(HashSet::len).sum()
    }

    /// Stored sets sorted by type, each sorted by annotation.
    pub(crate) fn sorted_entries(&self) -> Vec<(TypeId, Vec<A>)>
    where
        A: Ord,
    {
        let mut entries: Vec<(TypeId, Vec<A>)> = self
            .sets
            .iter()
            .map(|(&type_id, set)| {
                let mut annotations: Vec<A> = set.iter().copied().collect();
                annotations.sort_unstable();
                (type_id, annotations)
            })
            .collect();
        entries.sort_unstable_by_key(|(type_id, _)| *type_id);
        entries
    }

    fn insert_one(&mut self, type_id: TypeId, annotation: A, capacity: usize) -> bool {
        self.sets
            .entry(type_id)
            .or_insert_with(|| HashSet::with_capacity(capacity))
            .insert(annotation)
    }

    fn remove_one(&mut self, type_id: TypeId, annotation: &A) -> bool {
        let Some(set) = self.sets.get_mut(&type_id) else {
            return false;
        };
        let removed = set.remove(annotation);
        if set.is_empty() {
            self.sets.remove(&type_id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::AnnotationHandle;
    use span_hierarchy::{HierarchyTraverser, TypeTree};

    /// Annotation <- Token <- Word <- Cap
    fn create_chain() -> TypeTree {
        let mut builder = TypeTree::builder("Annotation");
        builder.declare("Token", "Annotation").unwrap();
        builder.declare("Word", "Token").unwrap();
        builder.declare("Cap", "Word").unwrap();
        builder.build()
    }

    fn scope(tree: &TypeTree, mode: PropagationMode) -> Scope<'_> {
        Scope {
            traverser: HierarchyTraverser::new(tree),
            mode,
            set_capacity: 2,
        }
    }

    #[test]
    fn test_eager_insert_reaches_ancestors() {
        let tree = create_chain();
        let scope = scope(&tree, PropagationMode::Eager);
        let word = tree.type_id("Word").unwrap();
        let a = AnnotationHandle::new(1, 0, 4, word);

        let mut table = AnchorTable::default();
        table.insert(a, word, &scope);

        assert_eq!(table.type_count(), 3);
        assert!(table.anchors(tree.root(), &scope).contains(&a));
        assert!(!table.has_any(tree.type_id("Cap").unwrap(), &scope));
    }

    #[test]
    fn test_lazy_insert_touches_one_key() {
        let tree = create_chain();
        let scope = scope(&tree, PropagationMode::Lazy);
        let word = tree.type_id("Word").unwrap();
        let a = AnnotationHandle::new(1, 0, 4, word);

        let mut table = AnchorTable::default();
        table.insert(a, word, &scope);

        assert_eq!(table.type_count(), 1);
        let anchors = table.anchors(tree.root(), &scope);
        assert!(anchors.is_owned());
        assert!(anchors.contains(&a));
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let tree = create_chain();
        let word = tree.type_id("Word").unwrap();
        let a = AnnotationHandle::new(1, 0, 4, word);

        for mode in [PropagationMode::Lazy, PropagationMode::Eager] {
            let scope = scope(&tree, mode);
            let mut table = AnchorTable::default();
            assert!(table.insert(a, word, &scope));
            assert!(!table.insert(a, word, &scope));
            assert!(table.insert(a, tree.root(), &scope));
            assert_eq!(table.entry_count(), if mode.is_eager() { 3 } else { 2 });
        }
    }

    #[test]
    fn test_eager_remove_keeps_shared_ancestors() {
        let tree = create_chain();
        let scope = scope(&tree, PropagationMode::Eager);
        let token = tree.type_id("Token").unwrap();
        let cap = tree.type_id("Cap").unwrap();
        let a = AnnotationHandle::new(1, 0, 4, cap);

        let mut table = AnchorTable::default();
        table.insert(a, cap, &scope);
        table.insert(a, token, &scope);
        assert!(table.remove(&a, cap, &scope));

        assert!(!table.has_any(cap, &scope));
        assert!(!table.has_any(tree.type_id("Word").unwrap(), &scope));
        assert!(table.anchors(token, &scope).contains(&a));
        assert!(table.anchors(tree.root(), &scope).contains(&a));
    }

    #[test]
    fn test_eager_remove_of_unregistered_pair_is_noop() {
        let tree = create_chain();
        let scope = scope(&tree, PropagationMode::Eager);
        let word = tree.type_id("Word").unwrap();
        let a = AnnotationHandle::new(1, 0, 4, word);

        let mut table = AnchorTable::default();
        table.insert(a, word, &scope);

        // Token was only reached by propagation.
        assert!(!table.remove(&a, tree.type_id("Token").unwrap(), &scope));
        assert_eq!(table.entry_count(), 3);
    }

    #[test]
    fn test_remove_drops_empty_sets() {
        let tree = create_chain();
        for mode in [PropagationMode::Lazy, PropagationMode::Eager] {
            let scope = scope(&tree, mode);
            let word = tree.type_id("Word").unwrap();
            let a = AnnotationHandle::new(1, 0, 4, word);

            let mut table = AnchorTable::default();
            table.insert(a, word, &scope);
            assert!(table.remove(&a, word, &scope));
            assert!(table.is_empty());
            assert!(!table.remove(&a, word, &scope));
        }
    }

    #[test]
    fn test_sorted_entries() {
        let tree = create_chain();
        let scope = scope(&tree, PropagationMode::Lazy);
        let word = tree.type_id("Word").unwrap();
        let b = AnnotationHandle::new(2, 0, 4, word);
        let a = AnnotationHandle::new(1, 0, 4, word);

        let mut table = AnchorTable::default();
        table.insert(b, word, &scope);
        table.insert(a, word, &scope);
        table.insert(a, tree.root(), &scope);

        let entries = table.sorted_entries();
        assert_eq!(entries, vec![(tree.root(), vec![a]), (word, vec![a, b])]);
    }
}
