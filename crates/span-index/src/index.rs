//! The per-document position index.

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use span_hierarchy::{HierarchyTraverser, TypeHierarchy, TypeId};
use tracing::{debug, trace};

use crate::anchors::AnchorSet;
use crate::config::{IndexConfig, PropagationMode};
use crate::error::{IndexError, IndexResult};
use crate::node::{NodeMut, NodeRef, Nodes, PositionNode, Scope};
use crate::snapshot::{IndexSnapshot, NodeSnapshot};
use crate::stats::IndexStats;
use crate::traits::Annotation;

/// Position index for one document.
///
/// Keeps a position node per text offset that has been written to, and
/// answers "which annotations of type T begin / end here" and "is this
/// offset inside some T" with subtype semantics. The propagation mode
/// chosen at construction decides whether subsumption is paid on write
/// (eager) or on read (lazy); both modes give identical answers.
///
/// # Example
///
/// ```rust
/// use span_hierarchy::TypeTree;
/// use span_index::{AnnotationHandle, DocumentIndex, IndexConfig};
///
/// let mut builder = TypeTree::builder("Annotation");
/// let token = builder.declare("Token", "Annotation").unwrap();
/// let word = builder.declare("Word", "Token").unwrap();
/// let tree = builder.build();
///
/// let mut index = DocumentIndex::with_config(&tree, IndexConfig::eager());
/// let hello = AnnotationHandle::new(1, 0, 5, word);
/// index.add_annotation(hello).unwrap();
///
/// assert!(index.begin_anchors_at(0, token).contains(&hello));
/// assert!(index.is_part_of_at(4, token));
/// assert!(!index.is_part_of_at(5, token));
/// ```
pub struct DocumentIndex<'h, A> {
    traverser: HierarchyTraverser<'h>,
    config: IndexConfig,
    nodes: BTreeMap<usize, PositionNode<A>>,
}

impl<'h, A: Annotation> DocumentIndex<'h, A> {
    /// Creates an empty index with the default (lazy) configuration.
    pub fn new(hierarchy: &'h dyn TypeHierarchy) -> Self {
        Self::with_config(hierarchy, IndexConfig::default())
    }

    /// Creates an empty index with the given configuration.
    pub fn with_config(hierarchy: &'h dyn TypeHierarchy, config: IndexConfig) -> Self {
        debug!(
            mode = ?config.propagation,
            types = hierarchy.type_count(),
            "created document index"
        );
        Self {
            traverser: HierarchyTraverser::new(hierarchy),
            config,
            nodes: BTreeMap::new(),
        }
    }

    /// Returns the type hierarchy the index consults.
    pub fn hierarchy(&self) -> &'h dyn TypeHierarchy {
        self.traverser.hierarchy()
    }

    /// Returns the configuration the index was created with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns the propagation mode.
    pub fn mode(&self) -> PropagationMode {
        self.config.propagation
    }

    fn scope(&self) -> Scope<'h> {
        Scope {
            traverser: self.traverser,
            mode: self.config.propagation,
            set_capacity: self.config.initial_set_capacity,
        }
    }

    /// Read-only view of the node at `offset`. Never allocates.
    pub fn node_at(&self, offset: usize) -> NodeRef<'_, A> {
        NodeRef::new(offset, self.nodes.get(&offset), self.scope())
    }

    /// Mutable view of the node at `offset`, creating the node if needed.
    pub fn node_at_mut(&mut self, offset: usize) -> NodeMut<'_, A> {
        let scope = self.scope();
        let node = self.nodes.entry(offset).or_insert_with(|| {
            trace!(offset, "created position node");
            PositionNode::default()
        });
        NodeMut::new(offset, node, scope)
    }

    fn existing_node_mut(&mut self, offset: usize) -> Option<NodeMut<'_, A>> {
        let scope = self.scope();
        self.nodes
            .get_mut(&offset)
            .map(|node| NodeMut::new(offset, node, scope))
    }

    /// Annotations of `type_id` (or a subtype) beginning at `offset`.
    pub fn begin_anchors_at(&self, offset: usize, type_id: TypeId) -> AnchorSet<'_, A> {
        self.node_at(offset).begin_anchors(type_id)
    }

    /// Annotations of `type_id` (or a subtype) ending at `offset`.
    pub fn end_anchors_at(&self, offset: usize, type_id: TypeId) -> AnchorSet<'_, A> {
        self.node_at(offset).end_anchors(type_id)
    }

    /// Returns true if `offset` is covered by an annotation of `type_id`
    /// (or a subtype).
    pub fn is_part_of_at(&self, offset: usize, type_id: TypeId) -> bool {
        self.node_at(offset).is_part_of(type_id)
    }

    /// Registers an annotation under its own type.
    ///
    /// The annotation becomes a begin anchor at `begin`, an end anchor at
    /// `end`, and counts toward part-of at every offset in `begin..end`.
    ///
    /// Returns `Ok(false)` and changes nothing else if the annotation is
    /// already a begin anchor under its type, so one
    /// [`remove_annotation`](Self::remove_annotation) always undoes it.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSpan`] if `begin > end`; the index is
    /// left untouched.
    pub fn add_annotation(&mut self, annotation: A) -> IndexResult<bool> {
        let (begin, end) = check_span(&annotation)?;
        let type_id = annotation.type_id();

        if !self.node_at_mut(begin).add_begin(annotation, type_id) {
            trace!(?annotation, "annotation already registered");
            return Ok(false);
        }
        self.node_at_mut(end).add_end(annotation, type_id);
        for offset in begin..end {
            self.node_at_mut(offset).add_part_of(type_id);
        }
        trace!(?annotation, begin, end, "registered annotation");
        Ok(true)
    }

    /// Undoes [`add_annotation`](Self::add_annotation).
    ///
    /// Returns `Ok(false)` and changes nothing if the annotation is not
    /// registered under its type. Nodes are neither created nor dropped;
    /// see [`compact`](Self::compact).
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSpan`] if `begin > end`.
    pub fn remove_annotation(&mut self, annotation: &A) -> IndexResult<bool> {
        let (begin, end) = check_span(annotation)?;
        let type_id = annotation.type_id();

        // Part-of counts carry no identity, so the begin anchor decides.
        let registered = self
            .existing_node_mut(begin)
            .is_some_and(|mut node| node.remove_begin(annotation, type_id));
        if !registered {
            return Ok(false);
        }

        if let Some(mut node) = self.existing_node_mut(end) {
            node.remove_end(annotation, type_id);
        }
        for offset in begin..end {
            if let Some(mut node) = self.existing_node_mut(offset) {
                node.remove_part_of(type_id);
            }
        }
        trace!(?annotation, begin, end, "unregistered annotation");
        Ok(true)
    }

    /// Offsets with a materialized node, in ascending order.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.keys().copied()
    }

    /// Views of every materialized node whose offset falls in `range`.
    pub fn nodes_in<R>(&self, range: R) -> Nodes<'_, A>
    where
        R: RangeBounds<usize>,
    {
        Nodes::new(self.nodes.range(range), self.scope())
    }

    /// Returns true if a node exists at `offset`.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.nodes.contains_key(&offset)
    }

    /// Number of materialized nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been materialized.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops nodes that hold no anchors and no coverage.
    ///
    /// Returns the number of nodes removed. Query answers are unaffected.
    pub fn compact(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, node| !node.is_empty());
        let removed = before - self.nodes.len();
        debug!(removed, remaining = self.nodes.len(), "compacted document index");
        removed
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Collects statistics about stored entries.
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            mode: self.config.propagation,
            nodes: self.nodes.len(),
            ..Default::default()
        };
        for node in self.nodes.values() {
            if node.is_empty() {
                stats.empty_nodes += 1;
            }
            stats.begin_entries += node.begin.entry_count();
            stats.end_entries += node.end.entry_count();
            stats.anchor_types += node.begin.type_count() + node.end.type_count();
            stats.part_of_entries += node.part_of.type_count();
        }
        stats
    }

    /// Ordered dump of every non-empty node.
    pub fn snapshot(&self) -> IndexSnapshot<A>
    where
        A: Ord,
    {
        let nodes = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.is_empty())
            .map(|(&offset, node)| NodeSnapshot {
                offset,
                begin: node.begin.sorted_entries(),
                end: node.end.sorted_entries(),
                part_of: node.part_of.sorted_entries(),
            })
            .collect();

        IndexSnapshot {
            mode: self.config.propagation,
            nodes,
        }
    }
}

impl<A> std::fmt::Debug for DocumentIndex<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("config", &self.config)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

fn check_span<A: Annotation>(annotation: &A) -> IndexResult<(usize, usize)> {
    let (begin, end) = (annotation.begin(), annotation.end());
    if begin > end {
        return Err(IndexError::InvalidSpan { begin, end });
    }
    Ok((begin, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::AnnotationHandle;
    use span_hierarchy::TypeTree;

    /// Creates a test hierarchy:
    /// ```text
    ///        Annotation
    ///       /     |     \
    ///   Concept  Token  Sentence
    ///           /    \
    ///         Word  Letter
    /// ```
    fn create_tree() -> TypeTree {
        let mut builder = TypeTree::builder("Annotation");
        builder.declare("Concept", "Annotation").unwrap();
        builder.declare("Token", "Annotation").unwrap();
        builder.declare("Sentence", "Annotation").unwrap();
        builder.declare("Word", "Token").unwrap();
        builder.declare("Letter", "Token").unwrap();
        builder.build()
    }

    fn id(tree: &TypeTree, name: &str) -> TypeId {
        tree.type_id(name).unwrap()
    }

    fn both_modes() -> [IndexConfig; 2] {
        [IndexConfig::low_memory(), IndexConfig::eager()]
    }

    #[test]
    fn test_add_registers_begin_end_and_coverage() {
        let tree = create_tree();
        let word = id(&tree, "Word");
        let token = id(&tree, "Token");

        for config in both_modes() {
            let mut index = DocumentIndex::with_config(&tree, config);
            let a = AnnotationHandle::new(1, 2, 6, word);
            index.add_annotation(a).unwrap();

            assert!(index.begin_anchors_at(2, token).contains(&a));
            assert!(index.end_anchors_at(6, word).contains(&a));
            assert!(index.begin_anchors_at(6, token).is_empty());
            assert!((2..6).all(|offset| index.is_part_of_at(offset, token)));
            assert!(!index.is_part_of_at(6, token));
            assert!(!index.is_part_of_at(1, token));
            assert!(!index.is_part_of_at(3, id(&tree, "Letter")));
        }
    }

    #[test]
    fn test_read_does_not_materialize_nodes() {
        let tree = create_tree();
        let index: DocumentIndex<'_, AnnotationHandle> = DocumentIndex::new(&tree);

        assert!(index.begin_anchors_at(10, tree.root()).is_empty());
        assert!(!index.node_at(10).exists());
        assert!(index.is_empty());
    }

    #[test]
    fn test_node_at_mut_materializes_node() {
        let tree = create_tree();
        let mut index: DocumentIndex<'_, AnnotationHandle> = DocumentIndex::new(&tree);

        index.node_at_mut(4);
        assert!(index.contains_offset(4));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_invalid_span_rejected() {
        let tree = create_tree();
        let mut index = DocumentIndex::new(&tree);
        let bad = AnnotationHandle::new(1, 5, 2, id(&tree, "Word"));

        assert_eq!(
            index.add_annotation(bad),
            Err(IndexError::InvalidSpan { begin: 5, end: 2 })
        );
        assert_eq!(
            index.remove_annotation(&bad),
            Err(IndexError::InvalidSpan { begin: 5, end: 2 })
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_span_has_no_coverage() {
        let tree = create_tree();
        let word = id(&tree, "Word");

        for config in both_modes() {
            let mut index = DocumentIndex::with_config(&tree, config);
            let a = AnnotationHandle::new(1, 3, 3, word);
            index.add_annotation(a).unwrap();

            assert!(index.begin_anchors_at(3, word).contains(&a));
            assert!(index.end_anchors_at(3, word).contains(&a));
            assert!(!index.is_part_of_at(3, word));
        }
    }

    #[test]
    fn test_remove_restores_empty_answers() {
        let tree = create_tree();
        let word = id(&tree, "Word");

        for config in both_modes() {
            let mut index = DocumentIndex::with_config(&tree, config);
            let a = AnnotationHandle::new(1, 0, 3, word);
            index.add_annotation(a).unwrap();
            assert_eq!(index.remove_annotation(&a), Ok(true));
            assert_eq!(index.remove_annotation(&a), Ok(false));

            assert!(index.begin_anchors_at(0, tree.root()).is_empty());
            assert!(index.end_anchors_at(3, tree.root()).is_empty());
            assert!(!index.is_part_of_at(1, tree.root()));
            assert!(index.snapshot().is_empty());
        }
    }

    #[test]
    fn test_duplicate_add_is_undone_by_one_remove() {
        let tree = create_tree();
        let word = id(&tree, "Word");

        for config in both_modes() {
            let mut index = DocumentIndex::with_config(&tree, config);
            let a = AnnotationHandle::new(1, 0, 3, word);
            assert_eq!(index.add_annotation(a), Ok(true));
            let once = index.snapshot();
            assert_eq!(index.add_annotation(a), Ok(false));
            assert_eq!(index.snapshot(), once);
            assert_eq!(index.node_at(1).part_of_count(word), 1);

            assert_eq!(index.remove_annotation(&a), Ok(true));
            assert_eq!(index.remove_annotation(&a), Ok(false));
            assert!(!index.is_part_of_at(1, tree.root()));
            assert_eq!(index.node_at(1).part_of_count(tree.root()), 0);
            assert!(index.snapshot().is_empty());
        }
    }

    #[test]
    fn test_remove_unknown_annotation_is_noop() {
        let tree = create_tree();
        let word = id(&tree, "Word");

        for config in both_modes() {
            let mut index = DocumentIndex::with_config(&tree, config);
            let kept = AnnotationHandle::new(1, 0, 3, word);
            index.add_annotation(kept).unwrap();
            let before = index.snapshot();

            let twin = AnnotationHandle::new(2, 0, 3, word);
            let elsewhere = AnnotationHandle::new(3, 20, 30, word);
            let retyped = AnnotationHandle::new(1, 0, 3, id(&tree, "Token"));
            assert_eq!(index.remove_annotation(&twin), Ok(false));
            assert_eq!(index.remove_annotation(&elsewhere), Ok(false));
            assert_eq!(index.remove_annotation(&retyped), Ok(false));

            assert_eq!(index.snapshot(), before);
            assert!(!index.contains_offset(20));
        }
    }

    #[test]
    fn test_overlapping_coverage_counts() {
        let tree = create_tree();
        let word = id(&tree, "Word");
        let letter = id(&tree, "Letter");
        let token = id(&tree, "Token");

        for config in both_modes() {
            let mut index = DocumentIndex::with_config(&tree, config);
            let w = AnnotationHandle::new(1, 0, 4, word);
            let l = AnnotationHandle::new(2, 2, 3, letter);
            index.add_annotation(w).unwrap();
            index.add_annotation(l).unwrap();

            assert_eq!(index.node_at(2).part_of_count(token), 2);
            assert_eq!(index.node_at(3).part_of_count(token), 1);

            index.remove_annotation(&w).unwrap();
            assert!(index.is_part_of_at(2, token));
            assert!(!index.is_part_of_at(3, token));
        }
    }

    #[test]
    fn test_compact_drops_empty_nodes() {
        let tree = create_tree();
        let mut index = DocumentIndex::new(&tree);
        let a = AnnotationHandle::new(1, 0, 2, id(&tree, "Word"));
        let b = AnnotationHandle::new(2, 5, 6, id(&tree, "Word"));
        index.add_annotation(a).unwrap();
        index.add_annotation(b).unwrap();
        index.remove_annotation(&a).unwrap();

        assert_eq!(index.stats().empty_nodes, 3);
        assert_eq!(index.compact(), 3);
        assert_eq!(index.offsets().collect::<Vec<_>>(), vec![5, 6]);
        assert!(index.begin_anchors_at(5, tree.root()).contains(&b));
    }

    #[test]
    fn test_nodes_in_range() {
        let tree = create_tree();
        let mut index = DocumentIndex::new(&tree);
        index
            .add_annotation(AnnotationHandle::new(1, 0, 4, id(&tree, "Word")))
            .unwrap();

        let offsets: Vec<usize> = index.nodes_in(1..3).map(|node| node.offset()).collect();
        assert_eq!(offsets, vec![1, 2]);
    }

    #[test]
    fn test_stats_by_mode() {
        let tree = create_tree();
        let word = id(&tree, "Word");
        let a = AnnotationHandle::new(1, 0, 1, word);

        let mut lazy = DocumentIndex::with_config(&tree, IndexConfig::low_memory());
        lazy.add_annotation(a).unwrap();
        let mut eager = DocumentIndex::with_config(&tree, IndexConfig::eager());
        eager.add_annotation(a).unwrap();

        let lazy_stats = lazy.stats();
        assert_eq!(lazy_stats.nodes, 2);
        assert_eq!(lazy_stats.begin_entries, 1);
        assert_eq!(lazy_stats.anchor_types, 2);
        assert_eq!(lazy_stats.part_of_entries, 1);

        // Word -> Token -> Annotation
        let eager_stats = eager.stats();
        assert_eq!(eager_stats.begin_entries, 3);
        assert_eq!(eager_stats.end_entries, 3);
        assert_eq!(eager_stats.anchor_types, 6);
        assert_eq!(eager_stats.part_of_entries, 3);
    }

    #[test]
    fn test_eager_reads_borrow_lazy_reads_assemble() {
        let tree = create_tree();
        let word = id(&tree, "Word");
        let a = AnnotationHandle::new(1, 0, 1, word);

        let mut eager = DocumentIndex::with_config(&tree, IndexConfig::eager());
        eager.add_annotation(a).unwrap();
        assert!(!eager.begin_anchors_at(0, tree.root()).is_owned());

        let mut lazy = DocumentIndex::new(&tree);
        lazy.add_annotation(a).unwrap();
        assert!(lazy.begin_anchors_at(0, tree.root()).is_owned());
    }

    #[test]
    fn test_snapshot_orders_offsets() {
        let tree = create_tree();
        let word = id(&tree, "Word");
        let mut index = DocumentIndex::new(&tree);
        index.add_annotation(AnnotationHandle::new(2, 4, 5, word)).unwrap();
        index.add_annotation(AnnotationHandle::new(1, 0, 1, word)).unwrap();

        let snapshot = index.snapshot();
        let offsets: Vec<usize> = snapshot.nodes.iter().map(|node| node.offset).collect();
        assert_eq!(offsets, vec![0, 1, 4, 5]);
        assert_eq!(snapshot.mode, PropagationMode::Lazy);
    }
}
