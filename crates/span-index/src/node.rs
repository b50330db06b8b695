//! Position nodes and the views handed out by the index.
//!
//! A position node records, for one text offset, which annotations begin
//! there, which end there, and how many annotations of each type cover it.
//! Callers never hold a node directly: reads go through [`NodeRef`] and
//! writes through [`NodeMut`], both of which carry the hierarchy and the
//! propagation mode of the owning index.

use std::collections::btree_map;

use span_hierarchy::{HierarchyTraverser, TypeId};

use crate::anchors::{AnchorSet, AnchorTable};
use crate::config::PropagationMode;
use crate::coverage::CoverageCounts;
use crate::traits::Annotation;

/// Everything a node operation needs from its index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'h> {
    pub(crate) traverser: HierarchyTraverser<'h>,
    pub(crate) mode: PropagationMode,
    pub(crate) set_capacity: usize,
}

/// Index bookkeeping for a single offset.
#[derive(Debug, Clone)]
pub(crate) struct PositionNode<A> {
    pub(crate) begin: AnchorTable<A>,
    pub(crate) end: AnchorTable<A>,
    pub(crate) part_of: CoverageCounts,
}

impl<A> Default for PositionNode<A> {
    fn default() -> Self {
        Self {
            begin: AnchorTable::default(),
            end: AnchorTable::default(),
            part_of: CoverageCounts::default(),
        }
    }
}

impl<A: Annotation> PositionNode<A> {
    /// True when the node holds no anchors and no coverage.
    pub(crate) fn is_empty(&self) -> bool {
        self.begin.is_empty() && self.end.is_empty() && self.part_of.is_empty()
    }
}

/// Read-only view of the node at one offset.
///
/// Offsets that were never written behave as an empty node: every anchor
/// set is empty and every part-of query is false. Obtaining a `NodeRef`
/// never creates a node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a, A> {
    offset: usize,
    node: Option<&'a PositionNode<A>>,
    scope: Scope<'a>,
}

impl<'a, A: Annotation> NodeRef<'a, A> {
    pub(crate) fn new(offset: usize, node: Option<&'a PositionNode<A>>, scope: Scope<'a>) -> Self {
        Self {
            offset,
            node,
            scope,
        }
    }

    /// Offset this view refers to.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if the index holds a node at this offset.
    pub fn exists(&self) -> bool {
        self.node.is_some()
    }

    /// Annotations beginning here whose type is `type_id` or a subtype.
    pub fn begin_anchors(&self, type_id: TypeId) -> AnchorSet<'a, A> {
        match self.node {
            Some(node) => node.begin.anchors(type_id, &self.scope),
            None => AnchorSet::empty(),
        }
    }

    /// Annotations ending here whose type is `type_id` or a subtype.
    pub fn end_anchors(&self, type_id: TypeId) -> AnchorSet<'a, A> {
        match self.node {
            Some(node) => node.end.anchors(type_id, &self.scope),
            None => AnchorSet::empty(),
        }
    }

    /// Returns true if some annotation of `type_id` (or a subtype) begins here.
    pub fn begins_with(&self, type_id: TypeId) -> bool {
        self.node
            .is_some_and(|node| node.begin.has_any(type_id, &self.scope))
    }

    /// Returns true if some annotation of `type_id` (or a subtype) ends here.
    pub fn ends_with(&self, type_id: TypeId) -> bool {
        self.node
            .is_some_and(|node| node.end.has_any(type_id, &self.scope))
    }

    /// Returns true if this offset is covered by an annotation of `type_id`
    /// or one of its subtypes.
    pub fn is_part_of(&self, type_id: TypeId) -> bool {
        self.node
            .is_some_and(|node| node.part_of.covers(type_id, &self.scope))
    }

    /// Number of covering annotations of `type_id` or any subtype.
    pub fn part_of_count(&self, type_id: TypeId) -> u32 {
        self.node
            .map_or(0, |node| node.part_of.total(type_id, &self.scope))
    }
}

/// Mutable view of the node at one offset.
///
/// Created by [`DocumentIndex::node_at_mut`](crate::DocumentIndex::node_at_mut),
/// which materializes the node if needed. Removals of pairs that were never
/// added are silent no-ops and report `false`.
#[derive(Debug)]
pub struct NodeMut<'a, A> {
    offset: usize,
    node: &'a mut PositionNode<A>,
    scope: Scope<'a>,
}

impl<'a, A: Annotation> NodeMut<'a, A> {
    pub(crate) fn new(offset: usize, node: &'a mut PositionNode<A>, scope: Scope<'a>) -> Self {
        Self {
            offset,
            node,
            scope,
        }
    }

    /// Offset this view refers to.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Records that `annotation` begins here with type `type_id`.
    ///
    /// Returns false if the pair was already recorded.
    pub fn add_begin(&mut self, annotation: A, type_id: TypeId) -> bool {
        self.node.begin.insert(annotation, type_id, &self.scope)
    }

    /// Records that `annotation` ends here with type `type_id`.
    ///
    /// Returns false if the pair was already recorded.
    pub fn add_end(&mut self, annotation: A, type_id: TypeId) -> bool {
        self.node.end.insert(annotation, type_id, &self.scope)
    }

    /// Undoes [`add_begin`](Self::add_begin) for the same pair.
    pub fn remove_begin(&mut self, annotation: &A, type_id: TypeId) -> bool {
        self.node.begin.remove(annotation, type_id, &self.scope)
    }

    /// Undoes [`add_end`](Self::add_end) for the same pair.
    pub fn remove_end(&mut self, annotation: &A, type_id: TypeId) -> bool {
        self.node.end.remove(annotation, type_id, &self.scope)
    }

    /// Records one more covering annotation of `type_id`.
    pub fn add_part_of(&mut self, type_id: TypeId) {
        self.node.part_of.increment(type_id, &self.scope);
    }

    /// Undoes one [`add_part_of`](Self::add_part_of). Counts never go below
    /// zero.
    pub fn remove_part_of(&mut self, type_id: TypeId) -> bool {
        self.node.part_of.decrement(type_id, &self.scope)
    }

    /// Read-only view of the same node.
    pub fn view(&self) -> NodeRef<'_, A> {
        NodeRef::new(self.offset, Some(&*self.node), self.scope)
    }
}

/// Iterator over materialized nodes in offset order.
///
/// Returned by [`DocumentIndex::nodes_in`](crate::DocumentIndex::nodes_in).
#[derive(Debug)]
pub struct Nodes<'a, A> {
    inner: btree_map::Range<'a, usize, PositionNode<A>>,
    scope: Scope<'a>,
}

impl<'a, A> Nodes<'a, A> {
    pub(crate) fn new(inner: btree_map::Range<'a, usize, PositionNode<A>>, scope: Scope<'a>) -> Self {
        Self { inner, scope }
    }
}

impl<'a, A: Annotation> Iterator for Nodes<'a, A> {
    type Item = NodeRef<'a, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = self.scope;
        self.inner
            .next()
            .map(|(&offset, node)| NodeRef::new(offset, Some(node), scope))
    }
}

impl<A: Annotation> DoubleEndedIterator for Nodes<'_, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let scope = self.scope;
        self.inner
            .next_back()
            .map(|(&offset, node)| NodeRef::new(offset, Some(node), scope))
    }
}
