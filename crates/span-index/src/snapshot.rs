//! Ordered, comparable dumps of index contents.
//!
//! Snapshots list what a caller can observe: stored anchor sets and part-of
//! counts per offset. Empty nodes are omitted, so two indexes that answer
//! every query identically (in the same mode) produce equal snapshots.

use span_hierarchy::TypeId;

use crate::config::PropagationMode;

/// Stored contents of one non-empty node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSnapshot<A> {
    /// Offset of the node.
    pub offset: usize,
    /// Begin sets, sorted by type then annotation.
    pub begin: Vec<(TypeId, Vec<A>)>,
    /// End sets, sorted by type then annotation.
    pub end: Vec<(TypeId, Vec<A>)>,
    /// Positive part-of counts, sorted by type.
    pub part_of: Vec<(TypeId, u32)>,
}

/// Stored contents of a whole index, ordered by offset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexSnapshot<A> {
    /// Propagation mode the contents were stored under.
    pub mode: PropagationMode,
    /// Non-empty nodes in ascending offset order.
    pub nodes: Vec<NodeSnapshot<A>>,
}

impl<A> IndexSnapshot<A> {
    /// Returns the snapshot of the node at `offset`, if it is non-empty.
    pub fn node(&self, offset: usize) -> Option<&NodeSnapshot<A>> {
        self.nodes
            .binary_search_by_key(&offset, |node| node.offset)
            .ok()
            .map(|position| &self.nodes[position])
    }

    /// Returns true if no node holds anything.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
