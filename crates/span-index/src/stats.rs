//! Statistics about a document index.

use std::fmt;

use crate::config::PropagationMode;

/// Statistics about a document index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexStats {
    /// Propagation mode of the index.
    pub mode: PropagationMode,
    /// Number of materialized position nodes.
    pub nodes: usize,
    /// Nodes holding no anchors and no coverage (removable by `compact`).
    pub empty_nodes: usize,
    /// Total (type, annotation) entries in begin tables.
    pub begin_entries: usize,
    /// Total (type, annotation) entries in end tables.
    pub end_entries: usize,
    /// Total type keys across begin and end tables.
    pub anchor_types: usize,
    /// Total type keys with a positive part-of count.
    pub part_of_entries: usize,
}

impl IndexStats {
    /// Average number of anchor entries per node, begin and end combined.
    pub fn avg_entries_per_node(&self) -> f64 {
        if self.nodes == 0 {
            return 0.0;
        }
        (self.begin_entries + self.end_entries) as f64 / self.nodes as f64
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Document Index Statistics:")?;
        writeln!(f, "  Mode: {:?}", self.mode)?;
        writeln!(f, "  Nodes: {} ({} empty)", self.nodes, self.empty_nodes)?;
        writeln!(f, "  Begin entries: {}", self.begin_entries)?;
        writeln!(f, "  End entries: {}", self.end_entries)?;
        writeln!(f, "  Anchor type keys: {}", self.anchor_types)?;
        writeln!(f, "  Part-of entries: {}", self.part_of_entries)?;
        write!(f, "  Avg entries/node: {:.2}", self.avg_entries_per_node())
    }
}
