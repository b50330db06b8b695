//! Cost profile of a hierarchy as seen by the two propagation modes.

use std::fmt;

/// Statistics about the subsumption closure.
///
/// An eager index pays `depth + 1` key writes per registration, a lazy
/// index pays `descendants + 1` key lookups per read. These numbers bound
/// both.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosureStats {
    /// Number of types in the closure.
    pub type_count: usize,
    /// Types with no subtypes.
    pub leaf_count: usize,
    /// Maximum depth of the hierarchy (root = 0).
    pub max_depth: usize,
    /// Largest number of proper descendants below one type.
    pub widest_subtree: usize,
    /// Average number of ancestors per type.
    pub avg_ancestors: f64,
    /// Average number of descendants per type.
    pub avg_descendants: f64,
    /// Type ids held across ancestor chains, ancestor sets and descendant lists.
    pub stored_ids: usize,
    /// Time taken to build the closure in microseconds.
    pub build_time_us: u64,
}

impl ClosureStats {
    /// Worst-case keys touched by one eager registration.
    pub fn max_eager_writes(&self) -> usize {
        self.max_depth + 1
    }

    /// Worst-case keys consulted by one lazy read.
    pub fn max_lazy_reads(&self) -> usize {
        self.widest_subtree + 1
    }
}

impl fmt::Display for ClosureStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Subsumption closure: {} types ({} leaves)",
            self.type_count, self.leaf_count
        )?;
        writeln!(
            f,
            "  Eager write keys: max {}, avg {:.1}",
            self.max_eager_writes(),
            self.avg_ancestors + 1.0
        )?;
        writeln!(
            f,
            "  Lazy read keys:   max {}, avg {:.1}",
            self.max_lazy_reads(),
            self.avg_descendants + 1.0
        )?;
        writeln!(f, "  Stored ids:       {}", self.stored_ids)?;
        write!(f, "  Built in {}us", self.build_time_us)
    }
}
