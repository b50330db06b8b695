//! Part-of counts: how many annotations of a type cover a position.

use hashbrown::HashMap;
use span_hierarchy::TypeId;

use crate::config::PropagationMode;
use crate::node::Scope;

/// Coverage counters for one position.
///
/// `counts` holds direct increments in lazy mode and propagated totals in
/// eager mode. `direct` is only written in eager mode. Zero entries are
/// removed, so every stored count is positive.
#[derive(Debug, Clone, Default)]
pub(crate) struct CoverageCounts {
    counts: HashMap<TypeId, u32>,
    direct: HashMap<TypeId, u32>,
}

impl CoverageCounts {
    pub(crate) fn increment(&mut self, type_id: TypeId, scope: &Scope<'_>) {
        match scope.mode {
            PropagationMode::Lazy => {
                *self.counts.entry(type_id).or_insert(0) += 1;
            }
            PropagationMode::Eager => {
                *self.direct.entry(type_id).or_insert(0) += 1;
                for target in scope.traverser.ancestors_or_self(type_id) {
                    *self.counts.entry(target).or_insert(0) += 1;
                }
            }
        }
    }

    /// Undoes one `increment`. Returns false (and changes nothing) if no
    /// increment of `type_id` is outstanding.
    pub(crate) fn decrement(&mut self, type_id: TypeId, scope: &Scope<'_>) -> bool {
        match scope.mode {
            PropagationMode::Lazy => decrement_entry(&mut self.counts, type_id),
            PropagationMode::Eager => {
                if !decrement_entry(&mut self.direct, type_id) {
                    return false;
                }
                for target in scope.traverser.ancestors_or_self(type_id) {
                    decrement_entry(&mut self.counts, target);
                }
                true
            }
        }
    }

    pub(crate) fn covers(&self, type_id: TypeId, scope: &Scope<'_>) -> bool {
        if self.counts.contains_key(&type_id) {
            return true;
        }
        match scope.mode {
            PropagationMode::Eager => false,
            PropagationMode::Lazy => {
                !self.counts.is_empty()
                    && scope
                        .traverser
                        .descendants(type_id)
                        .iter()
                        .any(|descendant| self.counts.contains_key(descendant))
            }
        }
    }

    /// Number of covering annotations of `type_id` or any subtype.
    pub(crate) fn total(&self, type_id: TypeId, scope: &Scope<'_>) -> u32 {
        let own = self.counts.get(&type_id).copied().unwrap_or(0);
        match scope.mode {
            PropagationMode::Eager => own,
            PropagationMode::Lazy => {
                if self.counts.is_empty() {
                    return own;
                }
                scope
                    .traverser
                    .descendants(type_id)
                    .iter()
                    .filter_map(|descendant| self.counts.get(descendant))
                    .fold(own, |sum, count| sum.saturating_add(*count))
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub(crate) fn type_count(&self) -> usize {
        self.counts.len()
    }

    pub(crate) fn sorted_entries(&self) -> Vec<(TypeId, u32)> {
        let mut entries: Vec<(TypeId, u32)> =
            self.counts.iter().map(|(&type_id, &count)| (type_id, count)).collect();
        entries.sort_unstable_by_key(|(type_id, _)| *type_id);
        entries
    }
}

fn decrement_entry(map: &mut HashMap<TypeId, u32>, type_id: TypeId) -> bool {
    match map.get_mut(&type_id) {
        Some(count) if *count > 0 => {
            *count -= 1;
            if *count == 0 {
                map.remove(&type_id);
            }
            true
        }
        _ => false,
    }
}
