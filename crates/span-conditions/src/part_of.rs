//! The part-of (`PARTOF`) condition.

use span_hierarchy::TypeId;
use span_index::{Annotation, DocumentIndex};
use tracing::trace;

use crate::condition::{Condition, TypeTarget};
use crate::context::MatchContext;
use crate::result::EvaluatedCondition;

/// Holds when the current annotation's begin offset lies inside an
/// annotation of the target type (or a subtype).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartOfCondition {
    target: TypeTarget,
}

impl PartOfCondition {
    /// Creates a condition against a single type.
    pub fn new(type_id: TypeId) -> Self {
        Self {
            target: TypeTarget::Single(type_id),
        }
    }

    /// Creates a condition against a list of types (logical OR).
    pub fn any_of(types: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            target: TypeTarget::List(types.into_iter().collect()),
        }
    }

    /// Returns the target type or types.
    pub fn target(&self) -> &TypeTarget {
        &self.target
    }
}

impl<A: Annotation> Condition<A> for PartOfCondition {
    fn name(&self) -> &str {
        "PARTOF"
    }

    fn evaluate<'c>(
        &'c self,
        context: &MatchContext<A>,
        index: &DocumentIndex<'_, A>,
    ) -> EvaluatedCondition<'c, A> {
        let value = context.annotation().is_some_and(|current| {
            let node = index.node_at(current.begin());
            self.target.any(|&type_id| node.is_part_of(type_id))
        });
        trace!(target_types = ?self.target.types(), value, "evaluated part-of");
        EvaluatedCondition::new(self, value)
    }
}
