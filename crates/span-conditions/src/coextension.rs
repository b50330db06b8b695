//! The co-extension (`IS`) condition.

use span_hierarchy::TypeId;
use span_index::{AnchorSet, Annotation, DocumentIndex};
use tracing::trace;

use crate::condition::{Condition, TypeTarget};
use crate::context::MatchContext;
use crate::result::EvaluatedCondition;

/// Holds when an annotation of the target type (or a subtype) covers exactly
/// the same span as the current annotation.
///
/// Candidates are the begin anchors at the current annotation's begin
/// offset, so only one node is consulted. With a type list, types are tried
/// in order and the first co-extensive candidate decides.
///
/// # Example
///
/// ```rust
/// use span_conditions::{CoextensionCondition, Condition, MatchContext};
/// use span_hierarchy::TypeTree;
/// use span_index::{AnnotationHandle, DocumentIndex};
///
/// let mut builder = TypeTree::builder("Annotation");
/// let concept = builder.declare("Concept", "Annotation").unwrap();
/// let word = builder.declare("Word", "Annotation").unwrap();
/// let tree = builder.build();
///
/// let mut index = DocumentIndex::new(&tree);
/// index.add_annotation(AnnotationHandle::new(1, 0, 8, concept)).unwrap();
///
/// let is_concept = CoextensionCondition::new(concept);
/// let current = MatchContext::for_annotation(AnnotationHandle::new(2, 0, 8, word));
/// assert!(is_concept.evaluate(&current, &index).value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoextensionCondition {
    target: TypeTarget,
}

impl CoextensionCondition {
    /// Creates a condition against a single type.
    pub fn new(type_id: TypeId) -> Self {
        Self::with_target(TypeTarget::Single(type_id))
    }

    /// Creates a condition against a list of types (logical OR).
    pub fn any_of(types: impl IntoIterator<Item = TypeId>) -> Self {
        Self::with_target(TypeTarget::List(types.into_iter().collect()))
    }

    /// Creates a condition against the given target.
    pub fn with_target(target: TypeTarget) -> Self {
        Self { target }
    }

    /// Returns the target type or types.
    pub fn target(&self) -> &TypeTarget {
        &self.target
    }

    /// Returns the first indexed annotation co-extensive with the current
    /// one, or `None` if the condition does not hold.
    ///
    /// The current annotation itself counts if it is indexed under a target
    /// type.
    pub fn find_witness<A: Annotation>(
        &self,
        context: &MatchContext<A>,
        index: &DocumentIndex<'_, A>,
    ) -> Option<A> {
        let current = context.annotation()?;
        let node = index.node_at(current.begin());
        self.target
            .find_map(|&type_id| first_coextensive(&node.begin_anchors(type_id), &current))
    }
}

fn first_coextensive<A: Annotation>(candidates: &AnchorSet<'_, A>, current: &A) -> Option<A> {
    candidates
        .iter()
        .find(|candidate| candidate.is_coextensive_with(current))
        .copied()
}

impl<A: Annotation> Condition<A> for CoextensionCondition {
    fn name(&self) -> &str {
        "IS"
    }

    fn evaluate<'c>(
        &'c self,
        context: &MatchContext<A>,
        index: &DocumentIndex<'_, A>,
    ) -> EvaluatedCondition<'c, A> {
        let witness = self.find_witness(context, index);
        trace!(target_types = ?self.target.types(), ?witness, "evaluated co-extension");
        EvaluatedCondition::new(self, witness.is_some())
    }
}
