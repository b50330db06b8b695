//! # span-conditions
//!
//! Condition evaluation over a [`span_index::DocumentIndex`].
//!
//! This crate provides:
//! - **[`Condition`]**: the uniform contract a rule scheduler invokes
//! - **[`MatchContext`]**: the current candidate annotation, possibly absent
//! - **[`EvaluatedCondition`]**: the condition that ran plus its outcome
//! - **[`CoextensionCondition`]** (`IS`): exact span match against a type or type list
//! - **[`PartOfCondition`]** (`PARTOF`): containment in a type or type list
//! - **[`ConditionEvaluator`]**: ordered, short-circuit and batch evaluation
//!
//! Every condition evaluates to `false` when the context has no current
//! annotation; evaluation never fails.
//!
//! ## Usage
//!
//! ```rust
//! use span_conditions::{CoextensionCondition, Condition, MatchContext};
//! use span_hierarchy::TypeTree;
//! use span_index::{AnnotationHandle, DocumentIndex, IndexConfig};
//!
//! let mut builder = TypeTree::builder("Annotation");
//! let concept = builder.declare("Concept", "Annotation").unwrap();
//! let word = builder.declare("Word", "Annotation").unwrap();
//! let tree = builder.build();
//!
//! let mut index = DocumentIndex::with_config(&tree, IndexConfig::eager());
//! index.add_annotation(AnnotationHandle::new(1, 0, 8, concept)).unwrap();
//!
//! let is_concept = CoextensionCondition::new(concept);
//! let y = AnnotationHandle::new(2, 0, 7, word);
//! assert!(!is_concept.evaluate(&MatchContext::for_annotation(y), &index).value());
//! assert!(!is_concept.evaluate(&MatchContext::empty(), &index).value());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Evaluates large batches on the rayon thread pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod coextension;
mod condition;
mod config;
mod context;
mod evaluator;
mod part_of;
mod result;

pub use coextension::CoextensionCondition;
pub use condition::{Condition, TypeTarget};
pub use config::{EvaluatorConfig, EvaluatorConfigBuilder};
pub use context::MatchContext;
pub use evaluator::ConditionEvaluator;
pub use part_of::PartOfCondition;
pub use result::{BatchEvaluation, EvaluatedCondition, EvaluationStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _: Option<EvaluatorConfig> = None;
        let _: Option<EvaluationStats> = None;
        let _: Option<TypeTarget> = None;
        let _ = MatchContext::<u32>::empty();
    }
}
