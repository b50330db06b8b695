//! The condition evaluation protocol.
//!
//! A rule scheduler holds conditions as `dyn Condition<A>` and invokes them
//! without knowing their concrete kind. Conditions read the index and never
//! modify it: [`Condition::evaluate`] only receives `&DocumentIndex`.
//!
//! # Example: Implementing a condition
//!
//! ```rust
//! use span_conditions::{Condition, EvaluatedCondition, MatchContext};
//! use span_index::{Annotation, DocumentIndex};
//!
//! /// Passes when the current annotation is empty.
//! #[derive(Debug)]
//! struct EmptySpan;
//!
//! impl<A: Annotation> Condition<A> for EmptySpan {
//!     fn name(&self) -> &str {
//!         "EMPTY"
//!     }
//!
//!     fn evaluate<'c>(
//!         &'c self,
//!         context: &MatchContext<A>,
//!         _index: &DocumentIndex<'_, A>,
//!     ) -> EvaluatedCondition<'c, A> {
//!         let value = context
//!             .annotation()
//!             .is_some_and(|current| current.begin() == current.end());
//!         EvaluatedCondition::new(self, value)
//!     }
//! }
//! ```

use std::fmt;
use std::slice;

use span_hierarchy::TypeId;
use span_index::{Annotation, DocumentIndex};

use crate::context::MatchContext;
use crate::result::EvaluatedCondition;

/// A rule condition evaluated against the current match and a document
/// index.
///
/// Implementations must return `false` when the context has no current
/// annotation.
pub trait Condition<A: Annotation>: fmt::Debug + Send + Sync {
    /// Short name of the condition kind, used in logs.
    fn name(&self) -> &str;

    /// Evaluates the condition.
    fn evaluate<'c>(
        &'c self,
        context: &MatchContext<A>,
        index: &DocumentIndex<'_, A>,
    ) -> EvaluatedCondition<'c, A>;
}

/// The type argument of a condition: one type, or a list of types
/// combined with logical OR.
///
/// Both shapes are consumed through [`types`](Self::types), so a condition
/// needs a single scan routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTarget {
    /// A single target type.
    Single(TypeId),
    /// Several target types, tried in list order.
    List(Vec<TypeId>),
}

impl TypeTarget {
    /// Target types in evaluation order.
    pub fn types(&self) -> &[TypeId] {
        match self {
            Self::Single(type_id) => slice::from_ref(type_id),
            Self::List(types) => types,
        }
    }

    /// Returns true if `predicate` holds for some target type, trying types
    /// in order and stopping at the first hit.
    pub fn any(&self, predicate: impl FnMut(&TypeId) -> bool) -> bool {
        self.types().iter().any(predicate)
    }

    /// Returns the first `Some` produced for a target type, in order.
    pub fn find_map<T>(&self, f: impl FnMut(&TypeId) -> Option<T>) -> Option<T> {
        self.types().iter().find_map(f)
    }

    /// Returns true for an empty list, which no annotation can satisfy.
    pub fn is_empty(&self) -> bool {
        self.types().is_empty()
    }
}

impl From<TypeId> for TypeTarget {
    fn from(type_id: TypeId) -> Self {
        Self::Single(type_id)
    }
}

impl From<Vec<TypeId>> for TypeTarget {
    fn from(types: Vec<TypeId>) -> Self {
        Self::List(types)
    }
}
