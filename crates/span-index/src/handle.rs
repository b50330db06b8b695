//! A self-describing annotation handle.

use span_hierarchy::TypeId;

use crate::traits::Annotation;

/// An annotation handle that carries its own span and type.
///
/// Useful when the host store hands out plain ids and the span is known at
/// registration time. Equality includes the id, so two distinct annotations
/// over the same span stay distinct in the index.
///
/// # Example
///
/// ```rust
/// use span_hierarchy::TypeId;
/// use span_index::{Annotation, AnnotationHandle};
///
/// let word = AnnotationHandle::new(1, 0, 7, TypeId::new(3));
/// assert_eq!(word.begin(), 0);
/// assert_eq!(word.end(), 7);
/// assert_eq!(word.id(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationHandle {
    id: u32,
    begin: usize,
    end: usize,
    type_id: TypeId,
}

impl AnnotationHandle {
    /// Creates a handle for annotation `id` spanning `begin..end`.
    pub fn new(id: u32, begin: usize, end: usize, type_id: TypeId) -> Self {
        Self {
            id,
            begin,
            end,
            type_id,
        }
    }

    /// Returns the host id of the annotation.
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Annotation for AnnotationHandle {
    fn begin(&self) -> usize {
        self.begin
    }

    fn end(&self) -> usize {
        self.end
    }

    fn type_id(&self) -> TypeId {
        self.type_id
    }
}
