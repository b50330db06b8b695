//! The match context handed to conditions.

/// The state a condition is evaluated against: the current candidate
/// annotation, or none.
///
/// An empty context is a normal situation (e.g. a rule element that matched
/// nothing). Every condition evaluates to `false` against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchContext<A> {
    annotation: Option<A>,
}

impl<A: Copy> MatchContext<A> {
    /// Creates a context from a possibly absent annotation.
    pub fn new(annotation: Option<A>) -> Self {
        Self { annotation }
    }

    /// Creates a context whose current annotation is `annotation`.
    pub fn for_annotation(annotation: A) -> Self {
        Self::new(Some(annotation))
    }

    /// Creates a context with no current annotation.
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Returns the current annotation, if any.
    pub fn annotation(&self) -> Option<A> {
        self.annotation
    }

    /// Returns true if there is no current annotation.
    pub fn is_empty(&self) -> bool {
        self.annotation.is_none()
    }
}

impl<A: Copy> Default for MatchContext<A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A: Copy> From<Option<A>> for MatchContext<A> {
    fn from(annotation: Option<A>) -> Self {
        Self::new(annotation)
    }
}
