//! Evaluation result types.

use std::fmt;
use std::time::Duration;

use span_index::Annotation;

use crate::condition::Condition;

/// Outcome of evaluating one condition: which condition, and whether it
/// held.
///
/// Holds a reference to the condition rather than a copy, so results can be
/// traced back to the rule element that produced them.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatedCondition<'c, A: Annotation> {
    condition: &'c dyn Condition<A>,
    value: bool,
}

impl<'c, A: Annotation> EvaluatedCondition<'c, A> {
    /// Creates a result for `condition`.
    pub fn new(condition: &'c dyn Condition<A>, value: bool) -> Self {
        Self { condition, value }
    }

    /// The condition that was evaluated.
    pub fn condition(&self) -> &'c dyn Condition<A> {
        self.condition
    }

    /// Name of the evaluated condition.
    pub fn name(&self) -> &'c str {
        self.condition.name()
    }

    /// Whether the condition held.
    pub fn value(&self) -> bool {
        self.value
    }
}

/// Statistics from a batch evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    /// Total evaluation duration.
    pub duration: Duration,
    /// Number of contexts evaluated.
    pub evaluated: usize,
    /// Number of contexts for which the condition held.
    pub passed: usize,
}

impl EvaluationStats {
    /// Creates new evaluation stats.
    pub fn new(duration: Duration, evaluated: usize, passed: usize) -> Self {
        Self {
            duration,
            evaluated,
            passed,
        }
    }

    /// Fraction of contexts that passed (0.0 for an empty batch).
    pub fn pass_rate(&self) -> f64 {
        if self.evaluated == 0 {
            return 0.0;
        }
        self.passed as f64 / self.evaluated as f64
    }
}

impl fmt::Display for EvaluationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} passed in {:?}",
            self.passed, self.evaluated, self.duration
        )
    }
}

/// Results of one condition over many contexts, in context order.
#[derive(Debug, Clone)]
pub struct BatchEvaluation<'c, A: Annotation> {
    /// One result per context.
    pub results: Vec<EvaluatedCondition<'c, A>>,
    /// Batch statistics.
    pub stats: EvaluationStats,
}

impl<'c, A: Annotation> BatchEvaluation<'c, A> {
    /// Outcomes only, in context order.
    pub fn values(&self) -> Vec<bool> {
        self.results.iter().map(EvaluatedCondition::value).collect()
    }
}
