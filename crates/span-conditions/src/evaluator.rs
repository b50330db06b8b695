//! Runs conditions against one document index.

use std::time::Instant;

use span_index::{Annotation, DocumentIndex};
use tracing::debug;

use crate::condition::Condition;
use crate::config::EvaluatorConfig;
use crate::context::MatchContext;
use crate::result::{BatchEvaluation, EvaluatedCondition, EvaluationStats};

/// Evaluates conditions against a borrowed document index.
///
/// The evaluator only reads the index, so several evaluators (or a parallel
/// batch) can share one index.
///
/// # Example
///
/// ```rust
/// use span_conditions::{CoextensionCondition, Condition, ConditionEvaluator, MatchContext, PartOfCondition};
/// use span_hierarchy::TypeTree;
/// use span_index::{AnnotationHandle, DocumentIndex};
///
/// let mut builder = TypeTree::builder("Annotation");
/// let sentence = builder.declare("Sentence", "Annotation").unwrap();
/// let word = builder.declare("Word", "Annotation").unwrap();
/// let tree = builder.build();
///
/// let mut index = DocumentIndex::new(&tree);
/// let w = AnnotationHandle::new(1, 0, 4, word);
/// index.add_annotation(AnnotationHandle::new(0, 0, 20, sentence)).unwrap();
/// index.add_annotation(w).unwrap();
///
/// let evaluator = ConditionEvaluator::new(&index);
/// let is_word = CoextensionCondition::new(word);
/// let in_sentence = PartOfCondition::new(sentence);
/// let conditions: [&dyn Condition<AnnotationHandle>; 2] = [&is_word, &in_sentence];
///
/// assert!(evaluator.matches_all(&conditions, &MatchContext::for_annotation(w)));
/// ```
pub struct ConditionEvaluator<'i, 'h, A> {
    index: &'i DocumentIndex<'h, A>,
    config: EvaluatorConfig,
}

impl<'i, 'h, A: Annotation> ConditionEvaluator<'i, 'h, A> {
    /// Creates an evaluator with the default configuration.
    pub fn new(index: &'i DocumentIndex<'h, A>) -> Self {
        Self::with_config(index, EvaluatorConfig::default())
    }

    /// Creates an evaluator with custom configuration.
    pub fn with_config(index: &'i DocumentIndex<'h, A>, config: EvaluatorConfig) -> Self {
        Self { index, config }
    }

    /// Returns the index conditions are evaluated against.
    pub fn index(&self) -> &'i DocumentIndex<'h, A> {
        self.index
    }

    /// Returns a reference to the evaluator configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates one condition.
    pub fn evaluate<'c>(
        &self,
        condition: &'c dyn Condition<A>,
        context: &MatchContext<A>,
    ) -> EvaluatedCondition<'c, A> {
        condition.evaluate(context, self.index)
    }

    /// Evaluates every condition, in order, without short-circuiting.
    pub fn evaluate_all<'c>(
        &self,
        conditions: &[&'c dyn Condition<A>],
        context: &MatchContext<A>,
    ) -> Vec<EvaluatedCondition<'c, A>> {
        conditions
            .iter()
            .map(|condition| condition.evaluate(context, self.index))
            .collect()
    }

    /// Returns true if every condition holds, stopping at the first failure.
    ///
    /// An empty condition list holds.
    pub fn matches_all(&self, conditions: &[&dyn Condition<A>], context: &MatchContext<A>) -> bool {
        conditions
            .iter()
            .all(|condition| condition.evaluate(context, self.index).value())
    }

    /// Evaluates one condition against many contexts.
    ///
    /// Results are in context order. With the `parallel` feature and
    /// [`EvaluatorConfig::parallel`] set, batches of at least
    /// [`EvaluatorConfig::parallel_threshold`] contexts run on the rayon pool.
    pub fn evaluate_batch<'c>(
        &self,
        condition: &'c dyn Condition<A>,
        contexts: &[MatchContext<A>],
    ) -> BatchEvaluation<'c, A> {
        let start = Instant::now();
        let results = self.run_batch(condition, contexts);
        let passed = results.iter().filter(|result| result.value()).count();
        let stats = EvaluationStats::new(start.elapsed(), results.len(), passed);

        debug!(
            condition = condition.name(),
            evaluated = stats.evaluated,
            passed = stats.passed,
            duration_us = stats.duration.as_micros() as u64,
            "evaluated condition batch"
        );
        BatchEvaluation { results, stats }
    }

    #[cfg(feature = "parallel")]
    fn run_batch<'c>(
        &self,
        condition: &'c dyn Condition<A>,
        contexts: &[MatchContext<A>],
    ) -> Vec<EvaluatedCondition<'c, A>> {
        use rayon::prelude::*;

        if self.config.parallel && contexts.len() >= self.config.parallel_threshold {
            let index = self.index;
            return contexts
                .par_iter()
                .map(|context| condition.evaluate(context, index))
                .collect();
        }
        self.run_sequential(condition, contexts)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_batch<'c>(
        &self,
        condition: &'c dyn Condition<A>,
        contexts: &[MatchContext<A>],
    ) -> Vec<EvaluatedCondition<'c, A>> {
        self.run_sequential(condition, contexts)
    }

    fn run_sequential<'c>(
        &self,
        condition: &'c dyn Condition<A>,
        contexts: &[MatchContext<A>],
    ) -> Vec<EvaluatedCondition<'c, A>> {
        contexts
            .iter()
            .map(|context| condition.evaluate(context, self.index))
            .collect()
    }
}

impl<A> std::fmt::Debug for ConditionEvaluator<'_, '_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionEvaluator")
            .field("config", &self.config)
            .finish()
    }
}
