//! Configuration types for the condition evaluator.

/// Configuration for the condition evaluator.
///
/// # Example
///
/// ```rust
/// use span_conditions::EvaluatorConfig;
///
/// let config = EvaluatorConfig::builder()
///     .with_parallel(true)
///     .with_parallel_threshold(1_000)
///     .build();
///
/// assert!(config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Evaluate batches on the rayon pool (requires `parallel` feature).
    pub parallel: bool,
    /// Smallest batch that is worth splitting across threads.
    pub parallel_threshold: usize,
}

impl EvaluatorConfig {
    /// Creates a new builder for EvaluatorConfig.
    pub fn builder() -> EvaluatorConfigBuilder {
        EvaluatorConfigBuilder::default()
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_threshold: 256,
        }
    }
}

/// Builder for EvaluatorConfig.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfigBuilder {
    parallel: Option<bool>,
    parallel_threshold: Option<usize>,
}

impl EvaluatorConfigBuilder {
    /// Enables or disables parallel batch evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Sets the smallest batch evaluated in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    /// Builds the EvaluatorConfig.
    pub fn build(self) -> EvaluatorConfig {
        let defaults = EvaluatorConfig::default();
        EvaluatorConfig {
            parallel: self.parallel.unwrap_or(defaults.parallel),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
        }
    }
}
