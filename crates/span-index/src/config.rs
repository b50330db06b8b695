//! Configuration types for the document index.

/// Where the index pays for type subsumption.
///
/// The mode is fixed when a [`DocumentIndex`](crate::DocumentIndex) is
/// created; there is no way to change it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PropagationMode {
    /// Low-memory profile: writes touch one type entry, reads union the
    /// entries of every properly subsumed type.
    #[default]
    Lazy,
    /// Writes also register under every ancestor type, reads are a single
    /// map lookup.
    Eager,
}

impl PropagationMode {
    /// Returns true for [`PropagationMode::Eager`].
    pub fn is_eager(self) -> bool {
        matches!(self, Self::Eager)
    }
}

/// Configuration for a document index.
///
/// # Example
///
/// ```rust
/// use span_index::{IndexConfig, PropagationMode};
///
/// let config = IndexConfig::builder()
///     .with_eager_propagation(true)
///     .with_initial_set_capacity(4)
///     .build();
///
/// assert_eq!(config.propagation, PropagationMode::Eager);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndexConfig {
    /// Subsumption propagation mode (default: lazy).
    pub propagation: PropagationMode,
    /// Initial capacity of each per-type anchor set.
    pub initial_set_capacity: usize,
}

impl IndexConfig {
    /// Creates a new builder for IndexConfig.
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Default configuration with eager propagation.
    pub fn eager() -> Self {
        Self::builder().with_propagation(PropagationMode::Eager).build()
    }

    /// Default configuration with the low-memory (lazy) profile.
    pub fn low_memory() -> Self {
        Self::default()
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            propagation: PropagationMode::Lazy,
            initial_set_capacity: 2,
        }
    }
}

/// Builder for IndexConfig.
#[derive(Debug, Clone)]
pub struct IndexConfigBuilder {
    propagation: PropagationMode,
    initial_set_capacity: usize,
}

impl Default for IndexConfigBuilder {
    fn default() -> Self {
        let defaults = IndexConfig::default();
        Self {
            propagation: defaults.propagation,
            initial_set_capacity: defaults.initial_set_capacity,
        }
    }
}

impl IndexConfigBuilder {
    /// Sets the propagation mode.
    pub fn with_propagation(mut self, propagation: PropagationMode) -> Self {
        self.propagation = propagation;
        self
    }

    /// Enables eager propagation (`true`) or the low-memory profile (`false`).
    pub fn with_eager_propagation(mut self, eager: bool) -> Self {
        self.propagation = if eager {
            PropagationMode::Eager
        } else {
            PropagationMode::Lazy
        };
        self
    }

    /// Sets the initial capacity of each per-type anchor set.
    pub fn with_initial_set_capacity(mut self, capacity: usize) -> Self {
        self.initial_set_capacity = capacity;
        self
    }

    /// Builds the IndexConfig.
    pub fn build(self) -> IndexConfig {
        IndexConfig {
            propagation: self.propagation,
            initial_set_capacity: self.initial_set_capacity,
        }
    }
}
