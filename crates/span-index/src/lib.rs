//! # span-index
//!
//! Per-offset index of typed span annotations.
//!
//! For every text offset that has been written to, a [`DocumentIndex`]
//! records which annotations begin there, which end there, and how many
//! annotations of each type cover it. All lookups honor type subsumption:
//! asking for `Token` also finds every `Word`.
//!
//! ## Propagation modes
//!
//! | Mode | Write cost | Read cost | Memory |
//! |------|------------|-----------|--------|
//! | [`PropagationMode::Eager`] | ancestors of the type | one lookup | entry per ancestor |
//! | [`PropagationMode::Lazy`] | one entry | union over subtypes | entry per registration |
//!
//! Both modes answer every query identically; only cost differs.
//!
//! ## Usage
//!
//! ```rust
//! use span_hierarchy::TypeTree;
//! use span_index::{AnnotationHandle, DocumentIndex};
//!
//! let mut builder = TypeTree::builder("Annotation");
//! let token = builder.declare("Token", "Annotation").unwrap();
//! let word = builder.declare("Word", "Token").unwrap();
//! let tree = builder.build();
//!
//! let mut index = DocumentIndex::new(&tree);
//! let w = AnnotationHandle::new(1, 0, 7, word);
//! index.add_annotation(w).unwrap();
//!
//! assert!(index.node_at(0).begins_with(token));
//! assert!(index.end_anchors_at(7, token).contains(&w));
//! assert!(index.is_part_of_at(3, token));
//! ```
//!
//! Node-level writes are available through [`DocumentIndex::node_at_mut`]
//! for callers that maintain anchors themselves.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod anchors;
mod config;
mod coverage;
mod error;
mod handle;
mod index;
mod node;
mod snapshot;
mod stats;
mod traits;

pub use anchors::AnchorSet;
pub use config::{IndexConfig, IndexConfigBuilder, PropagationMode};
pub use error::{IndexError, IndexResult};
pub use handle::AnnotationHandle;
pub use index::DocumentIndex;
pub use node::{NodeMut, NodeRef, Nodes};
pub use snapshot::{IndexSnapshot, NodeSnapshot};
pub use stats::IndexStats;
pub use traits::Annotation;
