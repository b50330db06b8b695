//! Descendant-list caching for hierarchy lookups.
//!
//! Lazy-mode index reads ask the hierarchy for every properly subsumed type
//! on each call. [`CachedHierarchy`] keeps the most recently used descendant
//! lists in a bounded LRU cache. Thread-safe using a `parking_lot::Mutex`.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::traits::TypeHierarchy;
use crate::TypeId;

/// Configuration for the descendant cache.
///
/// # Example
///
/// ```rust
/// use span_hierarchy::CacheConfig;
///
/// let cache = CacheConfig { max_entries: 256 };
/// assert_eq!(CacheConfig::default().max_entries, 1_024);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// Maximum number of cached descendant lists.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 1_024 }
    }
}

/// A hierarchy wrapper that caches `properly_subsumed_types` results.
///
/// Hierarchies are immutable for the lifetime of a document index, so cached
/// entries never expire; the LRU bound only limits memory.
///
/// # Example
///
/// ```rust
/// use span_hierarchy::{CachedHierarchy, CacheConfig, TypeHierarchy, TypeTree};
///
/// let mut builder = TypeTree::builder("Annotation");
/// let word = builder.declare("Word", "Annotation").unwrap();
/// let tree = builder.build();
///
/// let cached = CachedHierarchy::new(&tree, CacheConfig::default());
/// assert_eq!(cached.properly_subsumed_types(tree.root()), vec![word]);
/// assert_eq!(cached.properly_subsumed_types(tree.root()), vec![word]);
/// assert_eq!(cached.stats().hits, 1);
/// ```
pub struct CachedHierarchy<H> {
    inner: H,
    descendants: Mutex<LruCache<TypeId, Vec<TypeId>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<H: TypeHierarchy> CachedHierarchy<H> {
    /// Wraps a hierarchy with a descendant cache.
    pub fn new(inner: H, config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            descendants: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the wrapped hierarchy.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Returns the number of cached descendant lists.
    pub fn len(&self) -> usize {
        self.descendants.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all cached entries. Hit/miss counters are kept.
    pub fn clear(&self) {
        self.descendants.lock().clear();
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<H: TypeHierarchy> TypeHierarchy for CachedHierarchy<H> {
    fn parent_of(&self, type_id: TypeId) -> Option<TypeId> {
        self.inner.parent_of(type_id)
    }

    fn properly_subsumed_types(&self, type_id: TypeId) -> Vec<TypeId> {
        if let Some(cached) = self.descendants.lock().get(&type_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = self.inner.properly_subsumed_types(type_id);
        self.descendants.lock().put(type_id, computed.clone());
        computed
    }

    fn contains_type(&self, type_id: TypeId) -> bool {
        self.inner.contains_type(type_id)
    }

    fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_> {
        self.inner.all_types()
    }

    fn type_count(&self) -> usize {
        self.inner.type_count()
    }

    fn type_name(&self, type_id: TypeId) -> Option<&str> {
        self.inner.type_name(type_id)
    }
}

impl<H> std::fmt::Debug for CachedHierarchy<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedHierarchy")
            .field("entries", &self.descendants.lock().len())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

/// Statistics about the descendant cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached descendant lists.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups forwarded to the wrapped hierarchy.
    pub misses: u64,
}
