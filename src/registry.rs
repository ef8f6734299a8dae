//! Pattern registry.
//!
//! Holds the current tree of granted patterns and answers match queries
//! against it. Updates build a new tree and swap the root; a query works on
//! whichever snapshot it obtained.

use std::num::NonZeroUsize;
use std::path::Path;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;

use crate::error::Result;
use crate::matcher::KeyMatcher;
use crate::parser::{parse_patterns, parse_patterns_from_file, validate_pattern};
use crate::tree::Tree;
use crate::types::PatternKind;

/// Default LRU cache size
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Registry options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryOptions {
    /// LRU cache size for match results; 0 disables caching
    pub cache_size: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl RegistryOptions {
    /// Create new registry options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Read options from a JSON object, e.g. `{"cache_size": 4096}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Registry of granted patterns with an optional match cache.
pub struct PatternRegistry {
    tree: RwLock<Tree<PatternKind>>,
    cache: Option<Mutex<LruCache<String, bool>>>,
}

impl std::fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("len", &self.len())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

impl PatternRegistry {
    /// Create an empty registry.
    pub fn new(options: RegistryOptions) -> Self {
        let cache =
            NonZeroUsize::new(options.cache_size).map(|size| Mutex::new(LruCache::new(size)));
        Self {
            tree: RwLock::new(Tree::new()),
            cache,
        }
    }

    /// Create a registry from a list of patterns.
    pub fn from_patterns<I, S>(patterns: I, options: RegistryOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Tree::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let kind = validate_pattern(pattern)?;
            tree = tree.insert(pattern.as_bytes(), kind).0;
        }
        tracing::debug!(patterns = tree.len(), "pattern registry built");

        let registry = Self::new(options);
        *registry.tree.write() = tree;
        Ok(registry)
    }

    /// Create a registry from pattern list text.
    pub fn from_text(text: &str, options: RegistryOptions) -> Result<Self> {
        let patterns = parse_patterns(text)?;
        Self::from_patterns(patterns.iter().map(|p| p.pattern.as_str()), options)
    }

    /// Create a registry from a pattern list file.
    pub fn from_file(path: impl AsRef<Path>, options: RegistryOptions) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading pattern file");
        let patterns = parse_patterns_from_file(path)?;
        Self::from_patterns(patterns.iter().map(|p| p.pattern.as_str()), options)
    }

    /// Grant a pattern. Returns `true` if it was not registered before.
    pub fn register(&self, pattern: &str) -> Result<bool> {
        let kind = validate_pattern(pattern)?;

        let mut tree = self.tree.write();
        let (updated, replaced) = tree.insert(pattern.as_bytes(), kind);
        *tree = updated;
        self.clear_cache();

        tracing::debug!(pattern, ?kind, "pattern registered");
        Ok(!replaced)
    }

    /// Revoke a pattern. Returns `true` if it was registered.
    pub fn revoke(&self, pattern: &str) -> bool {
        let mut tree = self.tree.write();
        let Some(updated) = tree.delete(pattern.as_bytes()) else {
            return false;
        };
        *tree = updated;
        self.clear_cache();

        tracing::debug!(pattern, "pattern revoked");
        true
    }

    /// Check if exactly this pattern is registered.
    pub fn contains(&self, pattern: &str) -> bool {
        self.tree.read().contains_key(pattern.as_bytes())
    }

    /// Kind of a registered pattern.
    pub fn kind(&self, pattern: &str) -> Option<PatternKind> {
        self.tree.read().get(pattern.as_bytes()).copied()
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// Check if no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Current tree snapshot. Later updates do not affect it.
    pub fn snapshot(&self) -> Tree<PatternKind> {
        self.tree.read().clone()
    }

    /// Check if any registered pattern grants `key`.
    pub fn matches(&self, key: &str) -> bool {
        // Holding the read lock keeps writers from clearing the cache between
        // computing a result and storing it.
        let tree = self.tree.read();

        let Some(cache) = &self.cache else {
            return tree.matches_wildcard(key.as_bytes());
        };

        let mut cache = cache.lock();
        if let Some(&cached) = cache.get(key) {
            tracing::trace!(key, cached, "match cache hit");
            return cached;
        }

        let result = tree.matches_wildcard(key.as_bytes());
        cache.put(key.to_string(), result);
        result
    }

    /// Clear the match cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }
}

impl KeyMatcher for PatternRegistry {
    fn matches(&self, key: &str) -> bool {
        PatternRegistry::matches(self, key)
    }
}
