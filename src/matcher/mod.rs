mod wildcard;

pub use wildcard::{matches_wildcard, WildcardMatcher};

use crate::tree::Tree;

/// Trait for key matchers
pub trait KeyMatcher: Send + Sync {
    /// Check if the key is granted by this matcher
    fn matches(&self, key: &str) -> bool;
}

impl<T: Send + Sync> KeyMatcher for Tree<T> {
    fn matches(&self, key: &str) -> bool {
        self.matches_wildcard(key.as_bytes())
    }
}
