//! Wildcard-aware membership over a radix tree.
//!
//! A stored pattern grants a key when it is
//! - the key itself,
//! - `*`, and the key is non-empty, or
//! - `p.*`, and the key is `p` or starts with `p.`.
//!
//! All three are decided in one descent along the key's path. At every node
//! the matcher looks for a `*` child hanging off a segment boundary, and on
//! every edge for a label ending in `.*`, so no per-depth lookup is needed.

use crate::tree::RadixNode;
use crate::types::{SEGMENT_SEPARATOR, UNIVERSAL_WILDCARD, WILDCARD_SUFFIX};

/// Check `key` against every pattern stored under `root`.
pub fn matches_wildcard<N: RadixNode>(root: &N, key: &[u8]) -> bool {
    // Wildcards never grant the empty key
    if key.is_empty() {
        return root.contains(key);
    }

    if root.contains(UNIVERSAL_WILDCARD.as_bytes()) {
        return true;
    }

    let mut node = root;
    let mut search = key;
    loop {
        let consumed = &key[..key.len() - search.len()];

        // `p.*` split so that `*` is its own edge below `p.`. Checked before
        // the end-of-key test so that a key ending in `p.` is granted too.
        if ends_segment(consumed) {
            if let Some(star) = node.edge(b'*') {
                if star.is_leaf() && star.prefix() == UNIVERSAL_WILDCARD.as_bytes() {
                    return true;
                }
            }
        }

        let Some(&label) = search.first() else {
            // Key ends on a node: exact pattern, or `key.*` hanging below it
            return node.is_leaf() || node.contains(WILDCARD_SUFFIX.as_bytes());
        };

        let Some(next) = node.edge(label) else {
            return false;
        };
        let prefix = next.prefix();

        // Edge label carries the whole `.*` suffix of a stored pattern
        if next.is_leaf() {
            if let Some(literal) = prefix.strip_suffix(WILDCARD_SUFFIX.as_bytes()) {
                let at_boundary =
                    matches!(search.get(literal.len()), None | Some(&SEGMENT_SEPARATOR));
                let non_empty = consumed.len() + literal.len() > 0;
                if search.starts_with(literal) && at_boundary && non_empty {
                    return true;
                }
            }
        }

        if let Some(rest) = search.strip_prefix(prefix) {
            node = next;
            search = rest;
            continue;
        }

        // Key ends inside the edge label. No stored key ends mid-label, so an
        // exact match is impossible; only `key.*` running on from here can grant it.
        if let Some(tail) = prefix.strip_prefix(search) {
            return WILDCARD_SUFFIX
                .as_bytes()
                .strip_prefix(tail)
                .is_some_and(|rest| next.contains(rest));
        }

        return false;
    }
}

/// Whether `consumed` ends with a separator that follows a non-empty literal
fn ends_segment(consumed: &[u8]) -> bool {
    consumed.len() > 1 && consumed.last() == Some(&SEGMENT_SEPARATOR)
}

/// Wildcard matcher borrowing a tree snapshot
#[derive(Debug)]
pub struct WildcardMatcher<'a, N> {
    root: &'a N,
}

impl<N> Clone for WildcardMatcher<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for WildcardMatcher<'_, N> {}

impl<'a, N: RadixNode> WildcardMatcher<'a, N> {
    /// Create a matcher over the tree rooted at `root`
    pub fn new(root: &'a N) -> Self {
        Self { root }
    }

    /// Check if any stored pattern grants `key`
    pub fn matches(&self, key: &[u8]) -> bool {
        matches_wildcard(self.root, key)
    }
}

impl<N: RadixNode + Sync> crate::matcher::KeyMatcher for WildcardMatcher<'_, N> {
    fn matches(&self, key: &str) -> bool {
        matches_wildcard(self.root, key.as_bytes())
    }
}
