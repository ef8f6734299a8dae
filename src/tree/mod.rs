//! Immutable radix tree.
//!
//! Keys are byte strings. Every node is shared through `Arc` and never
//! changes once built: `insert` and `delete` copy the path from the root to
//! the modified node and hand back a new [`Tree`], so any root reference a
//! reader holds stays a consistent snapshot.
//!
//! ## Example
//!
//! ```
//! use wildcard_acl::tree::Tree;
//!
//! let (tree, _) = Tree::new().insert(b"tenant.*", ());
//! let (tree, _) = tree.insert(b"tenant.abc.member.add", ());
//!
//! assert!(tree.get(b"tenant.*").is_some());
//! assert!(tree.matches_wildcard(b"tenant.xyz"));
//! ```

mod node;

pub use node::{Node, Tree};

/// Read access to a radix tree node.
///
/// This is all the wildcard matcher needs from a tree, so hand-built nodes
/// can stand in for [`Node`] in tests.
pub trait RadixNode {
    /// Edge label consumed to reach this node. Empty only at the root.
    fn prefix(&self) -> &[u8];

    /// The child whose edge label starts with `label`, if any.
    fn edge(&self, label: u8) -> Option<&Self>;

    /// Whether a stored key ends exactly at this node.
    fn is_leaf(&self) -> bool;

    /// Exact membership of `key`, relative to this node.
    fn contains(&self, key: &[u8]) -> bool {
        let mut node = self;
        let mut search = key;
        loop {
            let Some(&label) = search.first() else {
                return node.is_leaf();
            };
            match node.edge(label) {
                Some(child) if search.starts_with(child.prefix()) => {
                    search = &search[child.prefix().len()..];
                    node = child;
                }
                _ => return false,
            }
        }
    }
}
