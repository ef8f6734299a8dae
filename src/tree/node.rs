use std::sync::Arc;

use super::RadixNode;

/// Stored key and its value
#[derive(Debug)]
struct Leaf<T> {
    key: Box<[u8]>,
    value: T,
}

/// Outgoing edge, keyed by the first byte of the child's prefix
#[derive(Debug)]
struct Edge<T> {
    label: u8,
    node: Arc<Node<T>>,
}

impl<T> Clone for Edge<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            node: Arc::clone(&self.node),
        }
    }
}

/// Radix tree node
#[derive(Debug)]
pub struct Node<T> {
    /// Set when a stored key ends at this node
    leaf: Option<Arc<Leaf<T>>>,
    /// Edge label from the parent
    prefix: Box<[u8]>,
    /// Children, sorted by label; labels are unique
    edges: Vec<Edge<T>>,
}

// Cloning a node copies its prefix and edge list; children and leaf are shared.
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            leaf: self.leaf.clone(),
            prefix: self.prefix.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<T> Node<T> {
    fn empty() -> Self {
        Self {
            leaf: None,
            prefix: Box::default(),
            edges: Vec::new(),
        }
    }

    fn with_leaf(prefix: &[u8], leaf: Arc<Leaf<T>>) -> Self {
        Self {
            leaf: Some(leaf),
            prefix: prefix.into(),
            edges: Vec::new(),
        }
    }

    /// Full key stored at this node
    pub fn key(&self) -> Option<&[u8]> {
        self.leaf.as_ref().map(|leaf| &*leaf.key)
    }

    /// Value stored at this node
    pub fn value(&self) -> Option<&T> {
        self.leaf.as_ref().map(|leaf| &leaf.value)
    }

    /// Number of children
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Children in label order
    pub fn children(&self) -> impl Iterator<Item = &Node<T>> {
        self.edges.iter().map(|edge| edge.node.as_ref())
    }

    fn find_edge(&self, label: u8) -> Result<usize, usize> {
        self.edges.binary_search_by_key(&label, |edge| edge.label)
    }

    fn set_edge(&mut self, label: u8, node: Arc<Node<T>>) {
        match self.find_edge(label) {
            Ok(idx) => self.edges[idx].node = node,
            Err(idx) => self.edges.insert(idx, Edge { label, node }),
        }
    }

    fn remove_edge(&mut self, label: u8) {
        if let Ok(idx) = self.find_edge(label) {
            self.edges.remove(idx);
        }
    }

    /// Absorb the only child. Caller guarantees no leaf and exactly one edge.
    fn merge_child(&mut self) {
        debug_assert!(self.leaf.is_none() && self.edges.len() == 1);
        let Some(edge) = self.edges.pop() else {
            return;
        };
        let child = edge.node;

        let mut prefix = Vec::with_capacity(self.prefix.len() + child.prefix.len());
        prefix.extend_from_slice(&self.prefix);
        prefix.extend_from_slice(&child.prefix);

        self.prefix = prefix.into_boxed_slice();
        self.leaf = child.leaf.clone();
        self.edges = child.edges.clone();
    }

    fn find(&self, key: &[u8]) -> Option<&Node<T>> {
        let mut node = self;
        let mut search = key;
        while let Some(&label) = search.first() {
            let child = node.edge(label)?;
            search = search.strip_prefix(&child.prefix[..])?;
            node = child;
        }
        Some(node)
    }
}

impl<T> RadixNode for Node<T> {
    fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    fn edge(&self, label: u8) -> Option<&Self> {
        self.find_edge(label)
            .ok()
            .map(|idx| self.edges[idx].node.as_ref())
    }

    fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Returns the replacement for `node` and whether an existing leaf was replaced.
fn insert_at<T>(node: &Node<T>, search: &[u8], leaf: Arc<Leaf<T>>) -> (Node<T>, bool) {
    let mut updated = node.clone();

    let Some(&label) = search.first() else {
        let replaced = updated.leaf.replace(leaf).is_some();
        return (updated, replaced);
    };

    let Some(child) = node.edge(label) else {
        updated.set_edge(label, Arc::new(Node::with_leaf(search, leaf)));
        return (updated, false);
    };

    let common = longest_common_prefix(search, &child.prefix);
    if common == child.prefix.len() {
        let (child, replaced) = insert_at(child, &search[common..], leaf);
        updated.set_edge(label, Arc::new(child));
        return (updated, replaced);
    }

    // Split the edge at the divergence point
    let mut split = Node {
        leaf: None,
        prefix: search[..common].into(),
        edges: Vec::new(),
    };
    let mut tail = child.clone();
    tail.prefix = child.prefix[common..].into();
    split.set_edge(tail.prefix[0], Arc::new(tail));

    match search.get(common) {
        None => split.leaf = Some(leaf),
        Some(&next) => split.set_edge(next, Arc::new(Node::with_leaf(&search[common..], leaf))),
    }

    updated.set_edge(label, Arc::new(split));
    (updated, false)
}

/// Returns the replacement for `node`, or `None` if `search` is not stored below it.
fn delete_at<T>(node: &Node<T>, search: &[u8], is_root: bool) -> Option<Node<T>> {
    let Some(&label) = search.first() else {
        node.leaf.as_ref()?;
        let mut updated = node.clone();
        updated.leaf = None;
        if !is_root && updated.edges.len() == 1 {
            updated.merge_child();
        }
        return Some(updated);
    };

    let child = node.edge(label)?;
    let rest = search.strip_prefix(&child.prefix[..])?;
    let child = delete_at(child, rest, false)?;

    let mut updated = node.clone();
    if child.leaf.is_none() && child.edges.is_empty() {
        updated.remove_edge(label);
        if !is_root && updated.leaf.is_none() && updated.edges.len() == 1 {
            updated.merge_child();
        }
    } else {
        updated.set_edge(label, Arc::new(child));
    }
    Some(updated)
}

/// Persistent radix tree handle.
///
/// Cloning is O(1). Mutating operations return a new tree and leave `self`
/// untouched.
#[derive(Debug)]
pub struct Tree<T> {
    root: Arc<Node<T>>,
    len: usize,
}

impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            len: self.len,
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::empty()),
            len: 0,
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Root node of this snapshot
    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Look up the value stored under exactly `key`
    pub fn get(&self, key: &[u8]) -> Option<&T> {
        self.root.find(key).and_then(Node::value)
    }

    /// Check if exactly `key` is stored
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.root.contains(key)
    }

    /// Insert `key`, returning the new tree and whether an existing value was replaced.
    pub fn insert(&self, key: &[u8], value: T) -> (Self, bool) {
        let leaf = Arc::new(Leaf {
            key: key.into(),
            value,
        });
        let (root, replaced) = insert_at(&self.root, key, leaf);
        let len = if replaced { self.len } else { self.len + 1 };
        (
            Self {
                root: Arc::new(root),
                len,
            },
            replaced,
        )
    }

    /// Remove `key`. Returns `None` if it was not stored.
    pub fn delete(&self, key: &[u8]) -> Option<Self> {
        let root = delete_at(&self.root, key, true)?;
        Some(Self {
            root: Arc::new(root),
            len: self.len - 1,
        })
    }

    /// Check `key` against the stored patterns, honouring `*` and `.*` wildcards.
    pub fn matches_wildcard(&self, key: &[u8]) -> bool {
        crate::matcher::matches_wildcard(self.root(), key)
    }
}

impl<K: AsRef<[u8]>, T> FromIterator<(K, T)> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Tree::new(), |tree, (key, value)| tree.insert(key.as_ref(), value).0)
    }
}
