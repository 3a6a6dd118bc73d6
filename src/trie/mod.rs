//! Prefix tree holding values at the end of character chains.
//!
//! The tree is an arena: every node lives in a single `Vec` and refers to its
//! children by [`NodeId`]. Node `0` is always the root and represents the empty
//! key. Nodes are created lazily while inserting and are never removed, so a
//! `NodeId` handed out by a tree stays valid for the lifetime of that tree.
//!
//! # Example
//!
//! ```rust
//! use fuzzytrie::trie::PrefixTree;
//!
//! let mut tree: PrefixTree<u32> = PrefixTree::new();
//! let sum = |existing: Option<u32>, incoming: u32| existing.unwrap_or(0) + incoming;
//!
//! tree.insert("abc", 3, sum);
//! tree.insert("abc", 3, sum);
//!
//! assert_eq!(tree.get("abc"), Some(&6));
//! assert_eq!(tree.get("ab"), None);
//! assert_eq!(tree.len(), 1);
//! ```

use rustc_hash::FxHashMap;
use std::fmt;

/// Index of a node inside a [`PrefixTree`].
///
/// Identity of a node is its index, which is what the search uses to make sure
/// a stored key is reported at most once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of this node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct TrieNode<V> {
    children: FxHashMap<char, NodeId>,
    value: Option<V>,
}

impl<V> TrieNode<V> {
    fn new() -> Self {
        TrieNode {
            children: FxHashMap::default(),
            value: None,
        }
    }
}

/// An append/merge-only prefix tree mapping string keys to values.
///
/// Keys are split into `char`s, so multi-byte UTF-8 characters occupy a single
/// edge. Inserting a key that is already present does not overwrite its value:
/// the caller supplies a `combine` function that folds the incoming value into
/// the existing one.
///
/// Once built, the tree is only read by searches. Any number of searches can
/// share a `&PrefixTree<V>` across threads when `V: Sync`; inserting needs
/// `&mut self`, which rules out inserts racing with searches.
#[derive(Clone, Debug)]
pub struct PrefixTree<V> {
    nodes: Vec<TrieNode<V>>,
    key_count: usize,
}

impl<V> PrefixTree<V> {
    /// Create an empty tree containing only the root.
    pub fn new() -> Self {
        PrefixTree {
            nodes: vec![TrieNode::new()],
            key_count: 0,
        }
    }

    /// Insert `value` under `key`, merging with any value already stored there.
    ///
    /// `combine` receives the current value of the terminal node (`None` on the
    /// first insert of `key`) and the incoming value, and returns the value to
    /// store. It must be deterministic. If the final value has to be
    /// independent of insertion order, `combine` has to be commutative and
    /// associative; the tree does not check this.
    ///
    /// The empty key stores its value on the root.
    pub fn insert<F>(&mut self, key: &str, value: V, combine: F)
    where
        F: FnOnce(Option<V>, V) -> V,
    {
        let mut node = NodeId::ROOT;
        for c in key.chars() {
            node = self.step_or_create(node, c);
        }

        let slot = &mut self.nodes[node.0].value;
        if slot.is_none() {
            self.key_count += 1;
        }
        let existing = slot.take();
        *slot = Some(combine(existing, value));
    }

    /// Insert `value` under `key`, keeping the first value if `key` exists.
    pub fn insert_with(&mut self, key: &str, value: V) {
        self.insert(key, value, |existing, incoming| existing.unwrap_or(incoming));
    }

    /// Insert every `(key, value)` pair, merging duplicates with `combine`.
    pub fn extend_with<K, I, F>(&mut self, pairs: I, mut combine: F)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(Option<V>, V) -> V,
    {
        for (key, value) in pairs {
            self.insert(key.as_ref(), value, &mut combine);
        }
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeRef<'_, V> {
        self.node(NodeId::ROOT)
    }

    /// Read-only view of the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> NodeRef<'_, V> {
        assert!(id.0 < self.nodes.len(), "node {} does not belong to this tree", id);
        NodeRef { tree: self, id }
    }

    /// Follow the edge labelled `c` out of `node`, if there is one.
    #[inline]
    pub fn step(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.nodes[node.0].children.get(&c).copied()
    }

    /// Follow the edge labelled `c` out of `node`, creating an empty child if
    /// the edge is missing.
    pub fn step_or_create(&mut self, node: NodeId, c: char) -> NodeId {
        if let Some(&child) = self.nodes[node.0].children.get(&c) {
            return child;
        }

        let child = NodeId(self.nodes.len());
        self.nodes.push(TrieNode::new());
        self.nodes[node.0].children.insert(c, child);
        child
    }

    /// Iterate over the outgoing edges of `node` as `(label, child)` pairs.
    ///
    /// The order is unspecified.
    #[inline]
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.nodes[node.0].children.iter().map(|(&c, &id)| (c, id))
    }

    /// Value stored on `node`, present iff the node ends an inserted key.
    #[inline]
    pub fn value(&self, node: NodeId) -> Option<&V> {
        self.nodes[node.0].value.as_ref()
    }

    /// Exact lookup of `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = NodeId::ROOT;
        for c in key.chars() {
            node = self.step(node, c)?;
        }
        self.value(node)
    }

    /// Check if `key` was inserted.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct keys carrying a value.
    pub fn len(&self) -> usize {
        self.key_count
    }

    /// Check if no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Number of nodes in the arena, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<V> Default for PrefixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed, read-only handle on one node of a [`PrefixTree`].
pub struct NodeRef<'t, V> {
    tree: &'t PrefixTree<V>,
    id: NodeId,
}

impl<'t, V> NodeRef<'t, V> {
    /// Identity of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Follow the edge labelled `c`.
    #[inline]
    pub fn step(&self, c: char) -> Option<NodeRef<'t, V>> {
        self.tree.step(self.id, c).map(|id| NodeRef { tree: self.tree, id })
    }

    /// The stored value, if this node ends an inserted key.
    #[inline]
    pub fn value(&self) -> Option<&'t V> {
        self.tree.value(self.id)
    }

    /// Iterate over `(label, child)` pairs in unspecified order.
    pub fn children(&self) -> impl Iterator<Item = (char, NodeRef<'t, V>)> + 't {
        let tree = self.tree;
        tree.children(self.id).map(move |(c, id)| (c, NodeRef { tree, id }))
    }

    /// Number of outgoing edges.
    pub fn child_count(&self) -> usize {
        self.tree.nodes[self.id.0].children.len()
    }
}

// Manual impls: deriving would require `V: Clone`/`V: Copy`.
impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<V> fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("id", &self.id).finish()
    }
}

impl<V> PartialEq for NodeRef<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<V> Eq for NodeRef<'_, V> {}
