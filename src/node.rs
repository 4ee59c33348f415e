/// Handle of a node inside a [`NodePool`](crate::node_pool::NodePool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TrieNodeIdx(pub(crate) usize);

/// One element of the path of one or more stored sets.
///
/// The root is the only node without a key. A node is terminal when
/// `data_idx` is set; the index points into the owning trie's value slots.
#[derive(Clone, Debug)]
pub(crate) struct TrieNode<K> {
    pub(crate) key: Option<K>,
    pub(crate) children: Vec<TrieNodeIdx>,
    pub(crate) data_idx: Option<usize>,
}

impl<K> TrieNode<K> {
    pub(crate) fn new(key: Option<K>) -> Self {
        TrieNode {
            key,
            children: Vec::new(),
            data_idx: None,
        }
    }

    #[inline(always)]
    pub(crate) fn is_terminal(&self) -> bool {
        self.data_idx.is_some()
    }

    #[inline(always)]
    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
