use crate::node::{TrieNode, TrieNodeIdx};

/// Arena owning every node of a set-trie.
///
/// Each node keeps its children as a vector of handles sorted by the
/// children's keys, so lookups are binary searches and in-order iteration is
/// a plain slice walk. Released nodes are recycled through `free_nodes`.
#[derive(Clone, Debug)]
pub(crate) struct NodePool<K> {
    pub(crate) nodes: Vec<TrieNode<K>>,
    pub(crate) free_nodes: Vec<TrieNodeIdx>,
}

impl<K> NodePool<K> {
    /// Creates a pool holding only the root node at index 0
    pub(crate) fn new() -> Self {
        NodePool {
            nodes: vec![TrieNode::new(None)],
            free_nodes: Vec::new(),
        }
    }

    /// Drops every node except a fresh root
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_nodes.clear();
        self.nodes.push(TrieNode::new(None));
    }

    /// Number of live nodes, root included
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    #[inline(always)]
    pub(crate) fn get_node(&self, idx: TrieNodeIdx) -> &TrieNode<K> {
        &self.nodes[idx.0]
    }

    #[inline(always)]
    pub(crate) fn get_node_mut(&mut self, idx: TrieNodeIdx) -> &mut TrieNode<K> {
        &mut self.nodes[idx.0]
    }

    /// Key of a node; `None` only for the root
    #[inline(always)]
    pub(crate) fn key(&self, idx: TrieNodeIdx) -> Option<&K> {
        self.nodes[idx.0].key.as_ref()
    }

    /// Children of a node in ascending key order
    #[inline(always)]
    pub(crate) fn children(&self, idx: TrieNodeIdx) -> &[TrieNodeIdx] {
        &self.nodes[idx.0].children
    }

    fn allocate(&mut self, key: K) -> TrieNodeIdx {
        if let Some(idx) = self.free_nodes.pop() {
            self.nodes[idx.0] = TrieNode::new(Some(key));
            return idx;
        }

        self.nodes.push(TrieNode::new(Some(key)));
        TrieNodeIdx(self.nodes.len() - 1)
    }

    fn release(&mut self, idx: TrieNodeIdx) {
        self.nodes[idx.0] = TrieNode::new(None);
        self.free_nodes.push(idx);
    }
}

impl<K: Ord> NodePool<K> {
    /// Position of `key` among the children of `parent`: `Ok` when present,
    /// `Err` with the insertion point otherwise.
    #[inline(always)]
    fn child_position(&self, parent: TrieNodeIdx, key: &K) -> Result<usize, usize> {
        let nodes = &self.nodes;
        nodes[parent.0]
            .children
            .binary_search_by(|&child| nodes[child.0].key.as_ref().cmp(&Some(key)))
    }

    /// Gets the child of `parent` labelled with `key`
    #[inline(always)]
    pub(crate) fn find_child(&self, parent: TrieNodeIdx, key: &K) -> Option<TrieNodeIdx> {
        self.child_position(parent, key)
            .ok()
            .map(|pos| self.nodes[parent.0].children[pos])
    }

    /// Returns the child labelled with `key`, creating it in sorted position if
    /// absent. The flag reports whether a node was created.
    pub(crate) fn add_child(&mut self, parent: TrieNodeIdx, key: K) -> (TrieNodeIdx, bool) {
        match self.child_position(parent, &key) {
            Ok(pos) => (self.nodes[parent.0].children[pos], false),
            Err(pos) => {
                let child = self.allocate(key);
                self.nodes[parent.0].children.insert(pos, child);
                (child, true)
            }
        }
    }

    /// Unlinks a leaf `child` from `parent` and recycles it
    pub(crate) fn remove_child(&mut self, parent: TrieNodeIdx, child: TrieNodeIdx) -> bool {
        let pos = {
            let nodes = &self.nodes;
            let key = nodes[child.0].key.as_ref();
            nodes[parent.0]
                .children
                .binary_search_by(|&c| nodes[c.0].key.as_ref().cmp(&key))
        };

        match pos {
            Ok(pos) => {
                self.nodes[parent.0].children.remove(pos);
                self.release(child);
                true
            }
            Err(_) => false,
        }
    }
}
