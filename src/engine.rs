use std::borrow::Borrow;

use log::{debug, trace};

use crate::iter::{Matches, Search};
use crate::node::{TrieNode, TrieNodeIdx};
use crate::node_pool::NodePool;

/// Collects a set argument into its canonical form: ascending, without
/// duplicates.
pub(crate) fn canonical<K, S>(set: S) -> Vec<K>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    let mut keys: Vec<K> = set.into_iter().map(|k| k.borrow().clone()).collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// The set-trie engine shared by [`SetTrie`](crate::SetTrie),
/// [`SetTrieMap`](crate::SetTrieMap) and
/// [`SetTrieMultiMap`](crate::SetTrieMultiMap).
///
/// Stored sets are paths of the node pool; the payload of a terminal node
/// lives in `data` at the node's `data_idx`. Freed slots are reused through
/// `free_indices`. Every non-root node has at least one terminal descendant:
/// removal prunes branches that lose their last one.
#[derive(Clone, Debug)]
pub(crate) struct RawSetTrie<K, T> {
    pub(crate) data: Vec<Option<T>>,
    pub(crate) free_indices: Vec<usize>,
    pub(crate) root: TrieNodeIdx,
    pub(crate) size: usize,
    pub(crate) pool: NodePool<K>,
}

impl<K, T> RawSetTrie<K, T> {
    pub(crate) fn new() -> Self {
        RawSetTrie {
            data: Vec::new(),
            free_indices: Vec::new(),
            root: TrieNodeIdx(0),
            size: 0,
            pool: NodePool::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn node_count(&self) -> usize {
        self.pool.node_count()
    }

    pub(crate) fn clear(&mut self) {
        debug!(
            "clear: dropping {} sets and {} nodes",
            self.size,
            self.pool.node_count()
        );
        self.data.clear();
        self.free_indices.clear();
        self.pool.clear();
        self.root = TrieNodeIdx(0);
        self.size = 0;
    }

    /// Payload of a node, if it is terminal
    #[inline(always)]
    pub(crate) fn node_value(&self, node: &TrieNode<K>) -> Option<&T> {
        node.data_idx.and_then(|idx| self.data[idx].as_ref())
    }

    pub(crate) fn value(&self, idx: TrieNodeIdx) -> Option<&T> {
        self.node_value(self.pool.get_node(idx))
    }

    pub(crate) fn value_mut(&mut self, idx: TrieNodeIdx) -> Option<&mut T> {
        let data_idx = self.pool.get_node(idx).data_idx?;
        self.data[data_idx].as_mut()
    }

    /// Marks `node` terminal by handing it an empty value slot
    fn allocate_slot(&mut self, node: TrieNodeIdx) -> usize {
        let idx = match self.free_indices.pop() {
            Some(free_idx) => free_idx,
            None => {
                self.data.push(None);
                self.data.len() - 1
            }
        };

        self.pool.get_node_mut(node).data_idx = Some(idx);
        self.size += 1;
        idx
    }

    /// Stores `value` at a node, returning the value it replaced
    pub(crate) fn store(&mut self, node: TrieNodeIdx, value: T) -> Option<T> {
        let idx = match self.pool.get_node(node).data_idx {
            Some(idx) => idx,
            None => self.allocate_slot(node),
        };
        self.data[idx].replace(value)
    }

    /// Value at a node, storing `f()` first if the node is not terminal
    pub(crate) fn value_or_insert_with<F>(&mut self, node: TrieNodeIdx, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let idx = match self.pool.get_node(node).data_idx {
            Some(idx) => idx,
            None => self.allocate_slot(node),
        };
        self.data[idx].get_or_insert_with(f)
    }

    /// Lazy pre-order walk over every stored set
    pub(crate) fn iter(&self) -> Matches<'_, K, T> {
        Matches::new(self, Search::All)
    }
}

impl<K: Ord + Clone, T> RawSetTrie<K, T> {
    /// Walks down the canonical `keys`, creating missing nodes, and returns
    /// the node the walk ends at.
    pub(crate) fn insert_path(&mut self, keys: Vec<K>) -> TrieNodeIdx {
        let mut current = self.root;
        let mut created = 0usize;

        for key in keys {
            let (child, is_new) = self.pool.add_child(current, key);
            created += usize::from(is_new);
            current = child;
        }

        if created > 0 {
            trace!(
                "insert_path: created {} nodes, {} live",
                created,
                self.pool.node_count()
            );
        }
        current
    }

    /// Node reached by following `keys` exactly, terminal or not
    pub(crate) fn find(&self, keys: &[K]) -> Option<TrieNodeIdx> {
        keys.iter()
            .try_fold(self.root, |node, key| self.pool.find_child(node, key))
    }

    /// Terminal node storing exactly `keys`
    pub(crate) fn find_terminal(&self, keys: &[K]) -> Option<TrieNodeIdx> {
        self.find(keys)
            .filter(|&idx| self.pool.get_node(idx).is_terminal())
    }

    pub(crate) fn contains(&self, keys: &[K]) -> bool {
        self.find_terminal(keys).is_some()
    }

    /// Whether some stored set contains every element of the canonical `query`.
    ///
    /// Children greater than the element being looked for are never entered:
    /// a path only ascends, so their subtrees cannot hold it.
    pub(crate) fn has_superset(&self, query: &[K]) -> bool {
        if self.size == 0 {
            return false;
        }

        let mut stack = vec![(self.root, 0usize)];
        while let Some((node, cursor)) = stack.pop() {
            let Some(target) = query.get(cursor) else {
                return true;
            };

            let children = self.pool.children(node);
            let end = children.partition_point(|&c| self.pool.key(c) <= Some(target));
            for &child in children[..end].iter().rev() {
                let next = if self.pool.key(child) == Some(target) {
                    cursor + 1
                } else {
                    cursor
                };
                stack.push((child, next));
            }
        }

        false
    }

    /// Whether some stored set has all its elements in the canonical `query`.
    pub(crate) fn has_subset(&self, query: &[K]) -> bool {
        let mut stack = vec![(self.root, 0usize)];
        while let Some((node, cursor)) = stack.pop() {
            if self.pool.get_node(node).is_terminal() {
                return true;
            }
            let Some(target) = query.get(cursor) else {
                continue;
            };

            // skipping `target` is explored after using it
            stack.push((node, cursor + 1));
            if let Some(child) = self.pool.find_child(node, target) {
                stack.push((child, cursor + 1));
            }
        }

        false
    }

    pub(crate) fn supersets(&self, query: Vec<K>) -> Matches<'_, K, T> {
        Matches::new(self, Search::Supersets(query))
    }

    pub(crate) fn subsets(&self, query: Vec<K>) -> Matches<'_, K, T> {
        Matches::new(self, Search::Subsets(query))
    }

    /// Unmarks the set `keys` and prunes the ancestors left without a
    /// terminal descendant. Returns the removed value.
    pub(crate) fn remove(&mut self, keys: &[K]) -> Option<T> {
        let mut path = Vec::with_capacity(keys.len());
        let mut current = self.root;

        for key in keys {
            let child = self.pool.find_child(current, key)?;
            path.push((current, child));
            current = child;
        }

        let data_idx = self.pool.get_node_mut(current).data_idx.take()?;
        let value = self.data[data_idx].take();
        self.free_indices.push(data_idx);
        self.size -= 1;

        let mut pruned = 0usize;
        for &(parent, child) in path.iter().rev() {
            let node = self.pool.get_node(child);
            if node.is_terminal() || node.has_children() {
                break;
            }
            self.pool.remove_child(parent, child);
            pruned += 1;
        }

        debug!(
            "remove: pruned {} nodes, {} sets left",
            pruned, self.size
        );
        value
    }
}
