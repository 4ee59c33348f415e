use std::iter::FusedIterator;

use crate::engine::RawSetTrie;
use crate::node::TrieNodeIdx;

/// Which stored sets a [`Matches`] walk reports.
#[derive(Clone, Debug)]
pub(crate) enum Search<K> {
    All,
    /// Canonical query; report sets containing all of it
    Supersets(Vec<K>),
    /// Canonical query; report sets contained in it
    Subsets(Vec<K>),
}

/// A pending node of the walk.
#[derive(Clone, Copy, Debug)]
struct Frame {
    node: TrieNodeIdx,
    /// Length of the path above this node
    depth: usize,
    /// Position in the query the node is matched against
    cursor: usize,
}

/// A lazy walk over the stored sets matching a query, with their values.
///
/// The walk keeps its own stack of pending nodes and the path to the node
/// last visited, so it resumes where it stopped on each call to `next`.
/// Sets come out in ascending lexicographic order of their sorted elements.
///
/// Created by `supersets`, `subsets` and `iter` on the map types. Use
/// [`keys`](Matches::keys) or [`values`](Matches::values) to project the
/// matches.
pub struct Matches<'a, K, T> {
    trie: &'a RawSetTrie<K, T>,
    search: Search<K>,
    stack: Vec<Frame>,
    path: Vec<K>,
}

impl<K: Clone, T> Clone for Matches<'_, K, T> {
    fn clone(&self) -> Self {
        Matches {
            trie: self.trie,
            search: self.search.clone(),
            stack: self.stack.clone(),
            path: self.path.clone(),
        }
    }
}

impl<'a, K, T> Matches<'a, K, T> {
    pub(crate) fn new(trie: &'a RawSetTrie<K, T>, search: Search<K>) -> Self {
        Matches {
            trie,
            search,
            stack: vec![Frame {
                node: trie.root,
                depth: 0,
                cursor: 0,
            }],
            path: Vec::new(),
        }
    }

    /// Projects the remaining matches onto their key sets.
    pub fn keys(self) -> MatchKeys<'a, K, T> {
        MatchKeys { inner: self }
    }

    /// Projects the remaining matches onto their values.
    pub fn values(self) -> MatchValues<'a, K, T> {
        MatchValues { inner: self }
    }
}

impl<K: Ord, T> Matches<'_, K, T> {
    fn push_children(&mut self, frame: Frame) {
        let pool = &self.trie.pool;
        let children = pool.children(frame.node);
        let depth = self.path.len();

        match &self.search {
            Search::All => {
                for &node in children.iter().rev() {
                    self.stack.push(Frame {
                        node,
                        depth,
                        cursor: 0,
                    });
                }
            }
            Search::Supersets(query) => match query.get(frame.cursor) {
                // every element found: the whole subtree matches
                None => {
                    for &node in children.iter().rev() {
                        self.stack.push(Frame {
                            node,
                            depth,
                            cursor: frame.cursor,
                        });
                    }
                }
                Some(target) => {
                    let end = children.partition_point(|&c| pool.key(c) <= Some(target));
                    for &node in children[..end].iter().rev() {
                        let cursor = if pool.key(node) == Some(target) {
                            frame.cursor + 1
                        } else {
                            frame.cursor
                        };
                        self.stack.push(Frame {
                            node,
                            depth,
                            cursor,
                        });
                    }
                }
            },
            Search::Subsets(query) => {
                let rest = &query[frame.cursor.min(query.len())..];
                let Some(last) = rest.last() else {
                    return;
                };

                let end = children.partition_point(|&c| pool.key(c) <= Some(last));
                for &node in children[..end].iter().rev() {
                    let Some(key) = pool.key(node) else {
                        continue;
                    };
                    if let Ok(pos) = rest.binary_search(key) {
                        self.stack.push(Frame {
                            node,
                            depth,
                            cursor: frame.cursor + pos + 1,
                        });
                    }
                }
            }
        }
    }
}

impl<'a, K: Ord + Clone, T> Iterator for Matches<'a, K, T> {
    type Item = (Vec<K>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let trie = self.trie;

        while let Some(frame) = self.stack.pop() {
            let node = trie.pool.get_node(frame.node);

            self.path.truncate(frame.depth);
            if let Some(key) = &node.key {
                self.path.push(key.clone());
            }

            self.push_children(frame);

            let Some(value) = trie.node_value(node) else {
                continue;
            };
            let matched = match &self.search {
                Search::All | Search::Subsets(_) => true,
                Search::Supersets(query) => frame.cursor >= query.len(),
            };
            if matched {
                return Some((self.path.clone(), value));
            }
        }

        None
    }
}

impl<K: Ord + Clone, T> FusedIterator for Matches<'_, K, T> {}

/// Key sets of the matches of a query.
///
/// This struct is created by [`Matches::keys`] and by the `keys` methods of
/// the map types.
pub struct MatchKeys<'a, K, T> {
    pub(crate) inner: Matches<'a, K, T>,
}

impl<K: Clone, T> Clone for MatchKeys<'_, K, T> {
    fn clone(&self) -> Self {
        MatchKeys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Ord + Clone, T> Iterator for MatchKeys<'_, K, T> {
    type Item = Vec<K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K: Ord + Clone, T> FusedIterator for MatchKeys<'_, K, T> {}

/// Values of the matches of a query.
///
/// This struct is created by [`Matches::values`] and by the `values` methods
/// of the map types.
pub struct MatchValues<'a, K, T> {
    pub(crate) inner: Matches<'a, K, T>,
}

impl<K: Clone, T> Clone for MatchValues<'_, K, T> {
    fn clone(&self) -> Self {
        MatchValues {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: Ord + Clone, T> Iterator for MatchValues<'a, K, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<K: Ord + Clone, T> FusedIterator for MatchValues<'_, K, T> {}

/// Stored sets of a [`SetTrie`](crate::SetTrie) matching a query.
///
/// This struct is created by the [`iter`], [`supersets`] and [`subsets`]
/// methods on [`SetTrie`](crate::SetTrie).
///
/// [`iter`]: crate::SetTrie::iter
/// [`supersets`]: crate::SetTrie::supersets
/// [`subsets`]: crate::SetTrie::subsets
#[derive(Clone)]
pub struct Sets<'a, K> {
    pub(crate) inner: MatchKeys<'a, K, ()>,
}

impl<K: Ord + Clone> Iterator for Sets<'_, K> {
    type Item = Vec<K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<K: Ord + Clone> FusedIterator for Sets<'_, K> {}

/// Matches of a [`SetTrieMultiMap`](crate::SetTrieMultiMap) query, one
/// `(set, value)` pair per stored value.
///
/// Values of the same key set come out in insertion order.
pub struct MultiMatches<'a, K, V> {
    pub(crate) inner: Matches<'a, K, Vec<V>>,
    pub(crate) current: Option<(Vec<K>, std::slice::Iter<'a, V>)>,
}

impl<K: Clone, V> Clone for MultiMatches<'_, K, V> {
    fn clone(&self) -> Self {
        MultiMatches {
            inner: self.inner.clone(),
            current: self.current.clone(),
        }
    }
}

impl<'a, K, V> MultiMatches<'a, K, V> {
    pub(crate) fn new(inner: Matches<'a, K, Vec<V>>) -> Self {
        MultiMatches {
            inner,
            current: None,
        }
    }

    /// Projects the matches onto their key sets, each reported once.
    ///
    /// A key set whose values are partially consumed is not reported again.
    pub fn keys(self) -> MatchKeys<'a, K, Vec<V>> {
        self.inner.keys()
    }

    /// Projects the matches onto their values.
    pub fn values(self) -> MultiValues<'a, K, V> {
        let pending = self.current.map(|(_, values)| values);
        MultiValues {
            pending,
            inner: self.inner.values(),
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for MultiMatches<'a, K, V> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some(value) = values.next() {
                    return Some((key.clone(), value));
                }
            }

            let (key, values) = self.inner.next()?;
            self.current = Some((key, values.iter()));
        }
    }
}

impl<K: Ord + Clone, V> FusedIterator for MultiMatches<'_, K, V> {}

/// Values of the matches of a [`SetTrieMultiMap`](crate::SetTrieMultiMap)
/// query.
pub struct MultiValues<'a, K, V> {
    pending: Option<std::slice::Iter<'a, V>>,
    inner: MatchValues<'a, K, Vec<V>>,
}

impl<K: Clone, V> Clone for MultiValues<'_, K, V> {
    fn clone(&self) -> Self {
        MultiValues {
            pending: self.pending.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for MultiValues<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pending) = &mut self.pending {
                if let Some(value) = pending.next() {
                    return Some(value);
                }
            }

            self.pending = Some(self.inner.next()?.iter());
        }
    }
}

impl<K: Ord + Clone, V> FusedIterator for MultiValues<'_, K, V> {}
