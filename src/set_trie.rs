use std::borrow::Borrow;
use std::fmt::{self, Display};

use crate::engine::{canonical, RawSetTrie};
use crate::error::{Result, SetTrieError};
use crate::format::{write_tree, TreeFormat};
use crate::iter::Sets;

/// A `SetTrie` stores a collection of sets and answers subset and superset
/// queries over it without scanning every stored set.
///
/// Each set is stored as the path of its elements in ascending order, so sets
/// sharing their smallest elements share trie nodes, whatever order the
/// elements were given in.
///
/// # Examples
///
/// ```
/// use settrie::SetTrie;
///
/// let mut trie: SetTrie<i32> = SetTrie::new();
/// trie.add([3, 1]);
/// trie.add([1, 3, 5]);
/// trie.add([2, 4]);
///
/// assert!(trie.contains([1, 3]));
/// assert!(!trie.contains([1]));
///
/// // Stored sets containing 3
/// let supersets: Vec<Vec<i32>> = trie.supersets([3]).collect();
/// assert_eq!(supersets, vec![vec![1, 3], vec![1, 3, 5]]);
///
/// // Stored sets made only of elements of {1, 2, 3, 4}
/// let subsets: Vec<Vec<i32>> = trie.subsets([1, 2, 3, 4]).collect();
/// assert_eq!(subsets, vec![vec![1, 3], vec![2, 4]]);
/// ```
#[derive(Clone)]
pub struct SetTrie<K> {
    pub(crate) raw: RawSetTrie<K, ()>,
}

impl<K> Default for SetTrie<K> {
    /// Creates an empty `SetTrie`.
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SetTrie<K> {
    /// Creates an empty `SetTrie`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let trie: SetTrie<u32> = SetTrie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        SetTrie {
            raw: RawSetTrie::new(),
        }
    }

    /// Returns the number of stored sets.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if no set is stored. The empty set counts as a stored
    /// set once added.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let mut trie: SetTrie<i32> = SetTrie::new();
    /// assert!(trie.is_empty());
    ///
    /// trie.add(Vec::<i32>::new());
    /// assert!(!trie.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of trie nodes in use, root included.
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Removes every stored set.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord + Clone> SetTrie<K> {
    /// Adds a set. Duplicate elements collapse; element order does not matter.
    ///
    /// Returns `true` if the set was not stored before.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let mut trie: SetTrie<i32> = SetTrie::new();
    /// assert!(trie.add([2, 1, 2]));
    /// assert!(!trie.add([1, 2]));
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn add<S>(&mut self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let node = self.raw.insert_path(canonical(set));
        self.raw.store(node, ()).is_none()
    }

    /// Returns `true` if exactly this set is stored.
    pub fn contains<S>(&self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.contains(&canonical(set))
    }

    /// Removes a stored set, pruning the nodes no other set uses.
    ///
    /// # Errors
    ///
    /// Returns [`SetTrieError::MissingSet`] if the set is not stored; the trie
    /// is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::{SetTrie, SetTrieError};
    /// let mut trie: SetTrie<i32> = SetTrie::from([vec![1, 3], vec![1, 3, 5]]);
    ///
    /// assert_eq!(trie.remove([1, 3]), Ok(()));
    /// assert_eq!(trie.remove([1, 3]), Err(SetTrieError::MissingSet { len: 2 }));
    /// assert!(trie.contains([1, 3, 5]));
    /// ```
    pub fn remove<S>(&mut self, set: S) -> Result<()>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let keys = canonical(set);
        self.raw
            .remove(&keys)
            .ok_or(SetTrieError::MissingSet { len: keys.len() })
    }

    /// Returns `true` if some stored set contains every element of `set`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let trie: SetTrie<i32> = SetTrie::from([vec![1, 3, 5], vec![2, 4]]);
    /// assert!(trie.has_superset([3, 5]));
    /// assert!(trie.has_superset(Vec::<i32>::new()));
    /// assert!(!trie.has_superset([4, 5]));
    /// ```
    pub fn has_superset<S>(&self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.has_superset(&canonical(set))
    }

    /// Returns a lazy iterator over the stored sets containing every element
    /// of `set`, in ascending order.
    pub fn supersets<S>(&self, set: S) -> Sets<'_, K>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        Sets {
            inner: self.raw.supersets(canonical(set)).keys(),
        }
    }

    /// Returns `true` if some stored set has all its elements in `set`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let trie: SetTrie<i32> = SetTrie::from([vec![1, 3, 5], vec![2, 4]]);
    /// assert!(trie.has_subset([2, 3, 4]));
    /// assert!(!trie.has_subset([1, 3]));
    /// ```
    pub fn has_subset<S>(&self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.has_subset(&canonical(set))
    }

    /// Returns a lazy iterator over the stored sets whose elements all belong
    /// to `set`, in ascending order.
    pub fn subsets<S>(&self, set: S) -> Sets<'_, K>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        Sets {
            inner: self.raw.subsets(canonical(set)).keys(),
        }
    }

    /// Returns an iterator over the stored sets in ascending order. Every set
    /// comes out with its elements sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let trie: SetTrie<i32> = SetTrie::from([vec![2, 3], vec![1, 2], vec![2]]);
    /// let sets: Vec<Vec<i32>> = trie.iter().collect();
    /// assert_eq!(sets, vec![vec![1, 2], vec![2], vec![2, 3]]);
    /// ```
    pub fn iter(&self) -> Sets<'_, K> {
        Sets {
            inner: self.raw.iter().keys(),
        }
    }

    /// Collects every stored set, in ascending order.
    pub fn to_vec(&self) -> Vec<Vec<K>> {
        self.iter().collect()
    }
}

impl<K: Display> SetTrie<K> {
    /// Writes the node tree to `out`, one node per line, terminal nodes
    /// followed by the format's terminal marker.
    pub fn write_tree<W: fmt::Write>(&self, out: &mut W, format: &TreeFormat) -> fmt::Result {
        write_tree(&self.raw, out, format, |w, _| {
            w.write_str(format.terminal_marker())
        })
    }

    /// Renders the node tree as a string.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::{SetTrie, TreeFormat};
    /// let trie: SetTrie<i32> = SetTrie::from([vec![1, 3], vec![2]]);
    /// assert_eq!(
    ///     trie.tree_string(&TreeFormat::default()),
    ///     "None\n  1\n    3#\n  2#\n"
    /// );
    /// ```
    pub fn tree_string(&self, format: &TreeFormat) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_tree(&mut out, format);
        out
    }
}

impl<K: Ord + Clone + fmt::Debug> fmt::Debug for SetTrie<K> {
    /// Formats the stored sets as a list in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let trie: SetTrie<i32> = SetTrie::from([vec![3], vec![2, 1]]);
    /// assert_eq!(format!("{:?}", trie), "[[1, 2], [3]]");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone> PartialEq for SetTrie<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ord + Clone> Eq for SetTrie<K> {}

impl<K, S> Extend<S> for SetTrie<K>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for set in iter {
            self.add(set);
        }
    }
}

impl<K, S> FromIterator<S> for SetTrie<K>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = SetTrie::new();
        trie.extend(iter);
        trie
    }
}

impl<K, S, const N: usize> From<[S; N]> for SetTrie<K>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn from(array: [S; N]) -> Self {
        array.into_iter().collect()
    }
}

impl<'a, K: Ord + Clone> IntoIterator for &'a SetTrie<K> {
    type Item = Vec<K>;
    type IntoIter = Sets<'a, K>;

    /// Iterates over the stored sets in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrie;
    /// let trie: SetTrie<i32> = SetTrie::from([vec![1], vec![0, 1]]);
    /// for set in &trie {
    ///     assert!(set.contains(&1));
    /// }
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
