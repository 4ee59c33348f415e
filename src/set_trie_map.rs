use std::borrow::Borrow;
use std::fmt::{self, Debug, Display};
use std::ops::Index;

use crate::engine::{canonical, RawSetTrie};
use crate::error::{Result, SetTrieError};
use crate::format::{write_tree, TreeFormat};
use crate::iter::{MatchKeys, MatchValues, Matches};

/// A `SetTrieMap` is a map whose keys are sets, stored in a set-trie.
///
/// Besides exact lookups it finds the entries whose key set is a superset or
/// a subset of a query set. Every query yields `(key set, &value)` pairs and
/// can be narrowed to keys or values with [`Matches::keys`] and
/// [`Matches::values`].
///
/// # Examples
///
/// ```
/// use settrie::SetTrieMap;
///
/// let mut map: SetTrieMap<i32, &str> = SetTrieMap::new();
/// map.assign([1, 3], "A");
/// map.assign([3, 5, 1], "B");
/// map.assign([2, 4], "E");
///
/// assert_eq!(map.get([3, 1]), Some(&"A"));
///
/// let owners: Vec<&str> = map.supersets([3]).values().copied().collect();
/// assert_eq!(owners, vec!["A", "B"]);
///
/// let keys: Vec<Vec<i32>> = map.subsets([1, 2, 3, 4]).keys().collect();
/// assert_eq!(keys, vec![vec![1, 3], vec![2, 4]]);
/// ```
#[derive(Clone)]
pub struct SetTrieMap<K, V> {
    pub(crate) raw: RawSetTrie<K, V>,
}

impl<K, V> Default for SetTrieMap<K, V> {
    /// Creates an empty `SetTrieMap`.
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SetTrieMap<K, V> {
    /// Creates an empty `SetTrieMap`.
    pub fn new() -> Self {
        SetTrieMap {
            raw: RawSetTrie::new(),
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of trie nodes in use, root included.
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord + Clone, V> SetTrieMap<K, V> {
    /// Associates `value` with the key set `key`, returning the value it
    /// replaces. The last assignment wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrieMap;
    /// let mut map: SetTrieMap<i32, char> = SetTrieMap::new();
    /// assert_eq!(map.assign([1, 3], 'A'), None);
    /// assert_eq!(map.assign([3, 1], 'Z'), Some('A'));
    /// assert_eq!(map.get([1, 3]), Some(&'Z'));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn assign<S>(&mut self, key: S, value: V) -> Option<V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let node = self.raw.insert_path(canonical(key));
        self.raw.store(node, value)
    }

    /// Returns `true` if the map holds an entry for exactly this key set.
    pub fn contains<S>(&self, key: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.contains(&canonical(key))
    }

    /// Returns a reference to the value of the key set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrieMap;
    /// let map: SetTrieMap<i32, char> = SetTrieMap::from([(vec![1, 3], 'A')]);
    /// assert_eq!(map.get([1, 3]), Some(&'A'));
    /// assert_eq!(map.get([1]), None);
    /// ```
    pub fn get<S>(&self, key: S) -> Option<&V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let node = self.raw.find_terminal(&canonical(key))?;
        self.raw.value(node)
    }

    /// Returns the value of the key set, or `default` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrieMap;
    /// let map: SetTrieMap<i32, u64> = SetTrieMap::from([(vec![1, 3], 7)]);
    /// assert_eq!(*map.get_or([1, 3], &0xDEADBEEF), 7);
    /// assert_eq!(*map.get_or([100, 101], &0xDEADBEEF), 0xDEADBEEF);
    /// ```
    pub fn get_or<'a, S>(&'a self, key: S, default: &'a V) -> &'a V
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns a mutable reference to the value of the key set.
    pub fn get_mut<S>(&mut self, key: S) -> Option<&mut V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let node = self.raw.find_terminal(&canonical(key))?;
        self.raw.value_mut(node)
    }

    /// Removes the entry of the key set and returns its value, pruning the
    /// nodes no other key set uses.
    ///
    /// # Errors
    ///
    /// Returns [`SetTrieError::MissingSet`] if there is no such entry.
    pub fn remove<S>(&mut self, key: S) -> Result<V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let keys = canonical(key);
        self.raw
            .remove(&keys)
            .ok_or(SetTrieError::MissingSet { len: keys.len() })
    }

    /// Returns `true` if some key set contains every element of `set`.
    pub fn has_superset<S>(&self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.has_superset(&canonical(set))
    }

    /// Returns a lazy iterator over the entries whose key set contains every
    /// element of `set`, in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrieMap;
    /// let map: SetTrieMap<i32, char> =
    ///     SetTrieMap::from([(vec![1, 3, 5], 'B'), (vec![2, 3, 5], 'F'), (vec![2, 4], 'E')]);
    ///
    /// let matches: Vec<(Vec<i32>, &char)> = map.supersets([3, 5]).collect();
    /// assert_eq!(matches, vec![(vec![1, 3, 5], &'B'), (vec![2, 3, 5], &'F')]);
    /// ```
    pub fn supersets<S>(&self, set: S) -> Matches<'_, K, V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.supersets(canonical(set))
    }

    /// Returns `true` if some key set has all its elements in `set`.
    pub fn has_subset<S>(&self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.has_subset(&canonical(set))
    }

    /// Returns a lazy iterator over the entries whose key set has all its
    /// elements in `set`, in ascending key order.
    pub fn subsets<S>(&self, set: S) -> Matches<'_, K, V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.subsets(canonical(set))
    }

    /// Returns an iterator over the entries in ascending key order.
    pub fn iter(&self) -> Matches<'_, K, V> {
        self.raw.iter()
    }

    /// Returns an iterator over the key sets in ascending order.
    pub fn keys(&self) -> MatchKeys<'_, K, V> {
        self.raw.iter().keys()
    }

    /// Returns an iterator over the values, ordered by their key sets.
    pub fn values(&self) -> MatchValues<'_, K, V> {
        self.raw.iter().values()
    }

    /// Collects every entry, in ascending key order.
    pub fn to_vec(&self) -> Vec<(Vec<K>, &V)> {
        self.iter().collect()
    }
}

impl<K: Display, V: Debug> SetTrieMap<K, V> {
    /// Writes the node tree to `out`, terminal nodes followed by
    /// `: {value:?}`.
    pub fn write_tree<W: fmt::Write>(&self, out: &mut W, format: &TreeFormat) -> fmt::Result {
        write_tree(&self.raw, out, format, |w, value| write!(w, ": {:?}", value))
    }

    /// Renders the node tree as a string.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::{SetTrieMap, TreeFormat};
    /// let map: SetTrieMap<i32, char> = SetTrieMap::from([(vec![1, 3], 'A'), (vec![2], 'B')]);
    /// assert_eq!(
    ///     map.tree_string(&TreeFormat::default()),
    ///     "None\n  1\n    3: 'A'\n  2: 'B'\n"
    /// );
    /// ```
    pub fn tree_string(&self, format: &TreeFormat) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_tree(&mut out, format);
        out
    }
}

impl<K: Ord + Clone + Debug, V: Debug> Debug for SetTrieMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone, V: PartialEq> PartialEq for SetTrieMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ord + Clone, V: Eq> Eq for SetTrieMap<K, V> {}

impl<K, V, S> Index<S> for SetTrieMap<K, V>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    type Output = V;

    fn index(&self, key: S) -> &Self::Output {
        self.get(key).expect("no entry found for key set")
    }
}

impl<K, V, S> Extend<(S, V)> for SetTrieMap<K, V>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn extend<I: IntoIterator<Item = (S, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.assign(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(S, V)> for SetTrieMap<K, V>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut map = SetTrieMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S, const N: usize> From<[(S, V); N]> for SetTrieMap<K, V>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn from(array: [(S, V); N]) -> Self {
        array.into_iter().collect()
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a SetTrieMap<K, V> {
    type Item = (Vec<K>, &'a V);
    type IntoIter = Matches<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
