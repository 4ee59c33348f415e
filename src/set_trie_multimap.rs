use std::borrow::Borrow;
use std::fmt::{self, Debug, Display};

use crate::engine::{canonical, RawSetTrie};
use crate::error::{Result, SetTrieError};
use crate::format::{write_tree, TreeFormat};
use crate::iter::{MatchKeys, MultiMatches, MultiValues};

/// A set-keyed map holding any number of values per key set.
///
/// Values of one key set are kept in insertion order, duplicates included.
/// Queries yield one `(key set, &value)` pair per stored value.
///
/// # Examples
///
/// ```
/// use settrie::SetTrieMultiMap;
///
/// let mut map: SetTrieMultiMap<i32, &str> = SetTrieMultiMap::new();
/// assert_eq!(map.assign([1, 3], "A"), 1);
/// assert_eq!(map.assign([3, 1], "AA"), 2);
/// map.assign([2, 3, 5], "F");
///
/// assert_eq!(map.get([1, 3]), Some(&["A", "AA"][..]));
/// assert_eq!(map.count([1, 3]), 2);
///
/// let values: Vec<&str> = map.supersets([3]).values().copied().collect();
/// assert_eq!(values, vec!["A", "AA", "F"]);
/// ```
#[derive(Clone)]
pub struct SetTrieMultiMap<K, V> {
    pub(crate) raw: RawSetTrie<K, Vec<V>>,
}

impl<K, V> Default for SetTrieMultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SetTrieMultiMap<K, V> {
    /// Creates an empty `SetTrieMultiMap`.
    pub fn new() -> Self {
        SetTrieMultiMap {
            raw: RawSetTrie::new(),
        }
    }

    /// Returns the number of distinct key sets.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if no key set holds a value.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of trie nodes in use, root included.
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Removes every key set and all their values.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord + Clone, V> SetTrieMultiMap<K, V> {
    /// Appends `value` to the values of the key set and returns how many
    /// values the key set now has.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrieMultiMap;
    /// let mut map: SetTrieMultiMap<i32, char> = SetTrieMultiMap::new();
    /// assert_eq!(map.assign([1, 3], 'A'), 1);
    /// assert_eq!(map.assign([1, 3], 'B'), 2);
    /// assert_eq!(map.assign([1, 3], 'A'), 3);
    /// assert_eq!(map.assign([2, 4, 5], 'Y'), 1);
    /// ```
    pub fn assign<S>(&mut self, key: S, value: V) -> usize
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let node = self.raw.insert_path(canonical(key));
        let values = self.raw.value_or_insert_with(node, Vec::new);
        values.push(value);
        values.len()
    }

    /// Returns `true` if the map holds values for exactly this key set.
    pub fn contains<S>(&self, key: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.contains(&canonical(key))
    }

    /// Returns the number of values of the key set, 0 if it is absent.
    pub fn count<S>(&self, key: S) -> usize
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.get(key).map_or(0, <[V]>::len)
    }

    /// Returns the values of the key set in insertion order.
    pub fn get<S>(&self, key: S) -> Option<&[V]>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        let node = self.raw.find_terminal(&canonical(key))?;
        self.raw.value(node).map(Vec::as_slice)
    }

    /// Returns the values of the key set, or `default` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use settrie::SetTrieMultiMap;
    /// let map: SetTrieMultiMap<i32, char> = SetTrieMultiMap::from([(vec![1], 'a')]);
    /// assert_eq!(map.get_or([1], &[]), &['a']);
    /// assert!(map.get_or([44], &[]).is_empty());
    /// ```
    pub fn get_or<'a, S>(&'a self, key: S, default: &'a [V]) -> &'a [V]
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns an iterator over the values of the key set; empty if the key
    /// set is absent.
    pub fn iter_get<S>(&self, key: S) -> std::slice::Iter<'_, V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.get(key).unwrap_or(&[]).iter()
    }

    /// Removes the key set and returns all its values.
    ///
    /// # Errors
    ///
    /// Returns [`SetTrieError::MissingSet`] if the key set holds no values.
    pub fn remove<S>(&mut self, key: S) -> Result<Vec<V>>
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

    /// Returns a lazy iterator over the `(key set, &value)` pairs whose key
    /// set contains every element of `set`.
    pub fn supersets<S>(&self, set: S) -> MultiMatches<'_, K, V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        MultiMatches::new(self.raw.supersets(canonical(set)))
    }

    /// Returns `true` if some key set has all its elements in `set`.
    pub fn has_subset<S>(&self, set: S) -> bool
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        self.raw.has_subset(&canonical(set))
    }

    /// Returns a lazy iterator over the `(key set, &value)` pairs whose key
    /// set has all its elements in `set`.
    pub fn subsets<S>(&self, set: S) -> MultiMatches<'_, K, V>
    where
        S: IntoIterator,
        S::Item: Borrow<K>,
    {
        MultiMatches::new(self.raw.subsets(canonical(set)))
    }

    /// Returns an iterator over every `(key set, &value)` pair, in ascending
    /// key order.
    pub fn iter(&self) -> MultiMatches<'_, K, V> {
        MultiMatches::new(self.raw.iter())
    }

    /// Returns an iterator over the distinct key sets.
    pub fn keys(&self) -> MatchKeys<'_, K, Vec<V>> {
        self.raw.iter().keys()
    }

    /// Returns an iterator over every value, ordered by key set.
    pub fn values(&self) -> MultiValues<'_, K, V> {
        self.iter().values()
    }

    /// Collects every `(key set, &value)` pair.
    pub fn to_vec(&self) -> Vec<(Vec<K>, &V)> {
        self.iter().collect()
    }
}

impl<K: Display, V: Debug> SetTrieMultiMap<K, V> {
    /// Writes the node tree to `out`, terminal nodes followed by
    /// `: {values:?}`.
    pub fn write_tree<W: fmt::Write>(&self, out: &mut W, format: &TreeFormat) -> fmt::Result {
        write_tree(&self.raw, out, format, |w, values| write!(w, ": {:?}", values))
    }

    /// Renders the node tree as a string.
    pub fn tree_string(&self, format: &TreeFormat) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_tree(&mut out, format);
        out
    }
}

impl<K: Ord + Clone + Debug, V: Debug> Debug for SetTrieMultiMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.raw.iter()).finish()
    }
}

impl<K: Ord + Clone, V: PartialEq> PartialEq for SetTrieMultiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.raw.iter().eq(other.raw.iter())
    }
}

impl<K: Ord + Clone, V: Eq> Eq for SetTrieMultiMap<K, V> {}

impl<K, V, S> Extend<(S, V)> for SetTrieMultiMap<K, V>
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

impl<K, V, S> FromIterator<(S, V)> for SetTrieMultiMap<K, V>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut map = SetTrieMultiMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S, const N: usize> From<[(S, V); N]> for SetTrieMultiMap<K, V>
where
    K: Ord + Clone,
    S: IntoIterator,
    S::Item: Borrow<K>,
{
    fn from(array: [(S, V); N]) -> Self {
        array.into_iter().collect()
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a SetTrieMultiMap<K, V> {
    type Item = (Vec<K>, &'a V);
    type IntoIter = MultiMatches<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
