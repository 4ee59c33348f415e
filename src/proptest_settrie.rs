use super::*;
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Sets over a small universe, so that queries hit stored sets often
fn small_set(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(0..12i32, 0..max_len)
}

fn sets(min_sets: usize, max_sets: usize) -> impl Strategy<Value = Vec<Vec<i32>>> {
    proptest::collection::vec(small_set(7), min_sets..max_sets)
}

fn set_value_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(Vec<i32>, i32)>> {
    proptest::collection::vec((small_set(6), proptest::num::i32::ANY), min_pairs..max_pairs)
}

fn canonical_vec(set: &[i32]) -> Vec<i32> {
    set.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Stored sets in ascending lexicographic order
fn model(sets: &[Vec<i32>]) -> BTreeSet<Vec<i32>> {
    sets.iter().map(|s| canonical_vec(s)).collect()
}

fn is_subset(small: &[i32], big: &[i32]) -> bool {
    small.iter().all(|e| big.contains(e))
}

#[derive(Debug, Clone)]
enum Operation {
    Add(Vec<i32>),
    Remove(Vec<i32>),
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Operation>> {
    proptest::collection::vec(
        prop_oneof![
            small_set(5).prop_map(Operation::Add),
            small_set(5).prop_map(Operation::Remove),
        ],
        0..max_ops,
    )
}

/// Counts nodes a set-trie holding `stored` needs: one per distinct prefix
/// plus the root.
fn expected_node_count(stored: &BTreeSet<Vec<i32>>) -> usize {
    let prefixes: BTreeSet<&[i32]> = stored
        .iter()
        .flat_map(|s| (1..=s.len()).map(move |n| &s[..n]))
        .collect();
    prefixes.len() + 1
}

#[test]
fn test_settrie_edge_cases() {
    let mut trie: SetTrie<i32> = SetTrie::new();

    // the empty set is a regular member
    assert!(trie.add(Vec::<i32>::new()));
    assert!(trie.contains(Vec::<i32>::new()));
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.node_count(), 1);
    assert!(trie.has_subset([1, 2, 3]));
    assert!(trie.has_superset(Vec::<i32>::new()));

    // a long set is one long path
    let long: Vec<i32> = (0..1000).rev().collect();
    trie.add(&long);
    assert_eq!(trie.node_count(), 1001);
    assert!(trie.has_superset([0, 500, 999]));
    assert!(!trie.has_superset([1000]));

    // extreme element values sort correctly
    trie.add([i32::MAX, i32::MIN]);
    assert_eq!(
        trie.supersets([i32::MAX]).collect::<Vec<_>>(),
        vec![vec![i32::MIN, i32::MAX]]
    );

    trie.remove(&long).unwrap();
    trie.remove(Vec::<i32>::new()).unwrap();
    trie.remove([i32::MIN, i32::MAX]).unwrap();
    assert!(trie.is_empty());
    assert_eq!(trie.node_count(), 1);
}

#[test]
fn test_settrie_node_reuse() {
    let mut trie: SetTrie<i32> = SetTrie::new();

    for i in 0..100 {
        trie.add([i, i + 1, i + 2]);
    }
    let peak = trie.raw.pool.nodes.len();

    for i in 0..100 {
        trie.remove([i, i + 1, i + 2]).unwrap();
    }
    assert_eq!(trie.node_count(), 1);

    for i in 0..100 {
        trie.add([i, i + 1, i + 2]);
    }

    // recycled nodes and value slots are reused rather than appended
    assert_eq!(trie.raw.pool.nodes.len(), peak);
    assert_eq!(trie.raw.data.len(), 100);
    assert_eq!(trie.len(), 100);
}

#[test]
fn test_empty_settrie_behavior() {
    let trie: SetTrie<i32> = SetTrie::new();

    assert!(trie.is_empty());
    assert_eq!(trie.iter().next(), None);
    assert_eq!(trie.supersets([1]).next(), None);
    assert_eq!(trie.subsets([1]).next(), None);
    assert!(!trie.has_superset(Vec::<i32>::new()));
    assert!(!trie.has_subset([1, 2]));
    assert_eq!(trie.tree_string(&TreeFormat::default()), "None\n");
}

/// Shuffled prefixes of `0..universe`, the shape the stress tests draw from
fn random_prefix(rng: &mut ChaCha8Rng, elements: &mut [i32]) -> Vec<i32> {
    elements.shuffle(rng);
    let len = rng.random_range(0..elements.len());
    elements[..len].to_vec()
}

fn brute_force_query(
    stored: &BTreeSet<Vec<i32>>,
    query: &[i32],
) -> (Vec<Vec<i32>>, Vec<Vec<i32>>) {
    let supersets = stored.iter().filter(|s| is_subset(query, s)).cloned().collect();
    let subsets = stored.iter().filter(|s| is_subset(s, query)).cloned().collect();
    (supersets, subsets)
}

#[test]
fn test_settrie_large_random_agrees_with_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut elements: Vec<i32> = (0..30).collect();
    let mut trie: SetTrie<i32> = SetTrie::new();
    let mut reference: BTreeSet<Vec<i32>> = BTreeSet::new();

    let mut added = 0;
    for _ in 0..10_000 {
        let set = random_prefix(&mut rng, &mut elements);
        if trie.add(&set) {
            added += 1;
        }
        assert!(!trie.add(&set));
        reference.insert(canonical_vec(&set));
    }
    assert_eq!(added, reference.len());
    assert_eq!(trie.len(), reference.len());
    assert_eq!(trie.to_vec(), reference.iter().cloned().collect::<Vec<_>>());

    let mut queries: Vec<Vec<i32>> = (0..100)
        .map(|_| random_prefix(&mut rng, &mut elements))
        .collect();
    // short queries, so that supersets are found too
    for _ in 0..100 {
        elements.shuffle(&mut rng);
        let len = rng.random_range(1..=4);
        queries.push(elements[..len].to_vec());
    }

    for query in &queries {
        let (supersets, subsets) = brute_force_query(&reference, &canonical_vec(query));

        assert_eq!(trie.has_superset(query), !supersets.is_empty());
        assert_eq!(trie.supersets(query).collect::<Vec<_>>(), supersets);
        assert_eq!(trie.has_subset(query), !subsets.is_empty());
        assert_eq!(trie.subsets(query).collect::<Vec<_>>(), subsets);
    }
}

#[test]
fn test_settrie_large_random_removal() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut elements: Vec<i32> = (0..30).collect();
    let mut trie: SetTrie<i32> = SetTrie::new();
    let mut reference: BTreeSet<Vec<i32>> = BTreeSet::new();

    for _ in 0..5_000 {
        let set = random_prefix(&mut rng, &mut elements);
        trie.add(&set);
        reference.insert(canonical_vec(&set));
    }

    let doomed: Vec<Vec<i32>> = reference.iter().filter(|_| rng.random_bool(0.5)).cloned().collect();
    for set in &doomed {
        assert_eq!(trie.remove(set), Ok(()));
        reference.remove(set);
    }

    assert_eq!(trie.to_vec(), reference.iter().cloned().collect::<Vec<_>>());
    assert_eq!(trie.node_count(), expected_node_count(&reference));

    for _ in 0..50 {
        let query = canonical_vec(&random_prefix(&mut rng, &mut elements));
        let (supersets, subsets) = brute_force_query(&reference, &query);
        assert_eq!(trie.supersets(&query).collect::<Vec<_>>(), supersets);
        assert_eq!(trie.subsets(&query).collect::<Vec<_>>(), subsets);
    }
}

proptest! {
    #[test]
    fn iteration_matches_sorted_model(stored in sets(0, 60)) {
        let trie: SetTrie<i32> = stored.iter().collect();
        let expected: Vec<Vec<i32>> = model(&stored).into_iter().collect();

        prop_assert_eq!(trie.to_vec(), expected.clone());
        prop_assert_eq!(trie.len(), expected.len());
    }

    #[test]
    fn contains_matches_model(stored in sets(0, 60), probes in sets(1, 30)) {
        let trie: SetTrie<i32> = stored.iter().collect();
        let reference = model(&stored);

        for probe in &probes {
            prop_assert_eq!(trie.contains(probe), reference.contains(&canonical_vec(probe)));
        }
    }

    #[test]
    fn supersets_match_brute_force(stored in sets(0, 60), query in small_set(9)) {
        let trie: SetTrie<i32> = stored.iter().collect();
        let query = canonical_vec(&query);

        let expected: Vec<Vec<i32>> = model(&stored)
            .into_iter()
            .filter(|s| is_subset(&query, s))
            .collect();

        prop_assert_eq!(trie.has_superset(&query), !expected.is_empty());
        prop_assert_eq!(trie.supersets(&query).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn subsets_match_brute_force(stored in sets(0, 60), query in small_set(8)) {
        let trie: SetTrie<i32> = stored.iter().collect();
        let query = canonical_vec(&query);

        let expected: Vec<Vec<i32>> = model(&stored)
            .into_iter()
            .filter(|s| is_subset(s, &query))
            .collect();

        prop_assert_eq!(trie.has_subset(&query), !expected.is_empty());
        prop_assert_eq!(trie.subsets(&query).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn add_remove_sequence_matches_model(ops in operations(80)) {
        let mut trie: SetTrie<i32> = SetTrie::new();
        let mut reference: BTreeSet<Vec<i32>> = BTreeSet::new();

        for op in &ops {
            match op {
                Operation::Add(set) => {
                    prop_assert_eq!(trie.add(set), reference.insert(canonical_vec(set)));
                }
                Operation::Remove(set) => {
                    let removed = reference.remove(&canonical_vec(set));
                    prop_assert_eq!(trie.remove(set).is_ok(), removed);
                }
            }
        }

        prop_assert_eq!(trie.to_vec(), reference.iter().cloned().collect::<Vec<_>>());
        // pruning leaves exactly the nodes of live prefixes
        prop_assert_eq!(trie.node_count(), expected_node_count(&reference));
        prop_assert_eq!(trie.has_superset(Vec::<i32>::new()), !reference.is_empty());
    }

    #[test]
    fn removing_everything_leaves_bare_root(stored in sets(1, 60)) {
        let mut trie: SetTrie<i32> = stored.iter().collect();

        for set in model(&stored) {
            prop_assert!(trie.remove(&set).is_ok());
            prop_assert!(trie.remove(&set).is_err());
        }

        prop_assert!(trie.is_empty());
        prop_assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn map_last_assignment_wins(pairs in set_value_pairs(1, 60)) {
        let mut map: SetTrieMap<i32, i32> = SetTrieMap::new();
        let mut reference: BTreeMap<Vec<i32>, i32> = BTreeMap::new();

        for (key, value) in &pairs {
            prop_assert_eq!(
                map.assign(key, *value),
                reference.insert(canonical_vec(key), *value)
            );
        }

        prop_assert_eq!(map.len(), reference.len());
        let entries: Vec<(Vec<i32>, i32)> = map.iter().map(|(k, v)| (k, *v)).collect();
        prop_assert_eq!(entries, reference.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn map_queries_agree_with_set_trie(pairs in set_value_pairs(0, 60), query in small_set(6)) {
        let map: SetTrieMap<i32, i32> = pairs.iter().map(|(k, v)| (k, *v)).collect();
        let trie: SetTrie<i32> = pairs.iter().map(|(k, _)| k).collect();

        prop_assert_eq!(
            map.supersets(&query).keys().collect::<Vec<_>>(),
            trie.supersets(&query).collect::<Vec<_>>()
        );
        prop_assert_eq!(
            map.subsets(&query).keys().collect::<Vec<_>>(),
            trie.subsets(&query).collect::<Vec<_>>()
        );
        prop_assert_eq!(map.has_subset(&query), trie.has_subset(&query));
        prop_assert_eq!(map.has_superset(&query), trie.has_superset(&query));
    }

    #[test]
    fn multimap_keeps_every_value(pairs in set_value_pairs(0, 60)) {
        let map: SetTrieMultiMap<i32, i32> = pairs.iter().map(|(k, v)| (k, *v)).collect();
        let mut reference: BTreeMap<Vec<i32>, Vec<i32>> = BTreeMap::new();
        for (key, value) in &pairs {
            reference.entry(canonical_vec(key)).or_default().push(*value);
        }

        prop_assert_eq!(map.len(), reference.len());
        for (key, values) in &reference {
            prop_assert_eq!(map.get(key), Some(values.as_slice()));
            prop_assert_eq!(map.count(key), values.len());
        }

        let flattened: Vec<(Vec<i32>, i32)> = reference
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), *v)))
            .collect();
        prop_assert_eq!(map.iter().map(|(k, v)| (k, *v)).collect::<Vec<_>>(), flattened);
        prop_assert_eq!(map.keys().collect::<Vec<_>>(), reference.keys().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn multimap_queries_match_brute_force(pairs in set_value_pairs(0, 80), query in small_set(9)) {
        let map: SetTrieMultiMap<i32, i32> = pairs.iter().map(|(k, v)| (k, *v)).collect();
        let mut reference: BTreeMap<Vec<i32>, Vec<i32>> = BTreeMap::new();
        for (key, value) in &pairs {
            reference.entry(canonical_vec(key)).or_default().push(*value);
        }
        let query = canonical_vec(&query);

        let flatten = |keep: &dyn Fn(&[i32]) -> bool| -> Vec<(Vec<i32>, i32)> {
            reference
                .iter()
                .filter(|(k, _)| keep(k.as_slice()))
                .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), *v)))
                .collect()
        };
        let supersets = flatten(&|k: &[i32]| is_subset(&query, k));
        let subsets = flatten(&|k: &[i32]| is_subset(k, &query));

        let distinct_keys = |pairs: &[(Vec<i32>, i32)]| -> Vec<Vec<i32>> {
            let mut keys: Vec<Vec<i32>> = pairs.iter().map(|(k, _)| k.clone()).collect();
            keys.dedup();
            keys
        };
        let values = |pairs: &[(Vec<i32>, i32)]| -> Vec<i32> {
            pairs.iter().map(|(_, v)| *v).collect()
        };

        prop_assert_eq!(map.has_superset(&query), !supersets.is_empty());
        prop_assert_eq!(
            map.supersets(&query).map(|(k, v)| (k, *v)).collect::<Vec<_>>(),
            supersets.clone()
        );
        prop_assert_eq!(map.supersets(&query).keys().collect::<Vec<_>>(), distinct_keys(&supersets));
        prop_assert_eq!(map.supersets(&query).values().copied().collect::<Vec<_>>(), values(&supersets));

        prop_assert_eq!(map.has_subset(&query), !subsets.is_empty());
        prop_assert_eq!(
            map.subsets(&query).map(|(k, v)| (k, *v)).collect::<Vec<_>>(),
            subsets.clone()
        );
        prop_assert_eq!(map.subsets(&query).keys().collect::<Vec<_>>(), distinct_keys(&subsets));
        prop_assert_eq!(map.subsets(&query).values().copied().collect::<Vec<_>>(), values(&subsets));
    }

    #[test]
    fn settrie_round_trip_serialization(stored in sets(1, 40)) {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Snapshot {
            sets: Vec<Vec<i32>>,
        }

        let trie: SetTrie<i32> = stored.iter().collect();
        let snapshot = Snapshot { sets: trie.to_vec() };

        let serialized = serde_json::to_string(&snapshot).unwrap();
        let deserialized: Snapshot = serde_json::from_str(&serialized).unwrap();
        prop_assert_eq!(&deserialized, &snapshot);

        let rebuilt: SetTrie<i32> = deserialized.sets.into_iter().collect();
        prop_assert_eq!(rebuilt, trie);
    }
}

#[test]
fn test_settrie_btree_set_equivalence() {
    proptest!(|(stored in sets(1, 80))| {
        let trie: SetTrie<i32> = stored.iter().collect();
        let reference = model(&stored);

        for set in &reference {
            assert!(trie.contains(set));
            assert!(trie.has_superset(set));
            assert!(trie.has_subset(set));
        }

        assert_eq!(trie.len(), reference.len());
        assert_eq!(
            trie.iter().collect::<BTreeSet<_>>(),
            reference
        );
    });
}
