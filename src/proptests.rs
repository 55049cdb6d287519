use super::*;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::BTreeMap;

// A small alphabet makes shared prefixes, and therefore splits, common.
fn short_key() -> impl Strategy<Value = String> {
    "[a-c]{0,6}"
}

fn key_value_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec((short_key(), proptest::num::i32::ANY), min_pairs..max_pairs)
}

#[derive(Debug, Clone)]
enum TrieOp {
    Insert(String, i32),
    Remove(String),
    RemoveAndCompact(String),
    Compact,
}

fn trie_ops() -> impl Strategy<Value = Vec<TrieOp>> {
    let op = prop_oneof![
        4 => (short_key(), any::<i32>()).prop_map(|(k, v)| TrieOp::Insert(k, v)),
        2 => short_key().prop_map(TrieOp::Remove),
        2 => short_key().prop_map(TrieOp::RemoveAndCompact),
        1 => Just(TrieOp::Compact),
    ];
    proptest::collection::vec(op, 1..120)
}

fn distinct_pairs() -> impl Strategy<Value = Vec<(i32, u8)>> {
    proptest::collection::btree_set((0i32..40, 0u8..4), 1..60)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

#[derive(Debug, Clone)]
enum SparseOp {
    Set(usize, i32),
    Add(usize, i32),
}

fn sparse_ops() -> impl Strategy<Value = Vec<SparseOp>> {
    let op = prop_oneof![
        (0usize..64, -2i32..=2).prop_map(|(i, v)| SparseOp::Set(i, v)),
        (0usize..64, -2i32..=2).prop_map(|(i, v)| SparseOp::Add(i, v)),
    ];
    proptest::collection::vec(op, 1..150)
}

proptest! {
    #[test]
    fn triemap_matches_btreemap(ops in trie_ops()) {
        let mut trie = TrieMap::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                TrieOp::Insert(key, value) => {
                    prop_assert_eq!(trie.insert(key.as_str(), value), model.insert(key, value));
                }
                TrieOp::Remove(key) => {
                    prop_assert_eq!(trie.remove(key.as_str()), model.remove(&key));
                }
                TrieOp::RemoveAndCompact(key) => {
                    prop_assert_eq!(trie.remove_and_compact(key.as_str()), model.remove(&key));
                }
                TrieOp::Compact => {
                    trie.compact();
                }
            }
            prop_assert_eq!(trie.len(), model.len());
        }

        let pairs: Vec<(String, i32)> = trie.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(String, i32)> = model.clone().into_iter().collect();
        prop_assert_eq!(pairs, expected);

        for key in model.keys() {
            prop_assert!(trie.contains_key(key.as_str()));
        }

        trie.compact();
        prop_assert_eq!(trie.compact(), 0);
        let after: Vec<(String, i32)> = trie.into_iter().collect();
        let expected: Vec<(String, i32)> = model.into_iter().collect();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn eager_compaction_keeps_tree_minimal(
        pairs in key_value_pairs(1, 80),
        to_remove in proptest::collection::vec(short_key(), 0..40)
    ) {
        let mut trie = TrieMap::new();
        for (key, value) in &pairs {
            trie.insert(key, *value);
        }
        prop_assert_eq!(trie.compact(), 0);

        for key in &to_remove {
            trie.remove_and_compact(key);
            prop_assert_eq!(trie.clone().compact(), 0);
        }
    }

    #[test]
    fn prefix_iter_matches_filtered_model(pairs in key_value_pairs(0, 60), prefix in "[a-c]{0,3}") {
        let mut trie = TrieMap::new();
        let mut model = BTreeMap::new();
        for (key, value) in &pairs {
            trie.insert(key, *value);
            model.insert(key.clone(), *value);
        }

        let found: Vec<(String, i32)> = trie.prefix_iter(prefix.as_str()).map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(String, i32)> = model
            .into_iter()
            .filter(|(k, _)| k.starts_with(prefix.as_str()))
            .collect();
        prop_assert_eq!(trie.starts_with(prefix.as_str()), !expected.is_empty());
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn entry_api_matches_direct_methods(pairs in key_value_pairs(1, 60)) {
        let mut via_entry = TrieMap::new();
        let mut direct = TrieMap::new();

        for (key, value) in &pairs {
            via_entry.entry(key).and_modify(|v: &mut i64| *v += i64::from(*value)).or_insert(i64::from(*value));

            let sum = direct.get(key).copied().unwrap_or(0i64) + i64::from(*value);
            direct.insert(key, sum);
        }

        prop_assert_eq!(via_entry, direct);
    }

    #[test]
    fn bounded_multimap_keeps_top_mappings(pairs in distinct_pairs(), bound in 1usize..20) {
        let options = BoundedOptions::new(bound);
        let mut map = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(1)).unwrap();
        for (key, value) in &pairs {
            prop_assert!(map.insert(*key, *value));
            prop_assert!(map.range() <= bound);
        }

        let mut sorted = pairs.clone();
        sorted.sort();
        let expected: Vec<(i32, u8)> = sorted[sorted.len().saturating_sub(bound)..].to_vec();
        let kept: Vec<(i32, u8)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn bounded_multimap_retaining_lowest(pairs in distinct_pairs(), bound in 1usize..20, fair in any::<bool>()) {
        let options = BoundedOptions::new(bound)
            .with_retention(Retention::Lowest)
            .with_fair(fair);
        let mut map = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(9)).unwrap();
        map.insert_all(pairs.iter().copied());

        let mut keys: Vec<i32> = pairs.iter().map(|(k, _)| *k).collect();
        keys.sort();
        keys.truncate(bound);
        let kept: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(kept, keys);
    }

    #[test]
    fn bounded_multimap_key_bound(pairs in distinct_pairs(), bound in 1usize..10) {
        let options = BoundedOptions::new(bound).with_policy(BoundPolicy::Keys);
        let mut map = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(3)).unwrap();
        map.insert_all(pairs.iter().copied());

        let mut model: BTreeMap<i32, Vec<u8>> = BTreeMap::new();
        for (key, value) in &pairs {
            model.entry(*key).or_default().push(*value);
        }
        while model.len() > bound {
            model.pop_first();
        }

        prop_assert_eq!(map.len(), model.len());
        for (key, mut values) in model {
            values.sort();
            let kept: Vec<u8> = map.get(&key).map(|set| set.iter().copied().collect()).unwrap_or_default();
            prop_assert_eq!(kept, values);
        }
    }

    #[test]
    fn bounded_map_keeps_highest_keys(keys in proptest::collection::vec(0i32..1000, 1..100), bound in 1usize..30) {
        let mut map = BoundedSortedMap::new(bound).unwrap();
        for key in &keys {
            map.insert(*key, ());
            prop_assert!(map.len() <= bound);
        }

        let mut expected: Vec<i32> = keys.clone();
        expected.sort();
        expected.dedup();
        let expected = expected[expected.len().saturating_sub(bound)..].to_vec();
        let kept: Vec<i32> = map.keys().copied().collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn sparse_array_matches_dense(ops in sparse_ops()) {
        let mut sparse = SparseIntArray::new(64);
        let mut dense = vec![0i32; 64];

        for op in ops {
            match op {
                SparseOp::Set(index, value) => {
                    prop_assert_eq!(sparse.set(index, value).unwrap(), dense[index]);
                    dense[index] = value;
                }
                SparseOp::Add(index, delta) => {
                    dense[index] += delta;
                    prop_assert_eq!(sparse.add(index, delta).unwrap(), dense[index]);
                }
            }
        }

        let nonzero: Vec<usize> = (0..64).filter(|&i| dense[i] != 0).collect();
        prop_assert_eq!(sparse.element_indices(), nonzero.as_slice());
        prop_assert_eq!(sparse.cardinality(), nonzero.len());
        prop_assert_eq!(sparse.to_vec(), dense.clone());
        for (index, value) in sparse.iter() {
            prop_assert_eq!(value, dense[index]);
        }
        prop_assert_eq!(SparseIntArray::from_dense(&dense), sparse);
    }

    #[test]
    fn indexer_ids_round_trip(items in proptest::collection::vec("[a-e]{1,3}", 0..80)) {
        let indexer: HashIndexer<String> = items.iter().cloned().collect();
        for item in &items {
            let id = indexer.find(item.as_str());
            prop_assert!(id.is_some());
            prop_assert_eq!(indexer.lookup(id.unwrap_or_default()), Some(item));
        }
        let distinct: std::collections::BTreeSet<&String> = items.iter().collect();
        prop_assert_eq!(indexer.len(), distinct.len());
    }

    #[test]
    fn counter_sum_matches_input(items in proptest::collection::vec(0u8..10, 0..100)) {
        let counter: ObjectCounter<u8> = items.iter().copied().collect();
        prop_assert_eq!(counter.sum(), items.len());
        for value in 0u8..10 {
            let expected = items.iter().filter(|&&v| v == value).count();
            prop_assert_eq!(counter.get_count(&value), expected);
        }
    }
}

#[cfg(feature = "serde")]
mod serde_round_trips {
    use super::*;

    proptest! {
        #[test]
        fn sparse_array_json_round_trip(quarters in proptest::collection::vec(-12i8..12, 0..40)) {
            // Quarters print and parse exactly.
            let dense: Vec<f64> = quarters.iter().map(|&q| f64::from(q) / 4.0).collect();
            let array = SparseDoubleArray::from_dense(&dense);
            let json = serde_json::to_string(&array).unwrap();
            let back: SparseDoubleArray = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, array);
        }
    }

    #[test]
    fn test_sparse_array_rejects_unsorted_json() {
        let json = r#"{"indices":[3,1],"values":[1,2],"length":5}"#;
        let err = serde_json::from_str::<SparseIntArray>(json).unwrap_err();
        assert!(err.to_string().contains("sorted and unique"));
    }

    #[test]
    fn test_options_and_score_round_trip() {
        let options = BoundedOptions::new(5)
            .with_policy(BoundPolicy::Keys)
            .with_retention(Retention::Lowest)
            .with_fair(true);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(serde_json::from_str::<BoundedOptions>(&json).unwrap(), options);

        assert_eq!(serde_json::to_string(&Score(0.5)).unwrap(), "0.5");
        assert_eq!(serde_json::from_str::<Score>("0.25").unwrap(), Score(0.25));
    }
}
