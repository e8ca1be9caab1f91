// Property tests for HashTable against a std HashMap model.
//
// Keys come from a small domain so inserts, removals and lookups hit each
// other often. The model only inserts keys it does not already hold, since
// the table stores duplicates side by side.
//
// Checked after every step:
//  - find agrees with the model for every key in the domain.
//  - len() == model.len().
//  - capacity is prime.
//  - load factor <= max_load_factor (or the table is at most full at 1.0).
//  - capacity only grows, and expansions keeps pace with capacity changes.
//  - under Pack no tombstone ever appears.
//  - no two occupied slots hold the same key.
use std::collections::HashMap;
use std::collections::HashSet;

use oa_hash::DeletionPolicy;
use oa_hash::HashFunc;
use oa_hash::HashTable;
use oa_hash::HashTableConfig;
use oa_hash::HashTableError;
use oa_hash::SlotState;
use oa_hash::hash_fns::pjw_hash;
use oa_hash::hash_fns::simple_hash;
use oa_hash::hash_fns::universal_hash;
use oa_hash::prime::is_prime;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, i64),
    Remove(usize),
    Find(usize),
    Clear,
}

fn op_strategy(keys: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..keys, any::<i64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0..keys).prop_map(Op::Remove),
        2 => (0..keys).prop_map(Op::Find),
        1 => Just(Op::Clear),
    ]
}

fn key(k: usize) -> String {
    format!("key-{k}")
}

fn check(
    table: &HashTable<i64>,
    model: &HashMap<String, i64>,
    keys: usize,
    max_load: f64,
    policy: DeletionPolicy,
) -> Result<(), TestCaseError> {
    for k in 0..keys {
        let key = key(k);
        match model.get(&key) {
            Some(v) => prop_assert_eq!(table.find(key.as_str()), Ok(v)),
            None => prop_assert_eq!(table.find(key.as_str()), Err(HashTableError::NotFound)),
        }
    }

    let stats = table.stats();
    prop_assert_eq!(table.len(), model.len());
    prop_assert!(is_prime(stats.table_size));
    if max_load < 1.0 {
        prop_assert!(stats.load_factor <= max_load, "{:?}", stats);
    } else {
        prop_assert!(stats.count <= stats.table_size);
    }

    let mut seen = HashSet::new();
    for slot in table.raw_view() {
        if policy == DeletionPolicy::Pack {
            prop_assert_ne!(slot.state(), SlotState::Deleted);
        }
        if slot.state() == SlotState::Occupied {
            prop_assert!(seen.insert(slot.key().to_string()), "duplicate {}", slot.key());
        }
    }
    Ok(())
}

const PRIMARIES: [HashFunc; 3] = [simple_hash, pjw_hash, universal_hash];

fn policy_strategy() -> impl Strategy<Value = DeletionPolicy> {
    prop_oneof![Just(DeletionPolicy::Mark), Just(DeletionPolicy::Pack)]
}

proptest! {
    #[test]
    fn prop_table_matches_model(
        capacity in 1usize..20,
        primary in 0..PRIMARIES.len(),
        double_hashing in any::<bool>(),
        max_load in prop_oneof![Just(0.5), Just(0.7), Just(0.9), Just(1.0)],
        growth in prop_oneof![Just(1.5), Just(2.0), Just(3.0)],
        policy in policy_strategy(),
        keys in 1usize..40,
        ops in proptest::collection::vec(op_strategy(40), 1..200),
    ) {
        let mut config = HashTableConfig::new(PRIMARIES[primary])
            .initial_capacity(capacity)
            .max_load_factor(max_load)
            .growth_factor(growth)
            .deletion_policy(policy);
        if double_hashing {
            config = config.secondary_hash(universal_hash);
        }
        let mut table: HashTable<i64> = HashTable::new(config).unwrap();
        let mut model: HashMap<String, i64> = HashMap::new();

        let mut last_capacity = table.capacity();
        let mut growth_events = 0;

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let key = key(k % keys);
                    if !model.contains_key(&key) {
                        prop_assert_eq!(table.insert(key.as_str(), v), Ok(()));
                        model.insert(key, v);
                    }
                }
                Op::Remove(k) => {
                    let key = key(k % keys);
                    let expected = if model.remove(&key).is_some() {
                        Ok(())
                    } else {
                        Err(HashTableError::NotFound)
                    };
                    prop_assert_eq!(table.remove(key.as_str()), expected);
                }
                Op::Find(k) => {
                    let key = key(k % keys);
                    prop_assert_eq!(table.find(key.as_str()).ok(), model.get(&key));
                }
                Op::Clear => {
                    table.clear();
                    model.clear();
                }
            }

            if table.capacity() != last_capacity {
                prop_assert!(table.capacity() > last_capacity);
                last_capacity = table.capacity();
                growth_events += 1;
            }
            prop_assert!(table.stats().expansions >= growth_events);

            check(&table, &model, keys, max_load, policy)?;
        }
    }

    #[test]
    fn prop_duplicate_inserts_stack(copies in 1usize..10) {
        let mut table: HashTable<usize> = HashTable::new(HashTableConfig::new(simple_hash)).unwrap();
        for i in 0..copies {
            table.insert("same", i).unwrap();
        }
        prop_assert_eq!(table.len(), copies);
        for i in 0..copies {
            prop_assert_eq!(table.find("same"), Ok(&i));
            table.remove("same").unwrap();
        }
        prop_assert_eq!(table.find("same"), Err(HashTableError::NotFound));
    }
}
