//! Property Tests
//!
//! Random operation sequences are replayed against the table and a plain
//! `HashMap` model. After every step both must agree on:
//! - Which keys are present (at most one record per key)
//! - Conflict on insert of a present key, not-found on update/delete/query
//!   of an absent key
//! - The values a query transfers back out
//! - Iteration visiting every record exactly once

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use keytable::{entity, Table, TableError};

entity! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Item {
        pub label: String,
        pub qty: i64,
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, Item),
    Update(u8, Item),
    Delete(u8),
    Query(u8),
}

fn item() -> impl Strategy<Value = Item> {
    ("[a-z]{0,8}", any::<i64>()).prop_map(|(label, qty)| Item { label, qty })
}

fn op() -> impl Strategy<Value = Op> {
    // Small key space so conflicts and misses are common
    let key = 0u8..16;
    prop_oneof![
        (key.clone(), item()).prop_map(|(k, v)| Op::Insert(k, v)),
        (key.clone(), item()).prop_map(|(k, v)| Op::Update(k, v)),
        key.clone().prop_map(Op::Delete),
        key.prop_map(Op::Query),
    ]
}

fn check_iteration(table: &Table<u8>, model: &HashMap<u8, Item>) -> Result<(), TestCaseError> {
    let keys: Vec<u8> = table.iterator().map(|record| *record.key()).collect();
    let unique: HashSet<u8> = keys.iter().copied().collect();
    prop_assert_eq!(keys.len(), unique.len());
    prop_assert_eq!(unique, model.keys().copied().collect::<HashSet<_>>());
    prop_assert_eq!(table.len(), model.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..Default::default() })]

    #[test]
    fn table_matches_model(ops in prop::collection::vec(op(), 1..64)) {
        let mut table: Table<u8> = Table::new("items").with_schema(&Item::default());
        let mut model: HashMap<u8, Item> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let result = table.insert(key, &value);
                    if model.contains_key(&key) {
                        prop_assert!(matches!(result, Err(TableError::PrimaryKeyConflict)));
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert(key, value);
                    }
                }
                Op::Update(key, value) => {
                    let result = table.update(key, &value);
                    match model.get_mut(&key) {
                        Some(existing) => {
                            prop_assert!(result.is_ok());
                            *existing = value;
                        }
                        None => prop_assert!(matches!(result, Err(TableError::RecordNotFound))),
                    }
                }
                Op::Delete(key) => {
                    let result = table.delete(&key);
                    if model.remove(&key).is_some() {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(matches!(result, Err(TableError::RecordNotFound)));
                    }
                }
                Op::Query(key) => {
                    let mut dest = Item::default();
                    let result = table.query_by_primary_key(&key, &mut dest);
                    match model.get(&key) {
                        Some(expected) => {
                            prop_assert!(result.is_ok());
                            prop_assert_eq!(&dest, expected);
                        }
                        None => {
                            prop_assert!(matches!(result, Err(TableError::RecordNotFound)));
                            prop_assert_eq!(dest, Item::default());
                        }
                    }
                }
            }

            check_iteration(&table, &model)?;
        }
    }

    #[test]
    fn insert_then_query_returns_value(key in any::<u8>(), value in item()) {
        let mut table: Table<u8> = Table::new("items").with_schema(&Item::default());
        table.insert(key, &value).unwrap();

        let mut dest = Item::default();
        table.query_by_primary_key(&key, &mut dest).unwrap();
        prop_assert_eq!(dest, value);
    }

    #[test]
    fn second_insert_keeps_first(key in any::<u8>(), first in item(), second in item()) {
        let mut table: Table<u8> = Table::new("items").with_schema(&Item::default());
        table.insert(key, &first).unwrap();
        prop_assert!(matches!(table.insert(key, &second), Err(TableError::PrimaryKeyConflict)));

        let mut dest = Item::default();
        table.query_by_primary_key(&key, &mut dest).unwrap();
        prop_assert_eq!(dest, first);
    }
}
