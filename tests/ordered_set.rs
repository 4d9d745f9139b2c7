use std::collections::HashSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use schema_tables::OrderedSet;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Discard(u8),
    Pop { last: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..16).prop_map(Op::Add),
        2 => (0u8..16).prop_map(Op::Discard),
        1 => any::<bool>().prop_map(|last| Op::Pop { last }),
    ]
}

/// Insertion-ordered reference: a plain vector with linear lookups.
fn apply(model: &mut Vec<u8>, set: &mut OrderedSet<u8>, op: &Op) -> Result<(), TestCaseError> {
    match *op {
        Op::Add(k) => {
            let fresh = !model.contains(&k);
            if fresh {
                model.push(k);
            }
            prop_assert_eq!(set.insert(k), fresh);
        }
        Op::Discard(k) => {
            let pos = model.iter().position(|&m| m == k);
            if let Some(pos) = pos {
                model.remove(pos);
            }
            prop_assert_eq!(set.remove(&k), pos.is_some());
        }
        Op::Pop { last } => {
            let want = if model.is_empty() {
                None
            } else if last {
                model.pop()
            } else {
                Some(model.remove(0))
            };
            prop_assert_eq!(set.pop(last), want);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn matches_reference_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut model = Vec::new();
        let mut set = OrderedSet::new();
        for op in &ops {
            apply(&mut model, &mut set, op)?;

            prop_assert_eq!(set.len(), model.len());
            prop_assert_eq!(set.is_empty(), model.is_empty());
            prop_assert_eq!(set.first(), model.first());
            prop_assert_eq!(set.last(), model.last());

            let forward: Vec<u8> = set.iter().copied().collect();
            prop_assert_eq!(&forward, &model);
            let backward: Vec<u8> = set.iter().rev().copied().collect();
            let mut reversed = model.clone();
            reversed.reverse();
            prop_assert_eq!(backward, reversed);
        }
        for k in 0u8..16 {
            prop_assert_eq!(set.contains(&k), model.contains(&k));
        }
    }

    #[test]
    fn equality_with_unordered_sets_ignores_order(keys in prop::collection::hash_set(any::<u16>(), 0..32)) {
        let forward: OrderedSet<u16> = keys.iter().copied().collect();
        let backward: OrderedSet<u16> = forward.iter().rev().copied().collect();
        prop_assert!(forward == keys);
        prop_assert!(backward == keys);
        if keys.len() > 1 {
            prop_assert!(forward != backward);
        }
    }
}

#[test]
fn pop_on_singleton_empties_it() {
    for last in [true, false] {
        let mut set: OrderedSet<&str> = ["only"].into_iter().collect();
        assert_eq!(set.pop(last), Some("only"));
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert_eq!(set.last(), None);
        assert_eq!(set.pop(last), None);
    }
}

#[test]
fn readding_a_removed_key_moves_it_to_the_end() {
    let mut set: OrderedSet<char> = "abcd".chars().collect();
    assert!(set.remove(&'b'));
    assert!(set.insert('b'));
    assert!(!set.insert('a'));
    assert_eq!(set.iter().collect::<String>(), "acdb");
    let unordered: HashSet<char> = "bdca".chars().collect();
    assert!(set == unordered);
}
