//! Property-based invariant tests for the copy-on-write state tree.
//!
//! 1. An update never mutates the map it was applied to.
//! 2. The updated map holds the new value at the path.
//! 3. Every subtree off the updated path is shared, not copied.

use imtui::{StateMap, Value};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const KEYS: [&str; 3] = ["a", "b", "c"];

/// Three levels of maps, each keyed by `KEYS`, with integer leaves below.
fn base() -> StateMap {
    let leaf: StateMap = KEYS.iter().map(|k| (*k, Value::Int(0))).collect();
    let mid: StateMap = KEYS.iter().map(|k| (*k, Value::Map(leaf.clone()))).collect();
    KEYS.iter().map(|k| (*k, Value::Map(mid.clone()))).collect()
}

fn path_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(KEYS.to_vec()), 1..=3)
}

fn same(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (Some(Value::Map(a)), Some(Value::Map(b))) => a.ptr_eq(b),
        _ => a == b,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. The old root is untouched
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn assoc_path_does_not_mutate(path in path_strategy(), v in any::<i64>()) {
        let m = base();
        let before = m.clone();
        let _ = m.assoc_path(&path, Value::Int(v)).unwrap();
        prop_assert_eq!(&m, &before);
        prop_assert!(m.ptr_eq(&before));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. The new value is readable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn assoc_path_then_get_path(path in path_strategy(), v in any::<i64>()) {
        let updated = base().assoc_path(&path, Value::Int(v)).unwrap();
        prop_assert_eq!(updated.get_path(&path), Some(Value::Int(v)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Siblings of the path are shared
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn assoc_path_shares_siblings(path in path_strategy(), v in any::<i64>()) {
        let m = base();
        let updated = m.assoc_path(&path, Value::Int(v)).unwrap();

        for depth in 0..path.len() {
            for key in KEYS {
                if key == path[depth] {
                    continue;
                }
                let mut sibling = path[..depth].to_vec();
                sibling.push(key);
                prop_assert!(
                    same(&m.get_path(&sibling), &updated.get_path(&sibling)),
                    "subtree {:?} was not shared after writing {:?}",
                    sibling,
                    path
                );
            }
        }
    }
}
