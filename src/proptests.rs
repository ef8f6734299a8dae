use super::*;

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Reference semantics: one lookup per segment boundary.
fn reference_matches(patterns: &BTreeSet<Vec<u8>>, key: &[u8]) -> bool {
    if patterns.contains(key) {
        return true;
    }
    if key.is_empty() {
        return false;
    }
    if patterns.contains(&b"*"[..]) {
        return true;
    }
    (1..=key.len())
        .filter(|&end| end == key.len() || key[end] == b'.')
        .any(|end| {
            let mut wildcard = key[..end].to_vec();
            wildcard.extend_from_slice(b".*");
            patterns.contains(&wildcard)
        })
}

/// Small alphabet so that shared prefixes, separators and stars collide often
fn small_key() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'.', b'*']), 0..7)
}

/// Well-formed dotted pattern: segments, optionally a trailing `.*`, or `*`
fn dotted_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("*".to_string()),
        4 => prop::collection::vec("[a-c]{1,3}", 1..4).prop_map(|s| s.join(".")),
        4 => prop::collection::vec("[a-c]{1,3}", 1..4).prop_map(|s| format!("{}.*", s.join("."))),
    ]
}

fn dotted_key() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,3}", 0..5).prop_map(|s| s.join("."))
}

#[derive(Debug, Clone)]
enum Op {
    Insert(Vec<u8>, u8),
    Delete(Vec<u8>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (small_key(), any::<u8>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => small_key().prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn tree_behaves_like_btreemap(ops in prop::collection::vec(op(), 0..64)) {
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let (updated, replaced) = tree.insert(&key, value);
                    prop_assert_eq!(replaced, model.insert(key, value).is_some());
                    tree = updated;
                }
                Op::Delete(key) => {
                    let updated = tree.delete(&key);
                    prop_assert_eq!(updated.is_some(), model.remove(&key).is_some());
                    if let Some(updated) = updated {
                        tree = updated;
                    }
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        for (key, value) in &model {
            prop_assert_eq!(tree.get(key), Some(value));
        }
    }

    #[test]
    fn matcher_agrees_with_reference(
        patterns in prop::collection::btree_set(small_key(), 0..12),
        keys in prop::collection::vec(small_key(), 1..16),
    ) {
        let tree: Tree<()> = patterns.iter().map(|p| (p, ())).collect();
        for key in keys.iter().chain(patterns.iter()) {
            prop_assert_eq!(
                tree.matches_wildcard(key),
                reference_matches(&patterns, key),
                "key {:?}",
                String::from_utf8_lossy(key)
            );
        }
    }

    #[test]
    fn matcher_agrees_on_keys_ending_in_separator(
        patterns in prop::collection::btree_set(small_key(), 0..12),
        keys in prop::collection::vec(small_key(), 1..16),
    ) {
        let tree: Tree<()> = patterns.iter().map(|p| (p, ())).collect();
        let cut = patterns.iter().chain(keys.iter()).flat_map(|k| {
            k.iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'.')
                .map(move |(i, _)| &k[..=i])
        });
        for key in cut {
            prop_assert_eq!(
                tree.matches_wildcard(key),
                reference_matches(&patterns, key),
                "key {:?}",
                String::from_utf8_lossy(key)
            );
        }
    }

    #[test]
    fn matcher_agrees_after_deletes(
        patterns in prop::collection::vec(small_key(), 1..12),
        removed in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        keys in prop::collection::vec(small_key(), 1..16),
    ) {
        let mut tree: Tree<()> = patterns.iter().map(|p| (p, ())).collect();
        let mut live: BTreeSet<Vec<u8>> = patterns.iter().cloned().collect();
        for idx in removed {
            let key = idx.get(&patterns);
            if let Some(updated) = tree.delete(key) {
                tree = updated;
            }
            live.remove(key);
        }

        for key in &keys {
            prop_assert_eq!(tree.matches_wildcard(key), reference_matches(&live, key));
        }
    }

    #[test]
    fn universal_grants_every_non_empty_key(
        patterns in prop::collection::vec(dotted_pattern(), 0..8),
        key in small_key(),
    ) {
        let tree: Tree<()> = patterns
            .iter()
            .map(|p| (p.as_str(), ()))
            .chain(std::iter::once(("*", ())))
            .collect();
        prop_assert_eq!(tree.matches_wildcard(&key), !key.is_empty() || tree.contains_key(b""));
    }

    #[test]
    fn empty_key_matches_only_when_stored(
        patterns in prop::collection::vec(dotted_pattern(), 0..8),
        store_empty in any::<bool>(),
    ) {
        let mut tree: Tree<()> = patterns.iter().map(|p| (p.as_str(), ())).collect();
        if store_empty {
            tree = tree.insert(b"", ()).0;
        }
        prop_assert_eq!(tree.matches_wildcard(b""), store_empty);
    }

    #[test]
    fn exact_patterns_match_themselves(patterns in prop::collection::vec(small_key(), 1..12)) {
        let tree: Tree<()> = patterns.iter().map(|p| (p, ())).collect();
        for pattern in &patterns {
            prop_assert!(tree.matches_wildcard(pattern));
        }
    }

    #[test]
    fn segment_wildcard_grants_prefix_and_descendants(
        others in prop::collection::vec(dotted_pattern(), 0..8),
        prefix in "[a-c]{1,3}(\\.[a-c]{1,3}){0,2}",
        suffix in prop::collection::vec("[a-c]{1,3}", 0..3),
    ) {
        let wildcard = format!("{prefix}.*");
        let tree: Tree<()> = others
            .iter()
            .map(|p| (p.as_str(), ()))
            .chain(std::iter::once((wildcard.as_str(), ())))
            .collect();

        prop_assert!(tree.matches_wildcard(prefix.as_bytes()));
        let mut key = prefix.clone();
        for segment in &suffix {
            key.push('.');
            // Key cut right after the separator, where `*` may be its own edge
            prop_assert!(tree.matches_wildcard(key.as_bytes()), "key {}", key);
            key.push_str(segment);
            prop_assert!(tree.matches_wildcard(key.as_bytes()), "key {}", key);
        }
        key.push('.');
        prop_assert!(tree.matches_wildcard(key.as_bytes()), "key {}", key);
    }

    #[test]
    fn segment_wildcard_respects_boundary(
        prefix in "[a-c]{1,3}(\\.[a-c]{1,3}){0,2}",
        extra in "[a-c]{1,3}",
        rest in "(\\.[a-c]{1,3}){0,2}",
    ) {
        // Only the wildcard is stored, so `prefix` + `extra` must not match
        let tree: Tree<()> = [(format!("{prefix}.*"), ())].into_iter().collect();
        let key = format!("{prefix}{extra}{rest}");
        prop_assert!(!tree.matches_wildcard(key.as_bytes()), "key {}", key);
    }

    #[test]
    fn strict_prefixes_of_exact_patterns_do_not_match(
        exact in prop::collection::vec(dotted_key(), 1..8),
        cut in any::<prop::sample::Index>(),
    ) {
        // No wildcards stored: a key ending mid-edge never matches
        let exact: Vec<String> = exact.into_iter().filter(|p| !p.is_empty()).collect();
        prop_assume!(!exact.is_empty());
        let patterns: BTreeSet<Vec<u8>> = exact.iter().map(|p| p.as_bytes().to_vec()).collect();
        let tree: Tree<()> = patterns.iter().map(|p| (p, ())).collect();

        let pattern = cut.get(&exact);
        for end in 1..pattern.len() {
            let key = &pattern.as_bytes()[..end];
            prop_assert_eq!(tree.matches_wildcard(key), patterns.contains(key));
        }
    }

    #[test]
    fn matching_is_idempotent(
        patterns in prop::collection::vec(dotted_pattern(), 0..8),
        key in dotted_key(),
    ) {
        let tree: Tree<()> = patterns.iter().map(|p| (p.as_str(), ())).collect();
        let first = tree.matches_wildcard(key.as_bytes());
        prop_assert_eq!(first, tree.matches_wildcard(key.as_bytes()));
        prop_assert_eq!(first, tree.clone().matches_wildcard(key.as_bytes()));
    }
}
