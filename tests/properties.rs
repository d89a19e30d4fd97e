// Property tests for the engines and the diff

use dsanim::diff::{apply_sequence_diff, compute_diff, diff_sequence};
use dsanim::structures::{
    BinarySearchTree, BoundedQueue, BoundedStack, ChainKind, ChainedHashTable, Graph, GraphKind,
    LinkedChain, Sequence, Structure, TreeKind,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn chain_kind() -> impl Strategy<Value = ChainKind> {
    prop_oneof![
        Just(ChainKind::Singly),
        Just(ChainKind::Doubly),
        Just(ChainKind::Circular),
        Just(ChainKind::DoublyCircular),
    ]
}

proptest! {
    #[test]
    fn test_avl_invariants_hold(
        inserts in prop::collection::vec(0i32..200, 0..150),
        deletes in prop::collection::vec(0i32..200, 0..100)
    ) {
        let mut tree = BinarySearchTree::new(TreeKind::Avl);
        let mut model = BTreeSet::new();
        for value in &inserts {
            prop_assert_eq!(tree.insert(*value), model.insert(*value));
        }
        for value in &deletes {
            prop_assert_eq!(tree.delete(value), model.remove(value));
        }

        prop_assert!(tree.is_balanced());
        prop_assert!(tree.is_ordered());
        prop_assert_eq!(tree.len(), model.len());
        let expected: Vec<&i32> = model.iter().collect();
        prop_assert_eq!(tree.in_order(), expected);
    }

    #[test]
    fn test_bst_in_order_is_sorted(values in prop::collection::vec(-50i32..50, 0..80)) {
        let mut tree = BinarySearchTree::new(TreeKind::Bst);
        for value in &values {
            tree.insert(*value);
        }
        let model: BTreeSet<i32> = values.iter().copied().collect();
        let expected: Vec<&i32> = model.iter().collect();
        prop_assert_eq!(tree.in_order(), expected);
        prop_assert!(tree.is_ordered());
    }

    #[test]
    fn test_hash_table_matches_a_map(
        ops in prop::collection::vec((0u32..64, any::<i16>(), any::<bool>()), 0..200)
    ) {
        let mut table: ChainedHashTable<u32, i16> = ChainedHashTable::new(4);
        let mut model = BTreeMap::new();
        for (key, value, remove) in ops {
            if remove {
                prop_assert_eq!(table.delete(&key), model.remove(&key).is_some());
            } else {
                prop_assert_eq!(table.set(key, value), model.insert(key, value));
            }
            prop_assert!(table.load_factor() <= 0.75);
        }

        prop_assert_eq!(table.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(table.get(key), Some(value));
        }
    }

    #[test]
    fn test_sequence_diff_rebuilds_target(
        prev in prop::collection::hash_set(0i32..40, 0..12),
        next in prop::collection::hash_set(0i32..40, 0..12)
    ) {
        let prev: Vec<i32> = prev.into_iter().collect();
        let next: Vec<i32> = next.into_iter().collect();
        let transitions = diff_sequence(&prev, &next);
        let rebuilt: Vec<i32> = apply_sequence_diff(&prev, &transitions).expect("apply");
        prop_assert_eq!(rebuilt, next);
    }

    #[test]
    fn test_self_diff_is_empty(
        data in prop::collection::vec(0i32..5, 0..20),
        tree_values in prop::collection::vec(0i32..100, 0..30)
    ) {
        let seq = Sequence::from_vec(data).snapshot_json().expect("encode");
        prop_assert!(compute_diff(&seq, &seq, "array").is_empty());

        let mut tree = BinarySearchTree::new(TreeKind::Avl);
        for value in tree_values {
            tree.insert(value);
        }
        let tree = tree.snapshot_json().expect("encode");
        prop_assert!(compute_diff(&tree, &tree, "tree").is_empty());
    }

    #[test]
    fn test_self_diff_is_empty_for_every_kind(
        kind in chain_kind(),
        values in prop::collection::vec(0i32..20, 0..16),
        edges in prop::collection::vec((0usize..16, 0usize..16), 0..24),
        undirected in any::<bool>()
    ) {
        let mut list = LinkedChain::new(kind);
        let mut stack = BoundedStack::new(16);
        let mut queue = BoundedQueue::new(16);
        let mut table: ChainedHashTable<i32, usize> = ChainedHashTable::new(2);
        let mut heap = BinarySearchTree::new(TreeKind::Heap);
        let graph_kind = if undirected { GraphKind::Undirected } else { GraphKind::Directed };
        let mut graph = Graph::new(graph_kind, false);
        let mut ids = Vec::new();
        for (i, value) in values.iter().enumerate() {
            list.append(*value);
            stack.push(*value);
            queue.enqueue(*value);
            table.set(*value, i);
            heap.insert(*value);
            ids.push(graph.add_node(*value));
        }
        for (s, t) in edges {
            if s < ids.len() && t < ids.len() {
                graph.add_edge(&ids[s], &ids[t], None);
            }
        }

        let snapshots = [
            (list.snapshot_json().expect("encode"), "linkedlist"),
            (stack.snapshot_json().expect("encode"), "stack"),
            (queue.snapshot_json().expect("encode"), "queue"),
            (table.snapshot_json().expect("encode"), "hashtable"),
            (heap.snapshot_json().expect("encode"), "tree"),
            (graph.snapshot_json().expect("encode"), "graph"),
        ];
        for (snapshot, kind) in &snapshots {
            prop_assert!(compute_diff(snapshot, snapshot, kind).is_empty(), "{}", kind);
        }
    }

    #[test]
    fn test_heap_matches_a_sorted_model(
        inserts in prop::collection::vec(-30i32..30, 0..60),
        deletes in prop::collection::vec(-30i32..30, 0..30)
    ) {
        let mut heap = BinarySearchTree::new(TreeKind::Heap);
        let mut model = inserts.clone();
        for value in &inserts {
            heap.insert(*value);
        }
        for value in &deletes {
            let position = model.iter().position(|v| v == value);
            prop_assert_eq!(heap.delete(value), position.is_some());
            if let Some(position) = position {
                model.remove(position);
            }
            prop_assert!(heap.is_ordered());
        }

        model.sort_unstable();
        prop_assert_eq!(heap.len(), model.len());
        let mut drained = Vec::new();
        while let Some(value) = heap.pop_min() {
            drained.push(value);
        }
        prop_assert_eq!(drained, model);
    }

    #[test]
    fn test_chain_round_trip(
        kind in chain_kind(),
        ops in prop::collection::vec((0u8..4, any::<i32>()), 0..60)
    ) {
        let mut list = LinkedChain::new(kind);
        for (op, value) in ops {
            match op {
                0 => list.append(value),
                1 => list.prepend(value),
                2 => {
                    list.remove_head();
                }
                _ => {
                    list.remove_tail();
                }
            }
        }

        let snapshot = list.snapshot();
        prop_assert_eq!(snapshot.elements.len(), list.len());
        let restored = LinkedChain::restore(snapshot.clone()).expect("restore");
        prop_assert_eq!(restored.snapshot(), snapshot);
        prop_assert_eq!(restored.values(), list.values());
    }
}
