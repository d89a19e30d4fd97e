// Integration tests for the structure engines

use dsanim::structures::{
    BinarySearchTree, BoundedQueue, BoundedStack, ChainKind, ChainedHashTable, Graph, GraphKind,
    LinkedChain, Sequence, Structure, TreeKind,
};
use dsanim::error::SnapshotError;
use serde_json::json;

#[test]
fn test_sequence_example_scenario() {
    let mut arr = Sequence::from_vec(vec![1, 2, 3, 4, 5]);
    arr.push(6);
    assert!(arr.insert(2, 99));
    assert_eq!(arr.pop(), Some(6));
    assert_eq!(arr.data(), &[1, 2, 99, 3, 4]);
}

#[test]
fn test_sequence_snapshot_shape() {
    let arr = Sequence::from_vec(vec![3, 1, 2]);
    let snapshot = arr.snapshot_json().expect("encode");
    assert_eq!(snapshot, json!({"data": [3, 1, 2], "dimensions": 1}));

    let restored: Sequence<i32> = Sequence::restore_json(snapshot).expect("restore");
    assert_eq!(restored, arr);
}

#[test]
fn test_chain_operations_in_every_variant() {
    for kind in [
        ChainKind::Singly,
        ChainKind::Doubly,
        ChainKind::Circular,
        ChainKind::DoublyCircular,
    ] {
        let mut list = LinkedChain::new(kind);
        list.append(2);
        list.append(3);
        list.prepend(1);
        assert!(list.insert_at(3, 4));
        assert!(!list.insert_at(9, 5));
        assert_eq!(list.values(), vec![&1, &2, &3, &4], "{:?}", kind);

        assert_eq!(list.remove_head(), Some(1));
        assert_eq!(list.remove_tail(), Some(4));
        assert_eq!(list.find(&3), Some(1));
        assert!(list.set(0, 20));
        assert_eq!(list.get(0), Some(&20));

        list.append(30);
        list.reverse();
        assert_eq!(list.values(), vec![&30, &3, &20], "{:?}", kind);
        // A circular scan must stop after one lap
        assert_eq!(list.iter().count(), 3, "{:?}", kind);
    }
}

#[test]
fn test_chain_round_trip_keeps_ids() {
    let mut list = LinkedChain::new(ChainKind::Doubly);
    list.append("a".to_string());
    list.append("b".to_string());
    list.remove_head();
    list.append("c".to_string());

    let snapshot = list.snapshot();
    let mut restored = LinkedChain::restore(snapshot.clone()).expect("restore");
    assert_eq!(restored.snapshot(), snapshot);

    // New ids never collide with restored ones
    restored.append("d".to_string());
    let ids: Vec<String> = restored.iter().map(|(id, _)| id.to_string()).collect();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn test_chain_restore_rejects_wrong_length() {
    let bad = json!({"type": "singly", "elements": [{"id": "node-0", "value": 1}], "length": 2});
    let result: Result<LinkedChain<i32>, _> = LinkedChain::restore_json(bad);
    assert!(matches!(result, Err(SnapshotError::LengthMismatch { declared: 2, actual: 1 })));
}

#[test]
fn test_bounded_stack_rejects_push_when_full() {
    let mut stack = BoundedStack::new(2);
    assert!(stack.push(1));
    assert!(stack.push(2));
    assert!(stack.is_full());
    assert!(!stack.push(3));
    assert_eq!(stack.items(), &[1, 2]);
    assert_eq!(stack.peek(), Some(&2));
    assert_eq!(stack.pop(), Some(2));
    assert_eq!(stack.pop(), Some(1));
    assert_eq!(stack.pop(), None);
}

#[test]
fn test_bounded_queue_fifo_and_capacity() {
    let mut queue = BoundedQueue::new(2);
    assert!(queue.enqueue('a'));
    assert!(queue.enqueue('b'));
    assert!(!queue.enqueue('c'));
    assert_eq!(queue.peek(), Some(&'a'));
    assert_eq!(queue.rear(), Some(&'b'));
    assert_eq!(queue.dequeue(), Some('a'));
    assert!(queue.enqueue('c'));
    assert_eq!(queue.iter().copied().collect::<String>(), "bc");
}

#[test]
fn test_bounded_round_trips() {
    let mut stack = BoundedStack::new(4);
    stack.push("x".to_string());
    stack.push("y".to_string());
    let restored: BoundedStack<String> = BoundedStack::restore(stack.snapshot()).expect("restore");
    assert_eq!(restored, stack);
    assert_eq!(restored.peek().map(String::as_str), Some("y"));
    assert_eq!(restored.max_size(), 4);

    let mut queue = BoundedQueue::new(3);
    for value in [1, 2, 3] {
        queue.enqueue(value);
    }
    queue.dequeue();
    queue.enqueue(4);
    let mut restored: BoundedQueue<i32> =
        BoundedQueue::restore_json(queue.snapshot_json().expect("encode")).expect("restore");
    assert_eq!(restored, queue);
    assert!(restored.is_full());
    assert_eq!(restored.dequeue(), Some(2));
    assert_eq!(restored.rear(), Some(&4));
}

#[test]
fn test_bounded_restore_rejects_overfull_snapshot() {
    let bad = json!({"items": [1, 2, 3], "maxSize": 2});
    let result: Result<BoundedStack<i32>, _> = BoundedStack::restore_json(bad);
    assert!(matches!(result, Err(SnapshotError::CapacityExceeded { len: 3, max_size: 2 })));
}

#[test]
fn test_hash_table_overwrites_and_deletes() {
    let mut table: ChainedHashTable<String, i32> = ChainedHashTable::default();
    assert_eq!(table.set("apple".to_string(), 1), None);
    assert_eq!(table.set("apple".to_string(), 2), Some(1));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&"apple".to_string()), Some(&2));
    assert!(table.delete(&"apple".to_string()));
    assert!(!table.delete(&"apple".to_string()));
    assert!(table.is_empty());
}

#[test]
fn test_hash_table_grows_past_load_factor() {
    let mut table: ChainedHashTable<i32, i32> = ChainedHashTable::new(4);
    // 3/4 is not above the threshold; the fourth insert is
    for key in 0..3 {
        table.set(key, key * 10);
    }
    assert_eq!(table.capacity(), 4);
    table.set(3, 30);
    assert_eq!(table.capacity(), 8);

    for key in 0..4 {
        assert_eq!(table.get(&key), Some(&(key * 10)));
    }
}

#[test]
fn test_hash_table_round_trip_preserves_chain_order() {
    let mut table: ChainedHashTable<i32, String> = ChainedHashTable::new(4);
    table.set(1, "one".to_string());
    table.set(5, "five".to_string());
    table.set(2, "two".to_string());

    let snapshot = table.snapshot();
    let restored = ChainedHashTable::restore(snapshot.clone()).expect("restore");
    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(restored.bucket_entries(1).len(), 2);
}

#[test]
fn test_hash_table_round_trip_keeps_lookups() {
    let mut table: ChainedHashTable<String, i32> = ChainedHashTable::new(2);
    for (i, key) in ["apple", "pear", "fig", "kiwi"].into_iter().enumerate() {
        table.set(key.to_string(), i as i32);
    }
    table.delete(&"pear".to_string());

    let mut restored: ChainedHashTable<String, i32> =
        ChainedHashTable::restore_json(table.snapshot_json().expect("encode")).expect("restore");
    assert_eq!(restored.snapshot(), table.snapshot());
    assert_eq!(restored.capacity(), table.capacity());
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.get(&"kiwi".to_string()), Some(&3));
    assert_eq!(restored.get(&"pear".to_string()), None);
    assert_eq!(restored.set("fig".to_string(), 20), Some(2));
}

#[test]
fn test_bst_rejects_duplicates_and_deletes_with_successor() {
    let mut tree = BinarySearchTree::new(TreeKind::Bst);
    for value in [50, 30, 70, 20, 40, 60, 80] {
        assert!(tree.insert(value));
    }
    assert!(!tree.insert(40));
    assert_eq!(tree.len(), 7);

    assert!(tree.delete(&30));
    assert!(!tree.delete(&30));
    assert_eq!(tree.pre_order(), vec![&50, &40, &20, &70, &60, &80]);
    assert_eq!(tree.in_order(), vec![&20, &40, &50, &60, &70, &80]);
    assert_eq!(tree.post_order(), vec![&20, &40, &60, &80, &70, &50]);
    assert_eq!(tree.min(), Some(&20));
    assert_eq!(tree.max(), Some(&80));
    assert!(tree.contains(&60));
}

#[test]
fn test_avl_stays_balanced_on_sorted_input() {
    let mut tree = BinarySearchTree::new(TreeKind::Avl);
    for value in 1..=127 {
        tree.insert(value);
    }
    assert!(tree.is_balanced());
    assert!(tree.is_ordered());
    assert_eq!(tree.height(), 7);

    for value in (1..=127).step_by(2) {
        assert!(tree.delete(&value));
    }
    assert!(tree.is_balanced());
    assert_eq!(tree.len(), 63);
}

#[test]
fn test_tree_snapshot_shape_and_round_trip() {
    let mut tree = BinarySearchTree::new(TreeKind::Avl);
    for value in [2, 1, 3] {
        tree.insert(value);
    }
    let snapshot = tree.snapshot_json().expect("encode");
    assert_eq!(snapshot["type"], "avl");
    assert_eq!(snapshot["size"], 3);
    assert_eq!(snapshot["root"]["value"], 2);
    assert_eq!(snapshot["root"]["height"], 2);
    assert_eq!(snapshot["root"]["left"]["value"], 1);
    assert!(snapshot["root"]["left"]["left"].is_null());

    let restored: BinarySearchTree<i32> = BinarySearchTree::restore_json(snapshot).expect("restore");
    assert_eq!(restored.in_order(), tree.in_order());
    assert_eq!(restored.snapshot(), tree.snapshot());
}

#[test]
fn test_tree_restore_rejects_out_of_order_bst() {
    let bad = json!({
        "type": "bst",
        "size": 2,
        "root": {
            "id": "tree-node-0", "value": 5, "height": 2, "right": null,
            "left": {"id": "tree-node-1", "value": 9, "height": 1, "left": null, "right": null}
        }
    });
    let result: Result<BinarySearchTree<i32>, _> = BinarySearchTree::restore_json(bad);
    assert!(matches!(result, Err(SnapshotError::Unordered)));
}

#[test]
fn test_tree_restore_rejects_unbalanced_avl() {
    let chain = json!({
        "type": "avl",
        "size": 3,
        "root": {
            "id": "tree-node-0", "value": 1, "height": 3, "left": null,
            "right": {
                "id": "tree-node-1", "value": 2, "height": 2, "left": null,
                "right": {"id": "tree-node-2", "value": 3, "height": 1, "left": null, "right": null}
            }
        }
    });
    let result: Result<BinarySearchTree<i32>, _> = BinarySearchTree::restore_json(chain.clone());
    assert!(matches!(result, Err(SnapshotError::Unbalanced)));

    // The same shape is a valid plain search tree
    let mut plain = chain;
    plain["type"] = json!("bst");
    let tree: BinarySearchTree<i32> = BinarySearchTree::restore_json(plain).expect("restore");
    assert!(tree.contains(&3));
    assert_eq!(tree.height(), 3);
}

#[test]
fn test_heap_round_trip_and_order_check() {
    let mut heap = BinarySearchTree::new(TreeKind::Heap);
    for value in [7, 2, 9, 4, 4] {
        heap.insert(value);
    }
    let snapshot = heap.snapshot_json().expect("encode");
    assert_eq!(snapshot["type"], "heap");
    assert_eq!(snapshot["root"]["value"], 2);

    let mut restored: BinarySearchTree<i32> =
        BinarySearchTree::restore_json(snapshot.clone()).expect("restore");
    assert_eq!(restored.snapshot(), heap.snapshot());
    assert_eq!(restored.pop_min(), Some(2));
    assert_eq!(restored.pop_min(), Some(4));
    assert_eq!(restored.pop_min(), Some(4));

    let mut bad = snapshot;
    bad["root"]["value"] = json!(100);
    let result: Result<BinarySearchTree<i32>, _> = BinarySearchTree::restore_json(bad);
    assert!(matches!(result, Err(SnapshotError::Unordered)));
}

fn sample_graph(kind: GraphKind) -> (Graph<String>, Vec<String>) {
    let mut graph = Graph::new(kind, true);
    let ids: Vec<String> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| graph.add_node(name.to_string()))
        .collect();
    for (s, t, w) in [(0, 1, 4.0), (0, 2, 2.0), (1, 2, 1.0), (1, 3, 5.0), (2, 3, 8.0)] {
        assert!(graph.add_edge(&ids[s], &ids[t], Some(w)));
    }
    (graph, ids)
}

#[test]
fn test_graph_bfs_follows_insertion_order() {
    let (graph, ids) = sample_graph(GraphKind::Undirected);
    let order: Vec<&str> = graph.bfs(&ids[0]).into_iter().map(|n| n.value.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C", "D"]);

    let mut visited = Vec::new();
    graph.dfs_with(&ids[0], |node| visited.push(node.value.clone()));
    assert_eq!(visited, vec!["A", "B", "C", "D"]);
}

#[test]
fn test_graph_traversal_from_borrowed_and_unknown_ids() {
    let (graph, _) = sample_graph(GraphKind::Directed);
    let start = String::from("node-1");
    let order: Vec<&str> = graph.dfs(&start).into_iter().map(|n| n.value.as_str()).collect();
    drop(start);
    assert_eq!(order, vec!["B", "C", "D"]);

    assert!(graph.dfs("node-42").is_empty());
    assert!(graph.bfs("node-42").is_empty());
}

#[test]
fn test_undirected_edges_are_mirrored() {
    let (mut graph, ids) = sample_graph(GraphKind::Undirected);
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.edges().len(), 10);
    assert_eq!(graph.edge(&ids[2], &ids[0]).and_then(|e| e.weight), Some(2.0));
    assert_eq!(graph.degree(&ids[1]), 3);

    assert!(graph.remove_edge(&ids[2], &ids[0]));
    assert!(graph.edge(&ids[0], &ids[2]).is_none());
    assert_eq!(graph.edge_count(), 4);

    assert!(graph.remove_node(&ids[3]));
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node_count(), 3);
}

#[test]
fn test_directed_reachability() {
    let (graph, ids) = sample_graph(GraphKind::Directed);
    assert!(graph.has_path(&ids[0], &ids[3]));
    assert!(!graph.has_path(&ids[3], &ids[0]));
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.neighbors(&ids[3]).len(), 0);
}

#[test]
fn test_graph_restore_counter_skips_past_ids() {
    let (mut graph, ids) = sample_graph(GraphKind::Undirected);
    graph.remove_node(&ids[0]);
    let snapshot = graph.snapshot();

    let mut restored = Graph::restore(snapshot).expect("restore");
    let fresh = restored.add_node("E".to_string());
    assert_eq!(fresh, "node-4");
    assert_eq!(restored.node_count(), 4);
}

#[test]
fn test_graph_round_trip_keeps_edges_and_order() {
    for kind in [GraphKind::Directed, GraphKind::Undirected] {
        let (graph, ids) = sample_graph(kind);
        let snapshot = graph.snapshot();
        let restored: Graph<String> =
            Graph::restore_json(graph.snapshot_json().expect("encode")).expect("restore");
        assert_eq!(restored.snapshot(), snapshot, "{:?}", kind);
        assert_eq!(restored.edge_count(), graph.edge_count());
        assert_eq!(restored.edge(&ids[1], &ids[3]).and_then(|e| e.weight), Some(5.0));

        let before: Vec<&String> = graph.bfs(&ids[0]).into_iter().map(|n| &n.value).collect();
        let after: Vec<&String> = restored.bfs(&ids[0]).into_iter().map(|n| &n.value).collect();
        assert_eq!(before, after);
        assert_eq!(restored.has_path(&ids[3], &ids[0]), graph.has_path(&ids[3], &ids[0]));
    }
}

#[test]
fn test_undirected_restore_requires_mirrors() {
    let one_sided = json!({
        "type": "undirected",
        "weighted": false,
        "nodes": [{"id": "node-0", "value": 1}, {"id": "node-1", "value": 2}],
        "edges": [{"id": "edge-node-0-node-1", "source": "node-0", "target": "node-1"}]
    });
    let result: Result<Graph<i32>, _> = Graph::restore_json(one_sided.clone());
    assert!(matches!(result, Err(SnapshotError::MissingMirror { ref edge }) if edge == "edge-node-0-node-1"));

    // One-sided edges are fine when the graph is directed
    let mut directed = one_sided;
    directed["type"] = json!("directed");
    let graph: Graph<i32> = Graph::restore_json(directed).expect("restore");
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_graph_restore_rejects_dangling_edge() {
    let bad = json!({
        "type": "directed",
        "weighted": false,
        "nodes": [{"id": "node-0", "value": 1}],
        "edges": [{"id": "edge-node-0-node-9", "source": "node-0", "target": "node-9"}]
    });
    let result: Result<Graph<i32>, _> = Graph::restore_json(bad);
    assert!(matches!(result, Err(SnapshotError::DanglingEdge { .. })));
}
