// Integration tests for snapshot diffing

use dsanim::diff::{apply_sequence_diff, compute_diff, Transition, TransitionKind};
use dsanim::structures::{
    BinarySearchTree, BoundedQueue, BoundedStack, ChainKind, ChainedHashTable, Graph, GraphKind,
    LinkedChain, Sequence, Structure, StructureKind, TreeKind,
};
use serde_json::{json, Value};

fn summary(transitions: &[Transition]) -> Vec<(TransitionKind, String)> {
    transitions
        .iter()
        .map(|t| (t.kind, t.element_id.clone()))
        .collect()
}

fn diff_of<S: Structure>(before: &S, after: &S) -> Vec<Transition> {
    let prev = before.snapshot_json().expect("encode");
    let next = after.snapshot_json().expect("encode");
    compute_diff(&prev, &next, before.kind().as_str())
}

#[test]
fn test_identical_snapshots_have_no_transitions() {
    let samples: Vec<(StructureKind, Value)> = vec![
        (
            StructureKind::Array,
            Sequence::from_vec(vec![1, 2, 2, 3]).snapshot_json().expect("encode"),
        ),
        (
            StructureKind::LinkedList,
            {
                let mut list = LinkedChain::new(ChainKind::Circular);
                list.append(1);
                list.append(2);
                list.snapshot_json().expect("encode")
            },
        ),
        (
            StructureKind::Stack,
            {
                let mut stack = BoundedStack::new(4);
                stack.push("a".to_string());
                stack.snapshot_json().expect("encode")
            },
        ),
        (
            StructureKind::Queue,
            {
                let mut queue = BoundedQueue::new(4);
                queue.enqueue(1.5);
                queue.snapshot_json().expect("encode")
            },
        ),
        (
            StructureKind::HashTable,
            {
                let mut table: ChainedHashTable<String, i32> = ChainedHashTable::default();
                table.set("x".to_string(), 1);
                table.snapshot_json().expect("encode")
            },
        ),
        (
            StructureKind::Tree,
            {
                let mut tree = BinarySearchTree::new(TreeKind::Avl);
                for value in [5, 3, 8] {
                    tree.insert(value);
                }
                tree.snapshot_json().expect("encode")
            },
        ),
        (
            StructureKind::Tree,
            {
                let mut heap = BinarySearchTree::new(TreeKind::Heap);
                for value in [5, 3, 8, 3] {
                    heap.insert(value);
                }
                heap.snapshot_json().expect("encode")
            },
        ),
        (
            StructureKind::Graph,
            {
                let mut graph = Graph::new(GraphKind::Directed, false);
                let a = graph.add_node(1);
                let b = graph.add_node(2);
                graph.add_edge(&a, &b, None);
                graph.snapshot_json().expect("encode")
            },
        ),
    ];

    for (kind, snapshot) in samples {
        assert!(
            compute_diff(&snapshot, &snapshot, kind.as_str()).is_empty(),
            "{} diffed against itself",
            kind
        );
    }
}

#[test]
fn test_array_insert_and_pop() {
    let before = Sequence::from_vec(vec![1, 2, 3, 4, 5]);
    let mut after = before.clone();
    after.push(6);
    after.insert(2, 99);
    after.pop();

    let transitions = diff_of(&before, &after);
    assert_eq!(
        summary(&transitions),
        vec![
            (TransitionKind::Delete, "seq-4".to_string()),
            (TransitionKind::Insert, "seq-2".to_string()),
            (TransitionKind::Move, "seq-3".to_string()),
            (TransitionKind::Move, "seq-4".to_string()),
        ]
    );
    assert_eq!(transitions[0].from.as_ref().and_then(|s| s.value.clone()), Some(json!(5)));
    assert_eq!(transitions[1].to.as_ref().and_then(|s| s.value.clone()), Some(json!(99)));
    assert_eq!(transitions[2].from.as_ref().and_then(|s| s.index), Some(2));
    assert_eq!(transitions[3].from.as_ref().and_then(|s| s.index), Some(3));

    let rebuilt: Vec<i32> = apply_sequence_diff(before.data(), &transitions).expect("apply");
    assert_eq!(rebuilt, after.data());
}

#[test]
fn test_array_value_replacement_is_an_update() {
    let before = Sequence::from_vec(vec![10, 20, 30]);
    let mut after = before.clone();
    after.set(1, 25);

    let transitions = diff_of(&before, &after);
    let kinds: Vec<TransitionKind> = transitions.iter().map(|t| t.kind).collect();
    // The vanished 20 is reported, then replaced in place
    assert_eq!(kinds, vec![TransitionKind::Delete, TransitionKind::Update]);
    assert_eq!(transitions[1].element_id, "seq-1");

    let rebuilt: Vec<i32> = apply_sequence_diff(before.data(), &transitions).expect("apply");
    assert_eq!(rebuilt, vec![10, 25, 30]);
}

#[test]
fn test_chain_diff_uses_node_ids() {
    let mut list = LinkedChain::new(ChainKind::Singly);
    list.append(1);
    list.append(2);
    let before = list.clone();
    list.append(3);
    list.set(0, 7);

    let transitions = diff_of(&before, &list);
    let head = list.id_at(0).expect("head").to_string();
    let tail = list.id_at(2).expect("tail").to_string();
    assert_eq!(
        summary(&transitions),
        vec![(TransitionKind::Update, head), (TransitionKind::Insert, tail)]
    );
}

#[test]
fn test_stack_push_and_pop() {
    let mut stack = BoundedStack::new(3);
    stack.push(1);
    let before = stack.clone();
    stack.push(2);
    assert_eq!(
        summary(&diff_of(&before, &stack)),
        vec![(TransitionKind::Insert, "stack-1".to_string())]
    );

    let before = stack.clone();
    stack.pop();
    stack.pop();
    assert_eq!(
        summary(&diff_of(&before, &stack)),
        vec![
            (TransitionKind::Delete, "stack-0".to_string()),
            (TransitionKind::Delete, "stack-1".to_string()),
        ]
    );
}

#[test]
fn test_queue_dequeue_shifts_positions() {
    let mut queue = BoundedQueue::new(3);
    queue.enqueue('a');
    queue.enqueue('b');
    let before = queue.clone();
    queue.dequeue();

    // [a, b] -> [b]: position 0 changes value, position 1 disappears
    assert_eq!(
        summary(&diff_of(&before, &queue)),
        vec![
            (TransitionKind::Update, "queue-0".to_string()),
            (TransitionKind::Delete, "queue-1".to_string()),
        ]
    );
}

#[test]
fn test_hash_table_set_overwrite_and_delete() {
    let mut table: ChainedHashTable<String, i32> = ChainedHashTable::default();
    table.set("apple".to_string(), 1);
    table.set("pear".to_string(), 2);
    let before = table.clone();

    table.set("apple".to_string(), 10);
    table.delete(&"pear".to_string());
    table.set("fig".to_string(), 3);

    let transitions = diff_of(&before, &table);
    let mut got = summary(&transitions);
    // Delete first, then new-order inserts/updates; sort the tail for bucket-order independence
    assert_eq!(got.remove(0), (TransitionKind::Delete, "hash-pear".to_string()));
    got.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        got,
        vec![
            (TransitionKind::Update, "hash-apple".to_string()),
            (TransitionKind::Insert, "hash-fig".to_string()),
        ]
    );
}

#[test]
fn test_graph_node_and_edge_changes() {
    let mut graph = Graph::new(GraphKind::Directed, true);
    let a = graph.add_node("A".to_string());
    let b = graph.add_node("B".to_string());
    graph.add_edge(&a, &b, Some(1.0));
    let before = graph.clone();

    let c = graph.add_node("C".to_string());
    graph.add_edge(&b, &c, Some(2.0));
    graph.remove_edge(&a, &b);
    graph.update_node(&a, "A2".to_string());

    let transitions = diff_of(&before, &graph);
    assert_eq!(
        summary(&transitions),
        vec![
            (TransitionKind::Update, a.clone()),
            (TransitionKind::Insert, c.clone()),
            (TransitionKind::Delete, format!("edge-{}-{}", a, b)),
            (TransitionKind::Insert, format!("edge-{}-{}", b, c)),
        ]
    );
}

#[test]
fn test_bst_delete_with_two_children() {
    let mut tree = BinarySearchTree::new(TreeKind::Bst);
    for value in [50, 30, 70, 20, 40] {
        tree.insert(value);
    }
    let before = tree.clone();
    tree.delete(&30);

    let transitions = diff_of(&before, &tree);
    let kinds: Vec<TransitionKind> = transitions.iter().map(|t| t.kind).collect();
    // 30's node takes the successor value 40; 40's old node goes away
    assert_eq!(kinds, vec![TransitionKind::Delete, TransitionKind::Update]);
    assert_eq!(transitions[1].to.as_ref().and_then(|s| s.value.clone()), Some(json!(40)));
}

#[test]
fn test_heap_pop_pulls_child_value_up() {
    let mut heap = BinarySearchTree::new(TreeKind::Heap);
    for value in [5, 3, 8] {
        heap.insert(value);
    }
    let before = heap.clone();
    assert_eq!(heap.pop_min(), Some(3));

    let transitions = diff_of(&before, &heap);
    // 5 rises into the root's node; its old leaf goes away
    assert_eq!(
        summary(&transitions),
        vec![
            (TransitionKind::Delete, "tree-node-1".to_string()),
            (TransitionKind::Update, "tree-node-0".to_string()),
        ]
    );
    assert_eq!(transitions[1].from.as_ref().and_then(|s| s.value.clone()), Some(json!(3)));
    assert_eq!(transitions[1].to.as_ref().and_then(|s| s.value.clone()), Some(json!(5)));
}

#[test]
fn test_heap_insert_from_json_snapshots() {
    let before = json!({
        "type": "heap",
        "size": 1,
        "root": {"id": "tree-node-0", "value": 4, "height": 1, "left": null, "right": null}
    });
    let after = json!({
        "type": "heap",
        "size": 2,
        "root": {
            "id": "tree-node-0", "value": 1, "height": 2, "right": null,
            "left": {"id": "tree-node-1", "value": 4, "height": 1, "left": null, "right": null}
        }
    });
    assert_eq!(
        summary(&compute_diff(&before, &after, "tree")),
        vec![
            (TransitionKind::Update, "tree-node-0".to_string()),
            (TransitionKind::Insert, "tree-node-1".to_string()),
        ]
    );
}

#[test]
fn test_hash_keys_of_different_types_stay_apart() {
    let prev = json!({"capacity": 4, "size": 1, "entries": [{"key": 1, "value": "a"}]});
    let next = json!({"capacity": 4, "size": 1, "entries": [{"key": "1", "value": "a"}]});
    assert_eq!(
        summary(&compute_diff(&prev, &next, "hashtable")),
        vec![
            (TransitionKind::Delete, "hash-number:1".to_string()),
            (TransitionKind::Insert, "hash-1".to_string()),
        ]
    );

    let mut table: ChainedHashTable<u32, i32> = ChainedHashTable::default();
    table.set(7, 70);
    let ids: Vec<String> = table.to_visual().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["hash-number:7".to_string()]);
}

#[test]
fn test_diff_of_unknown_kind_is_empty() {
    let snapshot = json!({"data": [1], "dimensions": 1});
    assert!(compute_diff(&snapshot, &snapshot, "trie").is_empty());
    assert!(compute_diff(&json!({"nope": true}), &snapshot, "array").is_empty());
}
