//! Bundled teaching walkthroughs
//!
//! Each scenario drives one engine through a short, classic exercise and
//! records a [`Trace`] step after every mutation. The viewer plays these; the
//! tests use them as realistic end-to-end fixtures.

use crate::error::TraceError;
use crate::structures::{
    BinarySearchTree, BoundedQueue, BoundedStack, ChainKind, ChainedHashTable, Graph, GraphKind,
    LinkedChain, Sequence, StructureKind, TreeKind,
};
use crate::trace::Trace;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// push, insert, pop on `[1, 2, 3, 4, 5]`
    ArrayBasics,
    /// Bubble sort, one step per swap
    BubbleSort,
    /// Build, edit and reverse a singly linked list
    LinkedList,
    /// Bracket matching over `{[()]}`
    Brackets,
    /// Breadth-first search frontier over a five-node graph
    BfsQueue,
    /// Two-sum lookup table
    TwoSum,
    /// BST inserts followed by a two-child delete
    Bst,
    /// Ascending inserts into an AVL tree
    Avl,
    /// Min-heap inserts, then draining the smallest values
    Heap,
    /// Weighted undirected graph construction and edits
    WeightedGraph,
}

impl Scenario {
    pub const ALL: [Scenario; 10] = [
        Scenario::ArrayBasics,
        Scenario::BubbleSort,
        Scenario::LinkedList,
        Scenario::Brackets,
        Scenario::BfsQueue,
        Scenario::TwoSum,
        Scenario::Bst,
        Scenario::Avl,
        Scenario::Heap,
        Scenario::WeightedGraph,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::ArrayBasics => "array",
            Scenario::BubbleSort => "sorting",
            Scenario::LinkedList => "linkedlist",
            Scenario::Brackets => "stack",
            Scenario::BfsQueue => "queue",
            Scenario::TwoSum => "hashtable",
            Scenario::Bst => "tree",
            Scenario::Avl => "avl",
            Scenario::Heap => "heap",
            Scenario::WeightedGraph => "graph",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::ArrayBasics => "Array basics: push, insert at index, pop",
            Scenario::BubbleSort => "Bubble sort on [64, 34, 25, 12, 22, 11, 90]",
            Scenario::LinkedList => "Linked list: append, prepend, insert, remove, reverse",
            Scenario::Brackets => "Stack: matching brackets in \"{[()]}\"",
            Scenario::BfsQueue => "Queue: BFS frontier from vertex 0",
            Scenario::TwoSum => "Hash table: two-sum over [2, 7, 11, 15], target 9",
            Scenario::Bst => "Binary search tree: inserts, then delete a node with two children",
            Scenario::Avl => "AVL tree: inserting 1..=7 in order",
            Scenario::Heap => "Min-heap: insert [5, 3, 8, 1, 9, 2], then pop the minimum twice",
            Scenario::WeightedGraph => "Weighted graph: A-B(4), A-C(2), B-C(1), B-D(5), C-D(8)",
        }
    }

    pub fn kind(self) -> StructureKind {
        match self {
            Scenario::ArrayBasics | Scenario::BubbleSort => StructureKind::Array,
            Scenario::LinkedList => StructureKind::LinkedList,
            Scenario::Brackets => StructureKind::Stack,
            Scenario::BfsQueue => StructureKind::Queue,
            Scenario::TwoSum => StructureKind::HashTable,
            Scenario::Bst | Scenario::Avl | Scenario::Heap => StructureKind::Tree,
            Scenario::WeightedGraph => StructureKind::Graph,
        }
    }

    /// Run the scenario and return its recorded trace
    pub fn build(self) -> Result<Trace, TraceError> {
        let mut trace = Trace::new(self.kind());
        match self {
            Scenario::ArrayBasics => array_basics(&mut trace)?,
            Scenario::BubbleSort => bubble_sort(&mut trace)?,
            Scenario::LinkedList => linked_list(&mut trace)?,
            Scenario::Brackets => brackets(&mut trace)?,
            Scenario::BfsQueue => bfs_queue(&mut trace)?,
            Scenario::TwoSum => two_sum(&mut trace)?,
            Scenario::Bst => search_tree(&mut trace, TreeKind::Bst, &[50, 30, 70, 20, 40, 60, 80], 30)?,
            Scenario::Avl => search_tree(&mut trace, TreeKind::Avl, &[1, 2, 3, 4, 5, 6, 7], 4)?,
            Scenario::Heap => min_heap(&mut trace)?,
            Scenario::WeightedGraph => weighted_graph(&mut trace)?,
        }
        Ok(trace)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| format!("Unknown scenario: {}", s))
    }
}

fn array_basics(trace: &mut Trace) -> Result<(), TraceError> {
    let mut arr = Sequence::from_vec(vec![1, 2, 3, 4, 5]);
    trace.record(&arr, "arr = [1, 2, 3, 4, 5]")?;
    arr.push(6);
    trace.record(&arr, "arr.push(6)")?;
    arr.insert(2, 99);
    trace.record(&arr, "arr.insert(2, 99)")?;
    arr.pop();
    trace.record(&arr, "arr.pop()")?;
    arr.set(0, 10);
    trace.record(&arr, "arr[0] = 10")?;
    Ok(())
}

fn bubble_sort(trace: &mut Trace) -> Result<(), TraceError> {
    let mut arr = Sequence::from_vec(vec![64, 34, 25, 12, 22, 11, 90]);
    trace.record(&arr, "arr = [64, 34, 25, 12, 22, 11, 90]")?;
    let n = arr.len();
    for i in 0..n {
        for j in 0..n - i - 1 {
            if arr.get(j) > arr.get(j + 1) {
                arr.swap(j, j + 1);
                trace.record(&arr, format!("swap arr[{}] and arr[{}]", j, j + 1))?;
            }
        }
    }
    Ok(())
}

fn linked_list(trace: &mut Trace) -> Result<(), TraceError> {
    let mut list = LinkedChain::new(ChainKind::Singly);
    trace.record(&list, "head = null")?;
    for value in 1..=4 {
        list.append(value);
        trace.record(&list, format!("append({})", value))?;
    }
    list.prepend(0);
    trace.record(&list, "prepend(0)")?;
    list.insert_at(3, 42);
    trace.record(&list, "insert_at(3, 42)")?;
    list.remove_at(3);
    trace.record(&list, "remove_at(3)")?;
    list.reverse();
    trace.record(&list, "reverse()")?;
    Ok(())
}

fn brackets(trace: &mut Trace) -> Result<(), TraceError> {
    let mut stack = BoundedStack::new(16);
    trace.record(&stack, "stack = []")?;
    for ch in "{[()]}".chars() {
        match ch {
            '(' | '[' | '{' => {
                stack.push(ch);
                trace.record(&stack, format!("push('{}')", ch))?;
            }
            _ => {
                let top = stack.pop();
                trace.record(&stack, format!("pop() = {:?} for '{}'", top, ch))?;
            }
        }
    }
    Ok(())
}

fn bfs_queue(trace: &mut Trace) -> Result<(), TraceError> {
    let adjacency: [&[usize]; 5] = [&[1, 2], &[0, 3, 4], &[0, 4], &[1], &[1, 2]];
    let mut queue = BoundedQueue::new(adjacency.len());
    let mut visited = [false; 5];

    trace.record(&queue, "queue = []")?;
    queue.enqueue(0);
    visited[0] = true;
    trace.record(&queue, "enqueue(0)")?;

    while let Some(vertex) = queue.dequeue() {
        trace.record(&queue, format!("dequeue() = {}", vertex))?;
        for &next in adjacency[vertex] {
            if !visited[next] {
                visited[next] = true;
                queue.enqueue(next);
                trace.record(&queue, format!("enqueue({})", next))?;
            }
        }
    }
    Ok(())
}

fn two_sum(trace: &mut Trace) -> Result<(), TraceError> {
    let nums = [2i32, 7, 11, 15];
    let target = 9;
    let mut seen: ChainedHashTable<i32, usize> = ChainedHashTable::new(8);
    trace.record(&seen, "seen = {}")?;

    for (i, &n) in nums.iter().enumerate() {
        if seen.has(&(target - n)) {
            break;
        }
        seen.set(n, i);
        trace.record(&seen, format!("seen[{}] = {}", n, i))?;
    }
    Ok(())
}

fn search_tree(trace: &mut Trace, kind: TreeKind, values: &[i32], doomed: i32) -> Result<(), TraceError> {
    let mut tree = BinarySearchTree::new(kind);
    trace.record(&tree, "root = null")?;
    for &value in values {
        tree.insert(value);
        trace.record(&tree, format!("insert({})", value))?;
    }
    tree.delete(&doomed);
    trace.record(&tree, format!("delete({})", doomed))?;
    Ok(())
}

fn min_heap(trace: &mut Trace) -> Result<(), TraceError> {
    let mut heap = BinarySearchTree::new(TreeKind::Heap);
    trace.record(&heap, "root = null")?;
    for value in [5, 3, 8, 1, 9, 2] {
        heap.insert(value);
        trace.record(&heap, format!("insert({})", value))?;
    }
    for _ in 0..2 {
        if let Some(min) = heap.pop_min() {
            trace.record(&heap, format!("pop_min() = {}", min))?;
        }
    }
    Ok(())
}

fn weighted_graph(trace: &mut Trace) -> Result<(), TraceError> {
    let mut graph = Graph::new(GraphKind::Undirected, true);
    trace.record(&graph, "empty graph")?;

    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D"] {
        ids.push(graph.add_node(name.to_string()));
        trace.record(&graph, format!("add_node({})", name))?;
    }
    let edges = [(0, 1, 4.0), (0, 2, 2.0), (1, 2, 1.0), (1, 3, 5.0), (2, 3, 8.0)];
    for (s, t, w) in edges {
        graph.add_edge(&ids[s], &ids[t], Some(w));
        trace.record(&graph, format!("add_edge({}, {}, {})", ids[s], ids[t], w))?;
    }
    graph.remove_edge(&ids[2], &ids[3]);
    trace.record(&graph, format!("remove_edge({}, {})", ids[2], ids[3]))?;
    graph.update_node(&ids[3], "D'".to_string());
    trace.record(&graph, format!("update_node({})", ids[3]))?;
    Ok(())
}
