//! Mutable data-structure engines
//!
//! Each engine owns one structure's storage and its mutation algorithms:
//! - [`sequence`]: index-addressed array, optionally viewed as 2-D
//! - [`chain`]: singly, doubly and circular linked lists over a node arena
//! - [`stack`]: bounded LIFO buffer
//! - [`queue`]: bounded FIFO buffer
//! - [`hash_table`]: separate-chaining hash table with load-factor rehashing
//! - [`tree`]: binary search tree with optional AVL balancing, or a min-heap
//! - [`graph`]: directed or undirected graph, optionally weighted
//!
//! # Common contract
//!
//! Every engine implements [`Structure`]: it can produce a canonical, serde-ready
//! snapshot, be rebuilt from one, and list its addressable elements for a
//! renderer. Operations never panic on expected conditions; an empty pop, a full
//! push or an out-of-range index returns `None` or `false` and leaves the
//! structure untouched.
//!
//! # Element identity
//!
//! Ids in [`VisualElement`] are the same strings the diff engine puts into
//! transitions, so a renderer can resolve an animation target by plain lookup:
//! - positional: `seq-{i}`, `stack-{i}`, `queue-{i}`
//! - key-derived: `hash-{key}` for string keys, `hash-{type}:{key}` otherwise
//! - minted at creation: `node-{n}` for chain and graph nodes, `tree-node-{n}` for tree nodes
//! - graph edges: `edge-{source}-{target}`

pub mod chain;
pub mod graph;
pub mod hash_table;
pub mod queue;
pub mod sequence;
pub mod stack;
pub mod tree;

use crate::error::SnapshotError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use chain::{ChainKind, LinkedChain};
pub use graph::{Graph, GraphKind};
pub use hash_table::{ChainedHashTable, TableKey};
pub use queue::BoundedQueue;
pub use sequence::Sequence;
pub use stack::BoundedStack;
pub use tree::{BinarySearchTree, TreeKind};

/// The seven structure kinds, named as they appear in the snapshot exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Array,
    LinkedList,
    Stack,
    Queue,
    HashTable,
    Tree,
    Graph,
}

impl StructureKind {
    pub const ALL: [StructureKind; 7] = [
        StructureKind::Array,
        StructureKind::LinkedList,
        StructureKind::Stack,
        StructureKind::Queue,
        StructureKind::HashTable,
        StructureKind::Tree,
        StructureKind::Graph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StructureKind::Array => "array",
            StructureKind::LinkedList => "linkedlist",
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
            StructureKind::HashTable => "hashtable",
            StructureKind::Tree => "tree",
            StructureKind::Graph => "graph",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StructureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown structure kind: {}", s))
    }
}

/// What a visual element stands for, so renderers can lay it out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum ElementRole {
    /// Slot in an array, stack or queue
    Cell { index: usize },
    /// Linked-list node at a traversal position; `circular` when the tail links back to the head
    ListNode { position: usize, circular: bool },
    /// Hash table entry and the bucket it lives in
    Entry { bucket: usize },
    /// Tree node with its depth from the root
    TreeNode { depth: usize },
    /// Graph vertex
    Vertex,
    /// Graph edge
    Edge { source: String, target: String },
}

/// One addressable element of a structure, independent of any rendering backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualElement {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub role: ElementRole,
}

impl VisualElement {
    pub fn new(id: impl Into<String>, label: impl Into<String>, role: ElementRole) -> Self {
        VisualElement {
            id: id.into(),
            label: label.into(),
            role,
        }
    }
}

/// Mint a node id such as `node-7`
pub(crate) fn mint_node_id(prefix: &str, n: u64) -> String {
    format!("{}-{}", prefix, n)
}

/// Numeric suffix of an id minted with [`mint_node_id`]
pub(crate) fn node_id_suffix(prefix: &str, id: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
}

/// Shared contract of every structure engine
pub trait Structure: Sized {
    /// Canonical, immutable state value
    type Snapshot: Clone + PartialEq + Serialize + DeserializeOwned;

    /// Which kind of structure this is
    fn kind(&self) -> StructureKind;

    /// Serialize the full current state
    fn snapshot(&self) -> Self::Snapshot;

    /// Rebuild a structure (links, ids, counters) from a snapshot
    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError>;

    /// Addressable elements in display order
    fn to_visual(&self) -> Vec<VisualElement>;

    /// Snapshot encoded as a JSON value
    fn snapshot_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.snapshot())
    }

    /// Restore from a JSON value
    fn restore_json(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let snapshot = serde_json::from_value(value)?;
        Self::restore(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in StructureKind::ALL {
            assert_eq!(kind.as_str().parse::<StructureKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!("heap".parse::<StructureKind>().is_err());
    }
}
