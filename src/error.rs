//! Error types for snapshot restoration and trace recording
//!
//! Expected conditions inside the engines (empty, full, out of range, not found)
//! are not errors: those operations return `Option` or `bool`. The types here only
//! cover the fallible boundaries, where a canonical snapshot comes in from the
//! outside or a trace runs out of room.

use crate::structures::StructureKind;
use thiserror::Error;

/// A snapshot could not be turned back into a live structure
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot JSON could not be decoded
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Bounded container snapshot holds more items than its capacity
    #[error("snapshot holds {len} items but maxSize is {max_size}")]
    CapacityExceeded { len: usize, max_size: usize },

    /// Hash table snapshot with zero buckets
    #[error("hash table capacity must be positive")]
    ZeroCapacity,

    /// Declared `length`/`size` disagrees with the nodes actually present
    #[error("declared length {declared} does not match {actual} nodes")]
    LengthMismatch { declared: usize, actual: usize },

    /// Two nodes in one snapshot share an id
    #[error("duplicate node id '{0}'")]
    DuplicateId(String),

    /// Graph edge referencing a node that is not in the snapshot
    #[error("edge '{edge}' references unknown node '{node}'")]
    DanglingEdge { edge: String, node: String },

    /// Undirected graph edge stored without its reverse twin
    #[error("undirected edge '{edge}' has no mirror")]
    MissingMirror { edge: String },

    /// Tree values break the ordering rule of the tree's kind
    #[error("tree values are out of order")]
    Unordered,

    /// AVL snapshot with a node whose subtrees differ in height by more than one
    #[error("avl tree is unbalanced")]
    Unbalanced,
}

/// Recording into a [`Trace`](crate::trace::Trace) failed
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace already holds its maximum number of snapshots
    #[error("trace limit exceeded: {limit} snapshots")]
    LimitExceeded { limit: usize },

    /// The engine is not of the kind the trace was opened for
    #[error("cannot record a {found} into a {expected} trace")]
    KindMismatch {
        expected: StructureKind,
        found: StructureKind,
    },

    /// The engine snapshot could not be encoded for the trace
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
