//! Snapshot diff engine
//!
//! Compares two snapshots of the same structure kind and reports the typed
//! [`Transition`]s that turn the first into the second:
//! - [`sequence`]: value-membership diff for arrays, plus [`apply_sequence_diff`]
//! - [`positional`]: index-by-index diff for chains, stacks and queues
//! - [`keyed`]: key/id set difference for hash tables and graphs
//! - [`tree`]: id-keyed structural diff for every tree type
//!
//! Every diff is pure and satisfies `diff(s, s) == []`.
//!
//! Typed callers use [`SnapshotDiff`] (or the `diff_*` functions) directly on
//! snapshot types. Callers holding JSON snapshots use [`compute_diff`], which
//! dispatches on the structure kind name and degrades to an empty list on an
//! unknown kind or a malformed snapshot.

pub mod keyed;
pub mod positional;
pub mod sequence;
pub mod tree;

use crate::structures::chain::ChainSnapshot;
use crate::structures::graph::GraphSnapshot;
use crate::structures::hash_table::HashSnapshot;
use crate::structures::sequence::SequenceSnapshot;
use crate::structures::stack::BoundedSnapshot;
use crate::structures::tree::TreeSnapshot;
use crate::structures::StructureKind;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use keyed::{diff_graph, diff_hash};
pub use positional::{diff_chain, diff_linear};
pub use sequence::{apply_sequence_diff, diff_sequence};
pub use tree::diff_tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    Insert,
    Delete,
    Update,
    Move,
}

/// Where an element was (or ends up) and what it held
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Root path of a tree node, one `L`/`R` per edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TransitionState {
    pub fn at(index: usize) -> Self {
        TransitionState {
            index: Some(index),
            ..TransitionState::default()
        }
    }

    pub fn keyed<K: Serialize>(key: &K) -> Self {
        TransitionState {
            key: Some(to_payload(key)),
            ..TransitionState::default()
        }
    }

    pub fn with_value<T: Serialize>(mut self, value: &T) -> Self {
        self.value = Some(to_payload(value));
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// One atomic visual change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    pub element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<TransitionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<TransitionState>,
}

impl Transition {
    pub fn insert(element_id: impl Into<String>, to: TransitionState) -> Self {
        Transition {
            kind: TransitionKind::Insert,
            element_id: element_id.into(),
            from: None,
            to: Some(to),
        }
    }

    pub fn delete(element_id: impl Into<String>, from: TransitionState) -> Self {
        Transition {
            kind: TransitionKind::Delete,
            element_id: element_id.into(),
            from: Some(from),
            to: None,
        }
    }

    pub fn update(element_id: impl Into<String>, from: TransitionState, to: TransitionState) -> Self {
        Transition {
            kind: TransitionKind::Update,
            element_id: element_id.into(),
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn moved(element_id: impl Into<String>, from: TransitionState, to: TransitionState) -> Self {
        Transition {
            kind: TransitionKind::Move,
            element_id: element_id.into(),
            from: Some(from),
            to: Some(to),
        }
    }

    /// Existence-only change with no payload (graph edges)
    pub fn bare(kind: TransitionKind, element_id: impl Into<String>) -> Self {
        Transition {
            kind,
            element_id: element_id.into(),
            from: None,
            to: None,
        }
    }
}

/// Diff between two snapshots of the same type
pub trait SnapshotDiff {
    fn diff(&self, next: &Self) -> Vec<Transition>;
}

impl<T: PartialEq + Serialize> SnapshotDiff for SequenceSnapshot<T> {
    fn diff(&self, next: &Self) -> Vec<Transition> {
        diff_sequence(&self.data, &next.data)
    }
}

impl<T: PartialEq + Serialize> SnapshotDiff for ChainSnapshot<T> {
    fn diff(&self, next: &Self) -> Vec<Transition> {
        diff_chain(self, next)
    }
}

impl<K: Serialize, V: PartialEq + Serialize> SnapshotDiff for HashSnapshot<K, V> {
    fn diff(&self, next: &Self) -> Vec<Transition> {
        diff_hash(self, next)
    }
}

impl<T: PartialEq + Serialize> SnapshotDiff for TreeSnapshot<T> {
    fn diff(&self, next: &Self) -> Vec<Transition> {
        diff_tree(self, next)
    }
}

impl<T: PartialEq + Serialize> SnapshotDiff for GraphSnapshot<T> {
    fn diff(&self, next: &Self) -> Vec<Transition> {
        diff_graph(self, next)
    }
}

/// Diff two JSON snapshots of the structure kind named `kind`
///
/// An unknown kind or a snapshot that does not decode as that kind yields no
/// transitions (and a warning), never an error.
pub fn compute_diff(prev: &Value, next: &Value, kind: &str) -> Vec<Transition> {
    let kind = match kind.parse::<StructureKind>() {
        Ok(kind) => kind,
        Err(e) => {
            warn!("{}, no transitions computed", e);
            return Vec::new();
        }
    };

    match kind {
        StructureKind::Array => decoded::<SequenceSnapshot<Value>, _>(prev, next, kind, |a, b| a.diff(b)),
        StructureKind::LinkedList => decoded::<ChainSnapshot<Value>, _>(prev, next, kind, |a, b| a.diff(b)),
        StructureKind::Stack => {
            decoded::<BoundedSnapshot<Value>, _>(prev, next, kind, |a, b| diff_linear("stack", &a.items, &b.items))
        }
        StructureKind::Queue => {
            decoded::<BoundedSnapshot<Value>, _>(prev, next, kind, |a, b| diff_linear("queue", &a.items, &b.items))
        }
        StructureKind::HashTable => decoded::<HashSnapshot<Value, Value>, _>(prev, next, kind, |a, b| a.diff(b)),
        StructureKind::Tree => decoded::<TreeSnapshot<Value>, _>(prev, next, kind, |a, b| a.diff(b)),
        StructureKind::Graph => decoded::<GraphSnapshot<Value>, _>(prev, next, kind, |a, b| a.diff(b)),
    }
}

fn decoded<S, F>(prev: &Value, next: &Value, kind: StructureKind, diff: F) -> Vec<Transition>
where
    S: DeserializeOwned,
    F: FnOnce(&S, &S) -> Vec<Transition>,
{
    match (S::deserialize(prev), S::deserialize(next)) {
        (Ok(a), Ok(b)) => diff(&a, &b),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Malformed {} snapshot, no transitions computed: {}", kind, e);
            Vec::new()
        }
    }
}

/// Encode a payload for a transition; values that cannot be encoded become `null`
pub(crate) fn to_payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_kind_yields_nothing() {
        assert!(compute_diff(&json!([1]), &json!([2]), "heap").is_empty());
    }

    #[test]
    fn test_malformed_snapshot_yields_nothing() {
        let good = json!({"items": [1], "maxSize": 4});
        assert!(compute_diff(&good, &json!("oops"), "stack").is_empty());
    }

    #[test]
    fn test_transition_wire_shape() {
        let t = Transition::insert("seq-2", TransitionState::at(2).with_value(&99));
        let encoded = serde_json::to_value(&t).unwrap();
        assert_eq!(
            encoded,
            json!({"type": "INSERT", "elementId": "seq-2", "to": {"index": 2, "value": 99}})
        );
    }
}
