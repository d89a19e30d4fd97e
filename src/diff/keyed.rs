//! Set-difference diff for key- and id-addressed structures
//!
//! Deletes are listed in old order, then Inserts and Updates in new order.

use super::{Transition, TransitionKind, TransitionState};
use crate::structures::graph::GraphSnapshot;
use crate::structures::hash_table::{hash_element_id, key_label, HashSnapshot};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Hash table diff over the key sets; ids are `hash-{label}` (see [`key_label`])
pub fn diff_hash<K, V>(prev: &HashSnapshot<K, V>, next: &HashSnapshot<K, V>) -> Vec<Transition>
where
    K: Serialize,
    V: PartialEq + Serialize,
{
    let old: FxHashMap<String, &V> = prev
        .entries
        .iter()
        .map(|entry| (key_label(&entry.key), &entry.value))
        .collect();
    let new: FxHashSet<String> = next.entries.iter().map(|entry| key_label(&entry.key)).collect();
    let mut transitions = Vec::new();

    for entry in &prev.entries {
        let label = key_label(&entry.key);
        if !new.contains(&label) {
            transitions.push(Transition::delete(
                hash_element_id(&entry.key),
                TransitionState::keyed(&entry.key).with_value(&entry.value),
            ));
        }
    }

    for entry in &next.entries {
        let label = key_label(&entry.key);
        match old.get(&label) {
            None => transitions.push(Transition::insert(
                hash_element_id(&entry.key),
                TransitionState::keyed(&entry.key).with_value(&entry.value),
            )),
            Some(&before) if *before != entry.value => transitions.push(Transition::update(
                hash_element_id(&entry.key),
                TransitionState::keyed(&entry.key).with_value(before),
                TransitionState::keyed(&entry.key).with_value(&entry.value),
            )),
            Some(_) => {}
        }
    }
    transitions
}

/// Graph diff: nodes by id (value changes are Updates), then edges by
/// `source-target` existence only
pub fn diff_graph<T>(prev: &GraphSnapshot<T>, next: &GraphSnapshot<T>) -> Vec<Transition>
where
    T: PartialEq + Serialize,
{
    let old_nodes: FxHashMap<&str, &T> = prev.nodes.iter().map(|n| (n.id.as_str(), &n.value)).collect();
    let new_nodes: FxHashSet<&str> = next.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut transitions = Vec::new();

    for node in &prev.nodes {
        if !new_nodes.contains(node.id.as_str()) {
            transitions.push(Transition::delete(
                node.id.clone(),
                TransitionState::default().with_value(&node.value),
            ));
        }
    }
    for node in &next.nodes {
        match old_nodes.get(node.id.as_str()) {
            None => transitions.push(Transition::insert(
                node.id.clone(),
                TransitionState::default().with_value(&node.value),
            )),
            Some(&before) if *before != node.value => transitions.push(Transition::update(
                node.id.clone(),
                TransitionState::default().with_value(before),
                TransitionState::default().with_value(&node.value),
            )),
            Some(_) => {}
        }
    }

    let endpoints = |graph: &GraphSnapshot<T>| -> Vec<String> {
        graph
            .edges
            .iter()
            .map(|edge| format!("{}-{}", edge.source, edge.target))
            .collect()
    };
    let old_edges = endpoints(prev);
    let new_edges = endpoints(next);
    let old_set: FxHashSet<&String> = old_edges.iter().collect();
    let new_set: FxHashSet<&String> = new_edges.iter().collect();

    for key in &old_edges {
        if !new_set.contains(key) {
            transitions.push(Transition::bare(TransitionKind::Delete, format!("edge-{}", key)));
        }
    }
    for key in &new_edges {
        if !old_set.contains(key) {
            transitions.push(Transition::bare(TransitionKind::Insert, format!("edge-{}", key)));
        }
    }
    transitions
}
