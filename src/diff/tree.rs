//! Structural tree diff keyed by node id
//!
//! Tree node ids survive rotations and successor swaps, so nodes are matched by
//! id and located by their root path (`""` for the root, then one `L` or `R`
//! per edge). A matched node whose value changed is an Update; one whose path
//! changed is a Move. Nodes are reported in pre-order.

use super::{Transition, TransitionState};
use crate::structures::tree::{TreeSnapshot, TreeSnapshotNode};
use rustc_hash::FxHashMap;
use serde::Serialize;

struct Placed<'a, T> {
    id: &'a str,
    value: &'a T,
    path: String,
}

fn flatten<T>(snapshot: &TreeSnapshot<T>) -> Vec<Placed<'_, T>> {
    fn walk<'a, T>(node: &'a TreeSnapshotNode<T>, path: String, out: &mut Vec<Placed<'a, T>>) {
        out.push(Placed {
            id: &node.id,
            value: &node.value,
            path: path.clone(),
        });
        if let Some(left) = node.left.as_deref() {
            walk(left, format!("{}L", path), out);
        }
        if let Some(right) = node.right.as_deref() {
            walk(right, format!("{}R", path), out);
        }
    }

    let mut out = Vec::with_capacity(snapshot.size);
    if let Some(root) = &snapshot.root {
        walk(root, String::new(), &mut out);
    }
    out
}

fn state<T: Serialize>(placed: &Placed<'_, T>) -> TransitionState {
    TransitionState::default()
        .with_value(placed.value)
        .with_path(placed.path.clone())
}

pub fn diff_tree<T: PartialEq + Serialize>(prev: &TreeSnapshot<T>, next: &TreeSnapshot<T>) -> Vec<Transition> {
    let old = flatten(prev);
    let new = flatten(next);
    let old_by_id: FxHashMap<&str, &Placed<'_, T>> = old.iter().map(|p| (p.id, p)).collect();
    let new_by_id: FxHashMap<&str, &Placed<'_, T>> = new.iter().map(|p| (p.id, p)).collect();
    let mut transitions = Vec::new();

    for placed in &old {
        if !new_by_id.contains_key(placed.id) {
            transitions.push(Transition::delete(placed.id, state(placed)));
        }
    }
    for placed in &new {
        match old_by_id.get(placed.id) {
            None => transitions.push(Transition::insert(placed.id, state(placed))),
            Some(before) if before.value != placed.value => {
                transitions.push(Transition::update(placed.id, state(before), state(placed)))
            }
            Some(before) if before.path != placed.path => {
                transitions.push(Transition::moved(placed.id, state(before), state(placed)))
            }
            Some(_) => {}
        }
    }
    transitions
}
