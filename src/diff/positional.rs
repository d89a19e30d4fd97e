//! Index-by-index diff for chains, stacks and queues
//!
//! Positions up to the shorter length are compared in place; the longer side's
//! tail becomes Inserts (new is longer) or Deletes (old is longer).

use super::{Transition, TransitionState};
use crate::structures::chain::ChainSnapshot;
use serde::Serialize;

/// Linked-list diff; elements keep the ids minted by the chain
///
/// Updates and deletes carry the old node's id, inserts the new node's.
pub fn diff_chain<T: PartialEq + Serialize>(prev: &ChainSnapshot<T>, next: &ChainSnapshot<T>) -> Vec<Transition> {
    let longest = prev.elements.len().max(next.elements.len());
    let mut transitions = Vec::new();

    for index in 0..longest {
        match (prev.elements.get(index), next.elements.get(index)) {
            (None, Some(added)) => transitions.push(Transition::insert(
                added.id.clone(),
                TransitionState::at(index).with_value(&added.value),
            )),
            (Some(removed), None) => transitions.push(Transition::delete(
                removed.id.clone(),
                TransitionState::at(index).with_value(&removed.value),
            )),
            (Some(old), Some(new)) if old.value != new.value => transitions.push(Transition::update(
                old.id.clone(),
                TransitionState::at(index).with_value(&old.value),
                TransitionState::at(index).with_value(&new.value),
            )),
            _ => {}
        }
    }
    transitions
}

/// Stack/queue diff; element ids are `{prefix}-{index}`
pub fn diff_linear<T: PartialEq + Serialize>(prefix: &str, prev: &[T], next: &[T]) -> Vec<Transition> {
    let shared = prev.len().min(next.len());
    let mut transitions = Vec::new();

    for index in 0..shared {
        if prev[index] != next[index] {
            transitions.push(Transition::update(
                format!("{}-{}", prefix, index),
                TransitionState::at(index).with_value(&prev[index]),
                TransitionState::at(index).with_value(&next[index]),
            ));
        }
    }
    for (index, value) in next.iter().enumerate().skip(shared) {
        transitions.push(Transition::insert(
            format!("{}-{}", prefix, index),
            TransitionState::at(index).with_value(value),
        ));
    }
    for (index, value) in prev.iter().enumerate().skip(shared) {
        transitions.push(Transition::delete(
            format!("{}-{}", prefix, index),
            TransitionState::at(index).with_value(value),
        ));
    }
    transitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TransitionKind;

    #[test]
    fn test_push_then_pop_on_stack() {
        let pushed = diff_linear("stack", &[1, 2], &[1, 2, 3]);
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].kind, TransitionKind::Insert);
        assert_eq!(pushed[0].element_id, "stack-2");

        let popped = diff_linear("stack", &[1, 2, 3], &[1, 2]);
        assert_eq!(popped.len(), 1);
        assert_eq!(popped[0].kind, TransitionKind::Delete);
    }
}
