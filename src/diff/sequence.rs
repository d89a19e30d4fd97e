//! Array diff and its inverse
//!
//! Membership is decided by value equality, so duplicate values make the
//! Move/Update split ambiguous: the first equal old value wins.

use super::{Transition, TransitionKind, TransitionState};
use crate::structures::sequence::sequence_element_id;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Transitions turning `prev` into `next`
///
/// Deletes come first, in old index order, for old values that appear nowhere
/// in `next`. Each new index then yields at most one transition:
/// - past the old length: `Insert`
/// - value found elsewhere in `prev`: `Move` from its first old index
/// - new value while the old occupant survives elsewhere: `Insert` (a shift)
/// - new value replacing a vanished one: `Update`
pub fn diff_sequence<T: PartialEq + Serialize>(prev: &[T], next: &[T]) -> Vec<Transition> {
    let mut transitions = Vec::new();

    for (index, value) in prev.iter().enumerate() {
        if !next.contains(value) {
            transitions.push(Transition::delete(
                sequence_element_id(index),
                TransitionState::at(index).with_value(value),
            ));
        }
    }

    for (index, value) in next.iter().enumerate() {
        let id = sequence_element_id(index);
        let to = TransitionState::at(index).with_value(value);
        let Some(old) = prev.get(index) else {
            transitions.push(Transition::insert(id, to));
            continue;
        };
        if old == value {
            continue;
        }

        if let Some(from) = prev.iter().position(|v| v == value) {
            transitions.push(Transition::moved(
                id,
                TransitionState::at(from).with_value(value),
                to,
            ));
        } else if next.contains(old) {
            transitions.push(Transition::insert(id, to));
        } else {
            transitions.push(Transition::update(
                id,
                TransitionState::at(index).with_value(old),
                to,
            ));
        }
    }

    transitions
}

/// Rebuild the new sequence from `prev` and the output of [`diff_sequence`]
///
/// Exact when values are distinct. With duplicates the reconstruction follows
/// the same first-match rule as the diff and may differ from the true target.
pub fn apply_sequence_diff<T>(prev: &[T], transitions: &[Transition]) -> Result<Vec<T>, serde_json::Error>
where
    T: Clone + DeserializeOwned,
{
    let mut grown = 0usize;
    let mut deleted = 0usize;
    let mut placed: FxHashMap<usize, T> = FxHashMap::default();

    for transition in transitions {
        match transition.kind {
            TransitionKind::Delete => deleted += 1,
            TransitionKind::Insert | TransitionKind::Update => {
                // Updates replace a deleted value, so they count toward the length too
                grown += 1;
                let Some(to) = &transition.to else { continue };
                if let (Some(index), Some(value)) = (to.index, &to.value) {
                    placed.insert(index, serde_json::from_value(value.clone())?);
                }
            }
            TransitionKind::Move => {
                let from = transition.from.as_ref().and_then(|s| s.index);
                let to = transition.to.as_ref().and_then(|s| s.index);
                if let (Some(from), Some(to)) = (from, to) {
                    if let Some(value) = prev.get(from) {
                        placed.insert(to, value.clone());
                    }
                }
            }
        }
    }

    let len = (prev.len() + grown).saturating_sub(deleted);
    Ok((0..len)
        .filter_map(|index| placed.remove(&index).or_else(|| prev.get(index).cloned()))
        .collect())
}
