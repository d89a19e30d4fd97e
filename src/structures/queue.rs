//! Bounded FIFO queue engine
//!
//! Shares the `{items, maxSize}` snapshot shape with the stack; items are
//! listed front first.

use super::stack::BoundedSnapshot;
use super::{ElementRole, Structure, StructureKind, VisualElement};
use crate::config::DEFAULT_MAX_SIZE;
use crate::error::SnapshotError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt::Display;

/// Queue that refuses enqueues past `max_size`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    max_size: usize,
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl<T> BoundedQueue<T> {
    pub fn new(max_size: usize) -> Self {
        BoundedQueue {
            items: VecDeque::new(),
            max_size,
        }
    }

    /// Add at the rear; returns false when full
    pub fn enqueue(&mut self, value: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push_back(value);
        true
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Front element
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Rear element
    pub fn rear(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Structure for BoundedQueue<T>
where
    T: Clone + PartialEq + Display + Serialize + DeserializeOwned,
{
    type Snapshot = BoundedSnapshot<T>;

    fn kind(&self) -> StructureKind {
        StructureKind::Queue
    }

    fn snapshot(&self) -> Self::Snapshot {
        BoundedSnapshot {
            items: self.items.iter().cloned().collect(),
            max_size: self.max_size,
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        snapshot.check_capacity()?;
        Ok(BoundedQueue {
            items: snapshot.items.into(),
            max_size: snapshot.max_size,
        })
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, value)| {
                VisualElement::new(
                    format!("queue-{}", index),
                    value.to_string(),
                    ElementRole::Cell { index },
                )
            })
            .collect()
    }
}
