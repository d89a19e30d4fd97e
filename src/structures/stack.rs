//! Bounded LIFO stack engine

use super::{ElementRole, Structure, StructureKind, VisualElement};
use crate::config::DEFAULT_MAX_SIZE;
use crate::error::SnapshotError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Canonical bounded-buffer state: `{items, maxSize}`, bottom first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundedSnapshot<T> {
    pub items: Vec<T>,
    pub max_size: usize,
}

impl<T> BoundedSnapshot<T> {
    pub(crate) fn check_capacity(&self) -> Result<(), SnapshotError> {
        if self.items.len() > self.max_size {
            return Err(SnapshotError::CapacityExceeded {
                len: self.items.len(),
                max_size: self.max_size,
            });
        }
        Ok(())
    }
}

/// Stack that refuses pushes past `max_size` instead of growing
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    max_size: usize,
}

impl<T> Default for BoundedStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl<T> BoundedStack<T> {
    pub fn new(max_size: usize) -> Self {
        BoundedStack {
            items: Vec::new(),
            max_size,
        }
    }

    /// Push onto the top; returns false (and drops nothing) when full
    pub fn push(&mut self, value: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
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

    /// Items from bottom to top
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Structure for BoundedStack<T>
where
    T: Clone + PartialEq + Display + Serialize + DeserializeOwned,
{
    type Snapshot = BoundedSnapshot<T>;

    fn kind(&self) -> StructureKind {
        StructureKind::Stack
    }

    fn snapshot(&self) -> Self::Snapshot {
        BoundedSnapshot {
            items: self.items.clone(),
            max_size: self.max_size,
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        snapshot.check_capacity()?;
        Ok(BoundedStack {
            items: snapshot.items,
            max_size: snapshot.max_size,
        })
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, value)| {
                VisualElement::new(
                    format!("stack-{}", index),
                    value.to_string(),
                    ElementRole::Cell { index },
                )
            })
            .collect()
    }
}
