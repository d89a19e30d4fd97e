//! Index-addressed sequence (array) engine
//!
//! A contiguous list of values with no holes. A sequence can be flagged as
//! two-dimensional, in which case `columns` describes the row width and
//! [`Sequence::get_2d`] addresses cells by row and column; storage stays flat.

use super::{ElementRole, Structure, StructureKind, VisualElement};
use crate::error::SnapshotError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;

/// Canonical sequence state: `{data, dimensions, columns}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSnapshot<T> {
    pub data: Vec<T>,
    pub dimensions: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
}

/// Array engine
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<T> {
    data: Vec<T>,
    dimensions: u8,
    columns: Option<usize>,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sequence<T> {
    /// Empty one-dimensional sequence
    pub fn new() -> Self {
        Sequence {
            data: Vec::new(),
            dimensions: 1,
            columns: None,
        }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Sequence {
            data,
            dimensions: 1,
            columns: None,
        }
    }

    /// Flat storage viewed as rows of `columns` cells
    pub fn grid(data: Vec<T>, columns: usize) -> Self {
        Sequence {
            data,
            dimensions: 2,
            columns: Some(columns),
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn dimensions(&self) -> u8 {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Cell at `(row, col)` of a 2-D sequence; `None` for 1-D sequences
    pub fn get_2d(&self, row: usize, col: usize) -> Option<&T> {
        match (self.dimensions, self.columns) {
            (2, Some(columns)) if col < columns => {
                let index = row.checked_mul(columns)?.checked_add(col)?;
                self.data.get(index)
            }
            _ => None,
        }
    }

    /// Number of rows in a 2-D sequence (1 for a non-empty 1-D sequence)
    pub fn rows(&self) -> usize {
        match (self.dimensions, self.columns) {
            (2, Some(columns)) if columns > 0 => self.data.len().div_ceil(columns),
            _ => usize::from(!self.data.is_empty()),
        }
    }

    /// Overwrite the value at `index`; returns false when out of range
    pub fn set(&mut self, index: usize, value: T) -> bool {
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Append a value and return the new length
    pub fn push(&mut self, value: T) -> usize {
        self.data.push(value);
        self.data.len()
    }

    pub fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    /// Insert at `index` (`index == len` appends); returns false when out of range
    pub fn insert(&mut self, index: usize, value: T) -> bool {
        if index > self.data.len() {
            return false;
        }
        self.data.insert(index, value);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.data.len() {
            return None;
        }
        Some(self.data.remove(index))
    }

    /// Swap two positions; returns false if either is out of range
    pub fn swap(&mut self, i: usize, j: usize) -> bool {
        if i >= self.data.len() || j >= self.data.len() {
            return false;
        }
        self.data.swap(i, j);
        true
    }

    pub fn reverse(&mut self) {
        self.data.reverse();
    }

    /// Stable sort with a caller-supplied comparator
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.data.sort_by(compare);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: PartialEq> Sequence<T> {
    /// Index of the first element equal to `value`
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|v| v == value)
    }
}

impl<T: Ord> Sequence<T> {
    pub fn sort(&mut self) {
        self.data.sort();
    }
}

impl<T> Structure for Sequence<T>
where
    T: Clone + PartialEq + Display + Serialize + DeserializeOwned,
{
    type Snapshot = SequenceSnapshot<T>;

    fn kind(&self) -> StructureKind {
        StructureKind::Array
    }

    fn snapshot(&self) -> Self::Snapshot {
        SequenceSnapshot {
            data: self.data.clone(),
            dimensions: self.dimensions,
            columns: self.columns,
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        Ok(Sequence {
            data: snapshot.data,
            dimensions: if snapshot.dimensions == 2 { 2 } else { 1 },
            columns: snapshot.columns,
        })
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        self.data
            .iter()
            .enumerate()
            .map(|(index, value)| {
                VisualElement::new(
                    sequence_element_id(index),
                    value.to_string(),
                    ElementRole::Cell { index },
                )
            })
            .collect()
    }
}

/// Id of the element at a sequence position
pub fn sequence_element_id(index: usize) -> String {
    format!("seq-{}", index)
}
