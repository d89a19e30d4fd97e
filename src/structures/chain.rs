//! Linked list engine over a node arena
//!
//! Nodes live in a slot vector and refer to each other by slot index, so there
//! are no owning cycles even for circular lists. Freed slots are recycled.
//!
//! # Variants
//!
//! | kind             | `next` of tail | `prev` links | `prev` of head |
//! |------------------|----------------|--------------|----------------|
//! | `Singly`         | none           | no           | -              |
//! | `Doubly`         | none           | yes          | none           |
//! | `Circular`       | head           | no           | -              |
//! | `DoublyCircular` | head           | yes          | tail           |
//!
//! Traversal of circular variants stops when the scan comes back to the head,
//! never by waiting for a missing `next`.

use super::{mint_node_id, node_id_suffix, ElementRole, Structure, StructureKind, VisualElement};
use crate::error::SnapshotError;
use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const ID_PREFIX: &str = "node";

/// Which way the chain is linked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainKind {
    #[default]
    Singly,
    Doubly,
    Circular,
    DoublyCircular,
}

impl ChainKind {
    pub fn is_doubly(self) -> bool {
        matches!(self, ChainKind::Doubly | ChainKind::DoublyCircular)
    }

    pub fn is_circular(self) -> bool {
        matches!(self, ChainKind::Circular | ChainKind::DoublyCircular)
    }
}

/// One serialized chain node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainElement<T> {
    pub id: String,
    pub value: T,
}

/// Canonical chain state: `{type, elements, length}`, elements in head-to-tail order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot<T> {
    #[serde(rename = "type")]
    pub kind: ChainKind,
    pub elements: Vec<ChainElement<T>>,
    pub length: usize,
}

#[derive(Debug, Clone)]
struct ChainNode<T> {
    id: String,
    value: T,
    next: Option<usize>,
    prev: Option<usize>,
}

/// Singly, doubly or circular linked list
#[derive(Debug, Clone)]
pub struct LinkedChain<T> {
    slots: Vec<Option<ChainNode<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    kind: ChainKind,
    next_id: u64,
}

impl<T> LinkedChain<T> {
    pub fn new(kind: ChainKind) -> Self {
        LinkedChain {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            kind,
            next_id: 0,
        }
    }

    pub fn chain_kind(&self) -> ChainKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Head-to-tail iterator over `(id, value)`, loop-safe for circular chains
    pub fn iter(&self) -> ChainIter<'_, T> {
        ChainIter {
            chain: self,
            cursor: self.head,
            started: false,
        }
    }

    pub fn values(&self) -> Vec<&T> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Id of the node at `position`
    pub fn id_at(&self, position: usize) -> Option<&str> {
        self.slot_at(position).map(|slot| self.node(slot).id.as_str())
    }

    pub fn prepend(&mut self, value: T) {
        let slot = self.alloc(value);
        match self.head {
            None => {
                self.head = Some(slot);
                self.tail = Some(slot);
            }
            Some(head) => {
                self.link(slot, Some(head));
                self.head = Some(slot);
            }
        }
        self.len += 1;
        self.close_ends();
    }

    pub fn append(&mut self, value: T) {
        let slot = self.alloc(value);
        match self.tail {
            None => {
                self.head = Some(slot);
                self.tail = Some(slot);
            }
            Some(tail) => {
                self.link(tail, Some(slot));
                self.tail = Some(slot);
            }
        }
        self.len += 1;
        self.close_ends();
    }

    /// Insert so the new node ends up at `position`; false when `position > len`
    pub fn insert_at(&mut self, position: usize, value: T) -> bool {
        if position > self.len {
            return false;
        }
        if position == 0 {
            self.prepend(value);
            return true;
        }
        if position == self.len {
            self.append(value);
            return true;
        }

        let Some(before) = self.slot_at(position - 1) else {
            return false;
        };
        let after = self.node(before).next;
        let slot = self.alloc(value);
        self.link(before, Some(slot));
        self.link(slot, after);
        self.len += 1;
        true
    }

    pub fn remove_head(&mut self) -> Option<T> {
        let head = self.head?;
        if self.len == 1 {
            self.head = None;
            self.tail = None;
        } else {
            self.head = self.node(head).next;
        }
        self.len -= 1;
        self.close_ends();
        Some(self.release(head))
    }

    pub fn remove_tail(&mut self) -> Option<T> {
        let tail = self.tail?;
        if self.len == 1 {
            self.head = None;
            self.tail = None;
        } else if self.kind.is_doubly() {
            self.tail = self.node(tail).prev;
        } else {
            // Singly linked: walk to the node before the tail
            self.tail = self.slot_at(self.len - 2);
        }
        self.len -= 1;
        self.close_ends();
        Some(self.release(tail))
    }

    pub fn remove_at(&mut self, position: usize) -> Option<T> {
        if position >= self.len {
            return None;
        }
        if position == 0 {
            return self.remove_head();
        }
        if position == self.len - 1 {
            return self.remove_tail();
        }

        let before = self.slot_at(position - 1)?;
        let target = self.node(before).next?;
        let after = self.node(target).next;
        self.link(before, after);
        self.len -= 1;
        Some(self.release(target))
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.slot_at(position).map(|slot| &self.node(slot).value)
    }

    /// Overwrite the value at `position`; false when out of range
    pub fn set(&mut self, position: usize, value: T) -> bool {
        match self.slot_at(position) {
            Some(slot) => {
                self.node_mut(slot).value = value;
                true
            }
            None => false,
        }
    }

    /// Reverse link direction; circular chains stay closed with the old head as tail
    pub fn reverse(&mut self) {
        let order: Vec<usize> = self.slots_in_order();
        if order.len() < 2 {
            return;
        }
        for slot in &order {
            let node = self.node_mut(*slot);
            node.next = None;
            node.prev = None;
        }
        for pair in order.windows(2).rev() {
            self.link(pair[1], Some(pair[0]));
        }
        self.head = order.last().copied();
        self.tail = order.first().copied();
        self.close_ends();
    }

    fn alloc(&mut self, value: T) -> usize {
        let node = ChainNode {
            id: mint_node_id(ID_PREFIX, self.next_id),
            value,
            next: None,
            prev: None,
        };
        self.next_id += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> T {
        let node = self.slots[slot]
            .take()
            .unwrap_or_else(|| unreachable!("released slot {} twice", slot));
        self.free.push(slot);
        node.value
    }

    fn node(&self, slot: usize) -> &ChainNode<T> {
        self.slots[slot]
            .as_ref()
            .unwrap_or_else(|| unreachable!("dangling chain link to slot {}", slot))
    }

    fn node_mut(&mut self, slot: usize) -> &mut ChainNode<T> {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("dangling chain link to slot {}", slot))
    }

    /// `from.next = to`, plus the back link for doubly variants
    fn link(&mut self, from: usize, to: Option<usize>) {
        self.node_mut(from).next = to;
        if self.kind.is_doubly() {
            if let Some(to) = to {
                self.node_mut(to).prev = Some(from);
            }
        }
    }

    /// Re-establish the variant's end conditions after head/tail moved
    fn close_ends(&mut self) {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return;
        };
        if self.kind.is_circular() {
            self.link(tail, Some(head));
        } else {
            self.node_mut(tail).next = None;
            if self.kind.is_doubly() {
                self.node_mut(head).prev = None;
            }
        }
    }

    fn slot_at(&self, position: usize) -> Option<usize> {
        if position >= self.len {
            return None;
        }
        let mut cursor = self.head?;
        for _ in 0..position {
            cursor = self.node(cursor).next?;
        }
        Some(cursor)
    }

    fn slots_in_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            if !order.is_empty() && Some(slot) == self.head {
                break;
            }
            order.push(slot);
            cursor = self.node(slot).next;
        }
        order
    }
}

impl<T: PartialEq> LinkedChain<T> {
    /// Position of the first node holding `value`
    pub fn find(&self, value: &T) -> Option<usize> {
        self.iter().position(|(_, v)| v == value)
    }
}

/// Head-to-tail iterator; ends at `None` or on returning to the head
pub struct ChainIter<'a, T> {
    chain: &'a LinkedChain<T>,
    cursor: Option<usize>,
    started: bool,
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = (&'a str, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        if self.started && Some(slot) == self.chain.head {
            self.cursor = None;
            return None;
        }
        self.started = true;
        let chain = self.chain;
        let node = chain.node(slot);
        self.cursor = node.next;
        Some((node.id.as_str(), &node.value))
    }
}

impl<T> Structure for LinkedChain<T>
where
    T: Clone + PartialEq + Display + Serialize + DeserializeOwned,
{
    type Snapshot = ChainSnapshot<T>;

    fn kind(&self) -> StructureKind {
        StructureKind::LinkedList
    }

    fn snapshot(&self) -> Self::Snapshot {
        let elements: Vec<ChainElement<T>> = self
            .iter()
            .map(|(id, value)| ChainElement {
                id: id.to_string(),
                value: value.clone(),
            })
            .collect();
        ChainSnapshot {
            kind: self.kind,
            length: elements.len(),
            elements,
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        if snapshot.length != snapshot.elements.len() {
            return Err(SnapshotError::LengthMismatch {
                declared: snapshot.length,
                actual: snapshot.elements.len(),
            });
        }

        let mut chain = LinkedChain::new(snapshot.kind);
        let mut seen = FxHashSet::default();
        let mut max_suffix = None;
        for element in snapshot.elements {
            if !seen.insert(element.id.clone()) {
                return Err(SnapshotError::DuplicateId(element.id));
            }
            max_suffix = max_suffix.max(node_id_suffix(ID_PREFIX, &element.id));
            chain.append(element.value);
            if let Some(tail) = chain.tail {
                chain.node_mut(tail).id = element.id;
            }
        }
        chain.next_id = max_suffix.map_or(chain.next_id, |n| n + 1);
        Ok(chain)
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        let circular = self.kind.is_circular();
        self.iter()
            .enumerate()
            .map(|(position, (id, value))| {
                VisualElement::new(id, value.to_string(), ElementRole::ListNode { position, circular })
            })
            .collect()
    }
}
