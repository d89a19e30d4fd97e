//! Binary tree engine: search tree, AVL tree or min-heap
//!
//! The tree owns its root and every node owns its children (`Option<Box<_>>`),
//! so there are no parent pointers. Node ids (`tree-node-{n}`) are minted on
//! insert and survive rotations, which lets the diff engine report a rotation
//! as nodes moving rather than being replaced.
//!
//! # Invariants
//!
//! - BST/AVL: `left < node < right` for every node; duplicate inserts are rejected
//! - heap: `node <= child` for every child; duplicates are kept
//! - `height` is 1 for a leaf and recomputed bottom-up after every change
//! - in AVL mode every node keeps `|height(left) - height(right)| <= 1`
//!
//! Deleting a search-tree node with two children copies the in-order
//! successor's value (the minimum of the right subtree) into it, then deletes
//! the successor. A heap insert pushes the larger value down toward the
//! smaller subtree; a heap delete pulls the smaller child's value up along one
//! path and drops the leaf at its end.

use super::{mint_node_id, node_id_suffix, ElementRole, Structure, StructureKind, VisualElement};
use crate::error::SnapshotError;
use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;

const ID_PREFIX: &str = "tree-node";

/// Ordering and balancing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    #[default]
    Bst,
    Avl,
    /// Min-heap kept in linked form
    Heap,
}

/// Serialized node: `{id, value, left, right, height}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshotNode<T> {
    pub id: String,
    pub value: T,
    pub left: Option<Box<TreeSnapshotNode<T>>>,
    pub right: Option<Box<TreeSnapshotNode<T>>>,
    pub height: usize,
}

/// Canonical tree state: `{type, size, root}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot<T> {
    #[serde(rename = "type")]
    pub kind: TreeKind,
    pub size: usize,
    pub root: Option<TreeSnapshotNode<T>>,
}

type Link<T> = Option<Box<TreeNode<T>>>;

#[derive(Debug, Clone)]
struct TreeNode<T> {
    id: String,
    value: T,
    left: Link<T>,
    right: Link<T>,
    height: usize,
}

impl<T> TreeNode<T> {
    fn leaf(id: String, value: T) -> Self {
        TreeNode {
            id,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn count<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| 1 + count(&node.left) + count(&node.right))
}

fn balance_factor<T>(link: &Link<T>) -> isize {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

fn rotate_right<T>(mut y: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left<T>(mut x: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Restore the AVL condition at `node`, whose children are already balanced
fn balance<T>(mut node: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
    let factor = node.balance_factor();
    if factor > 1 {
        // Left-right: straighten into left-left first
        if balance_factor(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if factor < -1 {
        // Right-left: straighten into right-right first
        if balance_factor(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

/// BST, AVL tree or min-heap
#[derive(Debug, Clone)]
pub struct BinarySearchTree<T> {
    root: Link<T>,
    kind: TreeKind,
    size: usize,
    next_id: u64,
}

impl<T> BinarySearchTree<T> {
    pub fn new(kind: TreeKind) -> Self {
        BinarySearchTree {
            root: None,
            kind,
            size: 0,
            next_id: 0,
        }
    }

    pub fn tree_kind(&self) -> TreeKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Height of the whole tree (0 when empty)
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }

    pub fn min(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        if self.kind == TreeKind::Heap {
            return Some(&node.value);
        }
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    pub fn in_order(&self) -> Vec<&T> {
        fn walk<'a, T>(link: &'a Link<T>, out: &mut Vec<&'a T>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(&node.value);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.size);
        walk(&self.root, &mut out);
        out
    }

    pub fn pre_order(&self) -> Vec<&T> {
        fn walk<'a, T>(link: &'a Link<T>, out: &mut Vec<&'a T>) {
            if let Some(node) = link {
                out.push(&node.value);
                walk(&node.left, out);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.size);
        walk(&self.root, &mut out);
        out
    }

    pub fn post_order(&self) -> Vec<&T> {
        fn walk<'a, T>(link: &'a Link<T>, out: &mut Vec<&'a T>) {
            if let Some(node) = link {
                walk(&node.left, out);
                walk(&node.right, out);
                out.push(&node.value);
            }
        }
        let mut out = Vec::with_capacity(self.size);
        walk(&self.root, &mut out);
        out
    }

    /// Every node within the AVL bound and carrying a correct height
    pub fn is_balanced(&self) -> bool {
        fn check<T>(link: &Link<T>) -> Option<usize> {
            let Some(node) = link else {
                return Some(0);
            };
            let left = check(&node.left)?;
            let right = check(&node.right)?;
            let h = 1 + left.max(right);
            (left.abs_diff(right) <= 1 && node.height == h).then_some(h)
        }
        check(&self.root).is_some()
    }

    fn mint_id(&mut self) -> String {
        let id = mint_node_id(ID_PREFIX, self.next_id);
        self.next_id += 1;
        id
    }

    fn rebalance(&self, mut node: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
        node.update_height();
        match self.kind {
            TreeKind::Avl => balance(node),
            TreeKind::Bst | TreeKind::Heap => node,
        }
    }
}

impl<T: Ord> BinarySearchTree<T> {
    pub fn max(&self) -> Option<&T> {
        if self.kind == TreeKind::Heap {
            return self.in_order().into_iter().max();
        }
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// The ordering invariant of the tree's kind holds: in-order traversal is
    /// strictly increasing for BST/AVL, every parent is at most its children
    /// for a heap
    pub fn is_ordered(&self) -> bool {
        fn heap_ordered<T: Ord>(link: &Link<T>) -> bool {
            let Some(node) = link else {
                return true;
            };
            let child_ok = |child: &Link<T>| child.as_ref().map_or(true, |c| node.value <= c.value);
            child_ok(&node.left) && child_ok(&node.right) && heap_ordered(&node.left) && heap_ordered(&node.right)
        }

        match self.kind {
            TreeKind::Heap => heap_ordered(&self.root),
            TreeKind::Bst | TreeKind::Avl => self.in_order().windows(2).all(|pair| pair[0] < pair[1]),
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        fn heap_contains<T: Ord>(link: &Link<T>, value: &T) -> bool {
            let Some(node) = link else {
                return false;
            };
            match value.cmp(&node.value) {
                Ordering::Less => false,
                Ordering::Equal => true,
                Ordering::Greater => heap_contains(&node.left, value) || heap_contains(&node.right, value),
            }
        }

        if self.kind == TreeKind::Heap {
            return heap_contains(&self.root, value);
        }
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Insert `value`; returns false for a duplicate (search trees only)
    pub fn insert(&mut self, value: T) -> bool {
        if self.kind == TreeKind::Heap {
            let root = self.root.take();
            self.root = Some(self.heap_insert(root, value));
            self.size += 1;
            return true;
        }
        let mut inserted = false;
        let root = self.root.take();
        self.root = Some(self.insert_node(root, value, &mut inserted));
        if inserted {
            self.size += 1;
        }
        inserted
    }

    fn insert_node(&mut self, link: Link<T>, value: T, inserted: &mut bool) -> Box<TreeNode<T>> {
        let Some(mut node) = link else {
            *inserted = true;
            return Box::new(TreeNode::leaf(self.mint_id(), value));
        };
        match value.cmp(&node.value) {
            Ordering::Less => {
                let left = node.left.take();
                node.left = Some(self.insert_node(left, value, inserted));
            }
            Ordering::Greater => {
                let right = node.right.take();
                node.right = Some(self.insert_node(right, value, inserted));
            }
            Ordering::Equal => return node,
        }
        self.rebalance(node)
    }

    fn heap_insert(&mut self, link: Link<T>, mut value: T) -> Box<TreeNode<T>> {
        let Some(mut node) = link else {
            return Box::new(TreeNode::leaf(self.mint_id(), value));
        };
        if value < node.value {
            std::mem::swap(&mut node.value, &mut value);
        }
        // Fill left first, then keep descending into the smaller subtree
        if count(&node.left) <= count(&node.right) {
            let left = node.left.take();
            node.left = Some(self.heap_insert(left, value));
        } else {
            let right = node.right.take();
            node.right = Some(self.heap_insert(right, value));
        }
        node.update_height();
        node
    }

    /// Remove and return the smallest value of a heap
    pub fn pop_min(&mut self) -> Option<T> {
        if self.kind != TreeKind::Heap {
            return None;
        }
        let root = self.root.take()?;
        let (rest, min) = sift_out(root);
        self.root = rest;
        self.size -= 1;
        Some(min)
    }
}

/// Take `node`'s value out, pulling the smaller child's value up along one
/// path; the leaf at the end of that path is dropped
fn sift_out<T: Ord>(mut node: Box<TreeNode<T>>) -> (Link<T>, T) {
    let from_left = match (&node.left, &node.right) {
        (None, None) => None,
        (Some(left), Some(right)) => Some(left.value <= right.value),
        (left, _) => Some(left.is_some()),
    };
    let Some(from_left) = from_left else {
        return (None, node.value);
    };
    let taken = if from_left { node.left.take() } else { node.right.take() };
    let Some(child) = taken else {
        return (None, node.value);
    };
    let (rest, promoted) = sift_out(child);
    if from_left {
        node.left = rest;
    } else {
        node.right = rest;
    }
    let removed = std::mem::replace(&mut node.value, promoted);
    node.update_height();
    (Some(node), removed)
}

fn heap_remove<T: Ord>(link: Link<T>, value: &T) -> (Link<T>, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };
    match value.cmp(&node.value) {
        // Every value below is at least node.value
        Ordering::Less => (Some(node), false),
        Ordering::Equal => (sift_out(node).0, true),
        Ordering::Greater => {
            let (left, mut removed) = heap_remove(node.left.take(), value);
            node.left = left;
            if !removed {
                let (right, found) = heap_remove(node.right.take(), value);
                node.right = right;
                removed = found;
            }
            node.update_height();
            (Some(node), removed)
        }
    }
}

impl<T: Ord + Clone> BinarySearchTree<T> {
    /// Delete `value`; returns false when it is not in the tree
    pub fn delete(&mut self, value: &T) -> bool {
        if self.kind == TreeKind::Heap {
            let (root, removed) = heap_remove(self.root.take(), value);
            self.root = root;
            if removed {
                self.size -= 1;
            }
            return removed;
        }
        if !self.contains(value) {
            return false;
        }
        let root = self.root.take();
        self.root = self.delete_node(root, value);
        self.size -= 1;
        true
    }

    fn delete_node(&self, link: Link<T>, value: &T) -> Link<T> {
        let mut node = link?;
        match value.cmp(&node.value) {
            Ordering::Less => node.left = self.delete_node(node.left.take(), value),
            Ordering::Greater => node.right = self.delete_node(node.right.take(), value),
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, right) => return right,
                (left, None) => return left,
                (Some(left), Some(right)) => {
                    let mut successor = right.as_ref();
                    while let Some(next) = successor.left.as_ref() {
                        successor = next;
                    }
                    let successor = successor.value.clone();
                    node.left = Some(left);
                    node.right = self.delete_node(Some(right), &successor);
                    node.value = successor;
                }
            },
        }
        Some(self.rebalance(node))
    }
}

fn snapshot_node<T: Clone>(link: &Link<T>) -> Option<Box<TreeSnapshotNode<T>>> {
    link.as_ref().map(|node| {
        Box::new(TreeSnapshotNode {
            id: node.id.clone(),
            value: node.value.clone(),
            left: snapshot_node(&node.left),
            right: snapshot_node(&node.right),
            height: node.height,
        })
    })
}

fn restore_node<T>(
    node: TreeSnapshotNode<T>,
    seen: &mut FxHashSet<String>,
    max_suffix: &mut Option<u64>,
) -> Result<Box<TreeNode<T>>, SnapshotError> {
    if !seen.insert(node.id.clone()) {
        return Err(SnapshotError::DuplicateId(node.id));
    }
    *max_suffix = (*max_suffix).max(node_id_suffix(ID_PREFIX, &node.id));

    let left = node
        .left
        .map(|child| restore_node(*child, seen, max_suffix))
        .transpose()?;
    let right = node
        .right
        .map(|child| restore_node(*child, seen, max_suffix))
        .transpose()?;
    let mut restored = Box::new(TreeNode {
        id: node.id,
        value: node.value,
        left,
        right,
        height: 1,
    });
    restored.update_height();
    Ok(restored)
}

impl<T> Structure for BinarySearchTree<T>
where
    T: Ord + Clone + Display + Serialize + DeserializeOwned,
{
    type Snapshot = TreeSnapshot<T>;

    fn kind(&self) -> StructureKind {
        StructureKind::Tree
    }

    fn snapshot(&self) -> Self::Snapshot {
        TreeSnapshot {
            kind: self.kind,
            size: self.size,
            root: snapshot_node(&self.root).map(|node| *node),
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        let mut seen = FxHashSet::default();
        let mut max_suffix = None;
        let root = snapshot
            .root
            .map(|node| restore_node(node, &mut seen, &mut max_suffix))
            .transpose()?;

        if seen.len() != snapshot.size {
            return Err(SnapshotError::LengthMismatch {
                declared: snapshot.size,
                actual: seen.len(),
            });
        }

        let tree = BinarySearchTree {
            root,
            kind: snapshot.kind,
            size: seen.len(),
            next_id: max_suffix.map_or(0, |n| n + 1),
        };
        if !tree.is_ordered() {
            return Err(SnapshotError::Unordered);
        }
        if tree.kind == TreeKind::Avl && !tree.is_balanced() {
            return Err(SnapshotError::Unbalanced);
        }
        Ok(tree)
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        fn walk<T: Display>(link: &Link<T>, depth: usize, out: &mut Vec<VisualElement>) {
            if let Some(node) = link {
                out.push(VisualElement::new(
                    node.id.clone(),
                    node.value.to_string(),
                    ElementRole::TreeNode { depth },
                ));
                walk(&node.left, depth + 1, out);
                walk(&node.right, depth + 1, out);
            }
        }
        let mut out = Vec::with_capacity(self.size);
        walk(&self.root, 0, &mut out);
        out
    }
}
