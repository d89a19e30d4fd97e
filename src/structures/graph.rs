//! Graph engine: directed or undirected, optionally weighted
//!
//! Nodes get minted ids (`node-{n}`); an edge's id is derived from its
//! endpoints (`edge-{source}-{target}`), so adding the same edge twice replaces
//! it. An undirected edge is stored as two directed entries with mirrored
//! endpoints and the same weight, and removing either removes both.
//!
//! Node, edge and neighbour lists all keep insertion order, which makes
//! traversals deterministic: BFS and DFS visit neighbours in the order their
//! edges were added.

use super::{mint_node_id, node_id_suffix, ElementRole, Structure, StructureKind, VisualElement};
use crate::error::SnapshotError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Display;

const ID_PREFIX: &str = "node";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Directed,
    #[default]
    Undirected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode<T> {
    pub id: String,
    pub value: T,
}

/// One directed edge entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Canonical graph state: `{type, weighted, nodes, edges}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot<T> {
    #[serde(rename = "type")]
    pub kind: GraphKind,
    pub weighted: bool,
    pub nodes: Vec<GraphNode<T>>,
    pub edges: Vec<GraphEdge>,
}

/// Id of the directed edge `source -> target`
pub fn edge_id(source: &str, target: &str) -> String {
    format!("edge-{}-{}", source, target)
}

#[derive(Debug, Clone)]
pub struct Graph<T> {
    kind: GraphKind,
    weighted: bool,
    nodes: Vec<GraphNode<T>>,
    edges: Vec<GraphEdge>,
    adjacency: FxHashMap<String, Vec<String>>,
    next_id: u64,
}

impl<T> Graph<T> {
    pub fn new(kind: GraphKind, weighted: bool) -> Self {
        Graph {
            kind,
            weighted,
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: FxHashMap::default(),
            next_id: 0,
        }
    }

    pub fn graph_kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Add a node and return its freshly minted id
    pub fn add_node(&mut self, value: T) -> String {
        let id = mint_node_id(ID_PREFIX, self.next_id);
        self.next_id += 1;
        self.nodes.push(GraphNode {
            id: id.clone(),
            value,
        });
        self.adjacency.insert(id.clone(), Vec::new());
        id
    }

    /// Remove a node together with every edge touching it
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(pos) = self.nodes.iter().position(|node| node.id == id) else {
            return false;
        };

        let touching: Vec<(String, String)> = self
            .edges
            .iter()
            .filter(|edge| edge.source == id || edge.target == id)
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect();
        for (source, target) in touching {
            self.remove_edge(&source, &target);
        }

        self.nodes.remove(pos);
        self.adjacency.remove(id);
        true
    }

    pub fn update_node(&mut self, id: &str, value: T) -> bool {
        match self.nodes.iter_mut().find(|node| node.id == id) {
            Some(node) => {
                node.value = value;
                true
            }
            None => false,
        }
    }

    /// Add `source -> target` (and the mirror when undirected); returns false
    /// if either endpoint is missing. The weight is dropped for unweighted graphs.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: Option<f64>) -> bool {
        if !self.has_node(source) || !self.has_node(target) {
            return false;
        }
        let weight = if self.weighted { weight } else { None };

        self.store_edge(source, target, weight);
        if self.kind == GraphKind::Undirected {
            self.store_edge(target, source, weight);
        }
        true
    }

    /// Remove `source -> target` (and the mirror when undirected)
    pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        if !self.drop_edge(source, target) {
            return false;
        }
        if self.kind == GraphKind::Undirected {
            self.drop_edge(target, source);
        }
        true
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode<T>> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes(&self) -> &[GraphNode<T>] {
        &self.nodes
    }

    /// All stored directed entries, mirrors included
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        let id = edge_id(source, target);
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Outgoing neighbours in edge insertion order
    pub fn neighbors(&self, id: &str) -> Vec<&GraphNode<T>> {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|neighbor| self.node(neighbor))
            .collect()
    }

    /// Outgoing adjacency count
    pub fn degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Logical edge count; undirected edges count once
    pub fn edge_count(&self) -> usize {
        match self.kind {
            GraphKind::Directed => self.edges.len(),
            GraphKind::Undirected => self.edges.len() / 2,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjacency.clear();
        self.next_id = 0;
    }

    pub fn bfs(&self, start: &str) -> Vec<&GraphNode<T>> {
        self.bfs_with(start, |_| {})
    }

    /// Breadth-first traversal from `start`, calling `visit` on each node
    pub fn bfs_with<F>(&self, start: &str, mut visit: F) -> Vec<&GraphNode<T>>
    where
        F: FnMut(&GraphNode<T>),
    {
        let mut order = Vec::new();
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut frontier: VecDeque<&str> = VecDeque::new();
        visited.insert(start);
        frontier.push_back(start);

        while let Some(id) = frontier.pop_front() {
            if let Some(node) = self.node(id) {
                visit(node);
                order.push(node);
            }
            for neighbor in self.adjacency.get(id).into_iter().flatten() {
                if visited.insert(neighbor.as_str()) {
                    frontier.push_back(neighbor);
                }
            }
        }
        order
    }

    pub fn dfs(&self, start: &str) -> Vec<&GraphNode<T>> {
        self.dfs_with(start, |_| {})
    }

    /// Recursive depth-first traversal from `start`
    pub fn dfs_with<F>(&self, start: &str, mut visit: F) -> Vec<&GraphNode<T>>
    where
        F: FnMut(&GraphNode<T>),
    {
        let mut order = Vec::new();
        let mut visited = FxHashSet::default();
        // Borrow the id from the graph so the visited set outlives the caller's `start`
        let Some((start, _)) = self.adjacency.get_key_value(start) else {
            return order;
        };
        self.dfs_visit(start, &mut visited, &mut order, &mut visit);
        order
    }

    fn dfs_visit<'a, F>(
        &'a self,
        id: &'a str,
        visited: &mut FxHashSet<&'a str>,
        order: &mut Vec<&'a GraphNode<T>>,
        visit: &mut F,
    ) where
        F: FnMut(&GraphNode<T>),
    {
        if !visited.insert(id) {
            return;
        }
        if let Some(node) = self.node(id) {
            visit(node);
            order.push(node);
        }
        for neighbor in self.adjacency.get(id).into_iter().flatten() {
            self.dfs_visit(neighbor, visited, order, visit);
        }
    }

    /// BFS reachability
    pub fn has_path(&self, source: &str, target: &str) -> bool {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut frontier: VecDeque<&str> = VecDeque::new();
        visited.insert(source);
        frontier.push_back(source);

        while let Some(id) = frontier.pop_front() {
            if id == target {
                return true;
            }
            for neighbor in self.adjacency.get(id).into_iter().flatten() {
                if visited.insert(neighbor.as_str()) {
                    frontier.push_back(neighbor);
                }
            }
        }
        false
    }

    fn store_edge(&mut self, source: &str, target: &str, weight: Option<f64>) {
        let id = edge_id(source, target);
        match self.edges.iter_mut().find(|edge| edge.id == id) {
            Some(edge) => edge.weight = weight,
            None => self.edges.push(GraphEdge {
                id,
                source: source.to_string(),
                target: target.to_string(),
                weight,
            }),
        }
        if let Some(adjacent) = self.adjacency.get_mut(source) {
            if !adjacent.iter().any(|n| n == target) {
                adjacent.push(target.to_string());
            }
        }
    }

    fn drop_edge(&mut self, source: &str, target: &str) -> bool {
        let id = edge_id(source, target);
        let Some(pos) = self.edges.iter().position(|edge| edge.id == id) else {
            return false;
        };
        self.edges.remove(pos);
        if let Some(adjacent) = self.adjacency.get_mut(source) {
            adjacent.retain(|n| n != target);
        }
        true
    }
}

impl<T> Structure for Graph<T>
where
    T: Clone + PartialEq + Display + Serialize + DeserializeOwned,
{
    type Snapshot = GraphSnapshot<T>;

    fn kind(&self) -> StructureKind {
        StructureKind::Graph
    }

    fn snapshot(&self) -> Self::Snapshot {
        GraphSnapshot {
            kind: self.kind,
            weighted: self.weighted,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        let mut graph = Graph::new(snapshot.kind, snapshot.weighted);
        let mut max_suffix = None;

        for node in snapshot.nodes {
            if graph.has_node(&node.id) {
                return Err(SnapshotError::DuplicateId(node.id));
            }
            max_suffix = max_suffix.max(node_id_suffix(ID_PREFIX, &node.id));
            graph.adjacency.insert(node.id.clone(), Vec::new());
            graph.nodes.push(node);
        }

        // Entries are taken as stored; undirected graphs must carry both directions
        for edge in &snapshot.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !graph.has_node(endpoint) {
                    return Err(SnapshotError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            graph.store_edge(&edge.source, &edge.target, edge.weight);
        }
        if graph.kind == GraphKind::Undirected {
            for edge in &snapshot.edges {
                let mirrored = graph
                    .edge(&edge.target, &edge.source)
                    .is_some_and(|twin| twin.weight == edge.weight);
                if !mirrored {
                    return Err(SnapshotError::MissingMirror { edge: edge.id.clone() });
                }
            }
        }

        graph.next_id = max_suffix.map_or(0, |n| n + 1);
        Ok(graph)
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        let vertices = self
            .nodes
            .iter()
            .map(|node| VisualElement::new(node.id.clone(), node.value.to_string(), ElementRole::Vertex));
        let edges = self.edges.iter().map(|edge| {
            let label = edge.weight.map(|w| w.to_string()).unwrap_or_default();
            VisualElement::new(
                edge.id.clone(),
                label,
                ElementRole::Edge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                },
            )
        });
        vertices.chain(edges).collect()
    }
}
