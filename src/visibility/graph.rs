//! Generic weighted directed graph keyed by vertex payload.
//!
//! Payloads are compared by value: adding the same payload twice yields one
//! vertex, and an edge is identified by its `(source, destination)` pair only.
//! Graphs are write-once: there is no removal.

use std::collections::HashMap;
use std::hash::Hash;

/// Directed edge between two payloads.
#[derive(Debug, Clone, Copy)]
pub struct Edge<T> {
    pub source: T,
    pub destination: T,
    pub weight: f64,
}

impl<T: Copy + Eq> Edge<T> {
    /// The endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    pub fn other(&self, v: &T) -> Option<T> {
        if self.source == *v {
            Some(self.destination)
        } else if self.destination == *v {
            Some(self.source)
        } else {
            None
        }
    }

    pub fn touches(&self, v: &T) -> bool {
        self.source == *v || self.destination == *v
    }
}

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl<T: Eq> Eq for Edge<T> {}

#[derive(Debug, Clone, Default)]
struct VertexEdges {
    /// Indices of edges ending here
    incoming: Vec<usize>,
    /// Indices of edges starting here
    outgoing: Vec<usize>,
}

/// Vertices and edges are stored in insertion order, so iteration is
/// deterministic for a given construction sequence.
#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    payloads: Vec<T>,
    links: Vec<VertexEdges>,
    index: HashMap<T, usize>,
    edges: Vec<Edge<T>>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl<T> Default for DirectedGraph<T> {
    fn default() -> Self {
        Self {
            payloads: Vec::new(),
            links: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> DirectedGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `payload` as a vertex if it is not present yet; returns its slot.
    pub fn add_vertex(&mut self, payload: T) -> usize {
        if let Some(&slot) = self.index.get(&payload) {
            return slot;
        }
        let slot = self.payloads.len();
        self.payloads.push(payload);
        self.links.push(VertexEdges::default());
        self.index.insert(payload, slot);
        slot
    }

    /// Add the edge `source -> destination`, adding missing vertices.
    /// An existing edge between the same ordered pair is left untouched.
    pub fn add_edge(&mut self, source: T, destination: T, weight: f64) {
        let from = self.add_vertex(source);
        let to = self.add_vertex(destination);
        if self.edge_index.contains_key(&(from, to)) {
            return;
        }
        let id = self.edges.len();
        self.edges.push(Edge {
            source,
            destination,
            weight,
        });
        self.edge_index.insert((from, to), id);
        self.links[from].outgoing.push(id);
        self.links[to].incoming.push(id);
    }

    pub fn add_unweighted_edge(&mut self, source: T, destination: T) {
        self.add_edge(source, destination, 0.0);
    }

    /// Merge all vertices and edges of `other` into this graph.
    pub fn add_graph(&mut self, other: &DirectedGraph<T>) {
        for payload in other.vertices() {
            self.add_vertex(*payload);
        }
        for edge in other.edges() {
            self.add_edge(edge.source, edge.destination, edge.weight);
        }
    }

    /// Edges leaving `payload`; empty for unknown vertices.
    pub fn edges_from<'a>(&'a self, payload: &T) -> impl Iterator<Item = &'a Edge<T>> + use<'a, T> {
        let ids = self
            .index
            .get(payload)
            .map(|&slot| self.links[slot].outgoing.as_slice())
            .unwrap_or(&[]);
        ids.iter().map(move |&id| &self.edges[id])
    }

    /// Edges entering `payload`; empty for unknown vertices.
    pub fn edges_to<'a>(&'a self, payload: &T) -> impl Iterator<Item = &'a Edge<T>> + use<'a, T> {
        let ids = self
            .index
            .get(payload)
            .map(|&slot| self.links[slot].incoming.as_slice())
            .unwrap_or(&[]);
        ids.iter().map(move |&id| &self.edges[id])
    }

    pub fn has_edge(&self, source: &T, destination: &T) -> bool {
        match (self.index.get(source), self.index.get(destination)) {
            (Some(&from), Some(&to)) => self.edge_index.contains_key(&(from, to)),
            _ => false,
        }
    }

    pub fn edge(&self, source: &T, destination: &T) -> Option<&Edge<T>> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(destination)?;
        self.edge_index.get(&(from, to)).map(|&id| &self.edges[id])
    }

    pub fn contains_vertex(&self, payload: &T) -> bool {
        self.index.contains_key(payload)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &T> {
        self.payloads.iter()
    }

    pub fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.payloads.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
