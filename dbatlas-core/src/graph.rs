//! Generic directed-graph utilities: cycle detection, deterministic
//! topological ordering, and bounded sub-graph extraction.
//!
//! Used to order foreign-key-dependent tables and to expand filtered results
//! along foreign-key edges, but carries no catalog types of its own. A graph
//! makes no acyclicity assumption; check [`DirectedGraph::contains_cycle`]
//! before asking for a topological ordering.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use thiserror::Error;

/// Topological ordering attempted on a graph containing a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("graph contains a cycle; no topological ordering exists")]
pub struct GraphCycleError;

/// A directed graph over value-identity vertices.
///
/// Vertices are remembered in insertion order, and that order breaks ties in
/// [`DirectedGraph::topological_sort`], so repeated sorts of the same graph
/// produce byte-for-byte identical sequences.
#[derive(Debug, Clone)]
pub struct DirectedGraph<V> {
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    out_edges: Vec<Vec<usize>>,
    edge_set: HashSet<(usize, usize)>,
}

impl<V> DirectedGraph<V>
where
    V: Clone + Eq + Hash,
{
    /// An empty graph.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            out_edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Adds a vertex if not already present.
    pub fn add_vertex(&mut self, value: V) {
        self.intern(value);
    }

    /// Adds a directed edge, auto-adding both endpoints as vertices.
    /// Self-loops are permitted and count as cycles.
    pub fn add_edge(&mut self, from: V, to: V) {
        let from = self.intern(from);
        let to = self.intern(to);
        if self.edge_set.insert((from, to)) {
            self.out_edges[from].push(to);
        }
    }

    fn intern(&mut self, value: V) -> usize {
        if let Some(&existing) = self.index.get(&value) {
            return existing;
        }
        let position = self.vertices.len();
        self.index.insert(value.clone(), position);
        self.vertices.push(value);
        self.out_edges.push(Vec::new());
        position
    }

    /// Returns true if the vertex is present.
    pub fn contains(&self, value: &V) -> bool {
        self.index.contains_key(value)
    }

    /// Returns true if the directed edge is present.
    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from), Some(&to)) => self.edge_set.contains(&(from, to)),
            _ => false,
        }
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Detects cycles with a three-color depth-first search: a back-edge to
    /// an in-progress vertex is a cycle. Handles self-loops.
    pub fn contains_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.vertices.len()];
        for start in 0..self.vertices.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::InProgress;
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            while let Some((vertex, next)) = stack.pop() {
                if next < self.out_edges[vertex].len() {
                    stack.push((vertex, next + 1));
                    let target = self.out_edges[vertex][next];
                    match marks[target] {
                        Mark::InProgress => return true,
                        Mark::Unvisited => {
                            marks[target] = Mark::InProgress;
                            stack.push((target, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[vertex] = Mark::Done;
                }
            }
        }
        false
    }

    /// Kahn's algorithm: repeatedly removes all current zero-in-degree
    /// vertices, breaking ties by original insertion order.
    ///
    /// # Errors
    /// Fails with [`GraphCycleError`] if the graph contains a cycle. Callers
    /// needing a non-failing path should check
    /// [`DirectedGraph::contains_cycle`] first.
    pub fn topological_sort(&self) -> Result<Vec<V>, GraphCycleError> {
        let count = self.vertices.len();
        let mut in_degree = vec![0usize; count];
        for targets in &self.out_edges {
            for &target in targets {
                in_degree[target] += 1;
            }
        }

        let mut order = Vec::with_capacity(count);
        let mut ready: Vec<usize> = (0..count).filter(|&v| in_degree[v] == 0).collect();
        while !ready.is_empty() {
            let batch = std::mem::take(&mut ready);
            for &vertex in &batch {
                order.push(vertex);
                for &target in &self.out_edges[vertex] {
                    in_degree[target] -= 1;
                    if in_degree[target] == 0 {
                        ready.push(target);
                    }
                }
            }
            // Newly freed vertices surface in edge order; restore insertion
            // order before the next round.
            ready.sort_unstable();
        }

        if order.len() != count {
            return Err(GraphCycleError);
        }
        Ok(order.into_iter().map(|v| self.vertices[v].clone()).collect())
    }

    /// The induced sub-graph forward-reachable from `root`, unbounded.
    pub fn subgraph(&self, root: &V) -> Self {
        self.subgraph_to_depth(root, -1)
    }

    /// The induced sub-graph forward-reachable from `root` within `depth`
    /// hops. A negative depth means unbounded; depth 0 yields just the root
    /// vertex with no edges. The result grows monotonically with `depth`.
    ///
    /// A root that is not a vertex of this graph yields an empty graph.
    pub fn subgraph_to_depth(&self, root: &V, depth: i32) -> Self {
        let mut sub = Self::new();
        let Some(&start) = self.index.get(root) else {
            return sub;
        };
        if depth == 0 {
            sub.add_vertex(self.vertices[start].clone());
            return sub;
        }

        let mut reached = HashSet::from([start]);
        let mut frontier = vec![start];
        let mut hops = 0;
        while !frontier.is_empty() && (depth < 0 || hops < depth) {
            let mut next = Vec::new();
            for vertex in frontier {
                for &target in &self.out_edges[vertex] {
                    if reached.insert(target) {
                        next.push(target);
                    }
                }
            }
            frontier = next;
            hops += 1;
        }

        // Re-add in original insertion order so the sub-graph sorts the same
        // way the parent graph does.
        for (position, vertex) in self.vertices.iter().enumerate() {
            if reached.contains(&position) {
                sub.add_vertex(vertex.clone());
            }
        }
        for (from, targets) in self.out_edges.iter().enumerate() {
            if !reached.contains(&from) {
                continue;
            }
            for &to in targets {
                if reached.contains(&to) {
                    sub.add_edge(self.vertices[from].clone(), self.vertices[to].clone());
                }
            }
        }
        sub
    }
}

impl<V> Default for DirectedGraph<V>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
