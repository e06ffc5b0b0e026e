//! Planar graph of nodes, edges and directed edges.
//!
//! # Structure
//!
//! Every [`Edge`] added with [`PlanarGraph::add_edge`] is represented by a
//! pair of [`DirectedEdge`]s (`sym` of each other).  Each directed edge
//! carries:
//!
//! * `edge`   : the undirected edge it runs along
//! * `from`   : the node it leaves
//! * `to`     : the node it enters
//! * `forward`: whether it follows the edge's vertex order
//! * `sym`    : its reverse twin
//! * `next`   : the next directed edge of a linked ring, once linked
//!
//! The outgoing directed edges of a node form its [`DirectedEdgeStar`],
//! sorted by increasing angle.
//!
//! # Indexing
//!
//! All elements are stored in flat `Vec`s and addressed by strongly-typed
//! index wrappers (`NodeId`, `EdgeId`, `DirectedEdgeId`).  Nodes are unique
//! per coordinate; lookup is by exact equality with `-0.0 == 0.0`.

use std::fmt;

use ahash::AHashMap;
use geo::Coord;

use crate::edge::Edge;
use crate::error::GraphError;
use crate::label::Label;
use crate::star::{Directed, EdgeDirection, EdgeEndStar};

// ---------------------------------------------------------------------------
// Index types
// ---------------------------------------------------------------------------

macro_rules! idx {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

idx!(NodeId);
idx!(EdgeId);
idx!(DirectedEdgeId);

/// Hashable key for exact coordinate equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey(u64, u64);

impl From<Coord<f64>> for CoordKey {
    fn from(c: Coord<f64>) -> Self {
        // `+ 0.0` folds -0.0 into 0.0.
        CoordKey((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Entry of a node's star: the direction of an outgoing directed edge.
#[derive(Clone, Copy, Debug)]
pub struct StarEntry {
    pub id: DirectedEdgeId,
    direction: EdgeDirection,
}

impl Directed for StarEntry {
    fn direction(&self) -> &EdgeDirection { &self.direction }
}

/// Outgoing directed edges of a node in counter-clockwise order.
pub type DirectedEdgeStar = EdgeEndStar<StarEntry>;

impl DirectedEdgeStar {
    /// Directed edge ids in counter-clockwise order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = DirectedEdgeId> + '_ {
        self.iter().map(|e| e.id)
    }

    /// Position of `id` in the star.
    pub fn position(&self, id: DirectedEdgeId) -> Option<usize> {
        self.iter().position(|e| e.id == id)
    }
}

/// A graph vertex.
#[derive(Clone, Debug)]
pub struct Node {
    pub coord: Coord<f64>,
    pub label: Label,
    pub star: DirectedEdgeStar,
}

impl Node {
    fn new(coord: Coord<f64>) -> Self {
        Self { coord, label: Label::default(), star: DirectedEdgeStar::new() }
    }

    /// A node is isolated if it is labelled for exactly one geometry.
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }
}

/// One orientation of an edge.
#[derive(Clone, Debug)]
pub struct DirectedEdge {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub forward: bool,
    pub sym: DirectedEdgeId,
    pub next: Option<DirectedEdgeId>,
    pub in_result: bool,
    pub label: Label,
    direction: EdgeDirection,
}

impl DirectedEdge {
    #[inline] pub fn direction(&self) -> &EdgeDirection { &self.direction }
}

// ---------------------------------------------------------------------------
// PlanarGraph
// ---------------------------------------------------------------------------

/// A planar graph owning its nodes, edges and directed edges.
#[derive(Clone, Debug, Default)]
pub struct PlanarGraph {
    nodes: Vec<Node>,
    node_index: AHashMap<CoordKey, NodeId>,
    edges: Vec<Edge>,
    directed_edges: Vec<DirectedEdge>,
}

impl PlanarGraph {
    pub fn new() -> Self { Self::default() }

    // -----------------------------------------------------------------------
    // Counts
    // -----------------------------------------------------------------------

    pub fn num_nodes(&self)          -> usize { self.nodes.len() }
    pub fn num_edges(&self)          -> usize { self.edges.len() }
    pub fn num_directed_edges(&self) -> usize { self.directed_edges.len() }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: NodeId)         -> &Node     { &self.nodes[id.0] }
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node { &mut self.nodes[id.0] }

    pub fn edge(&self, id: EdgeId)         -> &Edge     { &self.edges[id.0] }
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge { &mut self.edges[id.0] }

    pub fn directed_edge(&self, id: DirectedEdgeId)         -> &DirectedEdge     { &self.directed_edges[id.0] }
    pub fn directed_edge_mut(&mut self, id: DirectedEdgeId) -> &mut DirectedEdge { &mut self.directed_edges[id.0] }

    pub fn nodes(&self) -> &[Node] { &self.nodes }
    pub fn edges(&self) -> &[Edge] { &self.edges }
    pub fn edges_mut(&mut self) -> &mut [Edge] { &mut self.edges }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> { (0..self.nodes.len()).map(NodeId) }
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> { (0..self.edges.len()).map(EdgeId) }

    /// The node at exactly `coord`, if any.
    pub fn find_node(&self, coord: Coord<f64>) -> Option<NodeId> {
        self.node_index.get(&CoordKey::from(coord)).copied()
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// The node at `coord`, created if it does not exist yet.
    pub fn add_node(&mut self, coord: Coord<f64>) -> NodeId {
        let next = NodeId(self.nodes.len());
        let id = *self.node_index.entry(CoordKey::from(coord)).or_insert(next);
        if id == next {
            self.nodes.push(Node::new(coord));
        }
        id
    }

    /// Store an edge without creating directed edges or nodes.
    pub fn insert_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(edge);
        id
    }

    /// Add an edge through `coords` together with its two directed edges,
    /// inserting them into the stars of the end nodes.
    ///
    /// Fails if the coordinates are invalid (see [`Edge::new`]) or if either
    /// directed edge duplicates a direction already present at its node.  On
    /// failure the graph is left unchanged apart from possibly new isolated
    /// nodes.
    pub fn add_edge(&mut self, coords: Vec<Coord<f64>>, label: Label) -> Result<EdgeId, GraphError> {
        let edge = Edge::new(coords, label)?;
        let pts = edge.coords();
        let n = pts.len();
        let fwd_dir = EdgeDirection::new(pts[0], pts[1])?;
        let rev_dir = EdgeDirection::new(pts[n - 1], pts[n - 2])?;

        let from = self.add_node(pts[0]);
        let to = self.add_node(pts[n - 1]);
        if self.nodes[from.0].star.find(&fwd_dir).is_ok() {
            return Err(GraphError::DuplicateDirection(pts[0]));
        }
        if self.nodes[to.0].star.find(&rev_dir).is_ok() || (from == to && fwd_dir.compare(&rev_dir).is_eq()) {
            return Err(GraphError::DuplicateDirection(pts[n - 1]));
        }

        let edge_id = self.insert_edge(edge);
        let fwd = DirectedEdgeId(self.directed_edges.len());
        let rev = DirectedEdgeId(fwd.0 + 1);
        self.directed_edges.push(DirectedEdge {
            edge: edge_id, from, to, forward: true, sym: rev, next: None,
            in_result: false, label, direction: fwd_dir,
        });
        self.directed_edges.push(DirectedEdge {
            edge: edge_id, from: to, to: from, forward: false, sym: fwd, next: None,
            in_result: false, label: label.flipped(), direction: rev_dir,
        });

        self.nodes[from.0].star.insert_unique(StarEntry { id: fwd, direction: fwd_dir })?;
        self.nodes[to.0].star.insert_unique(StarEntry { id: rev, direction: rev_dir })?;
        Ok(edge_id)
    }

    /// Set `de.next = next`.
    pub fn set_next(&mut self, de: DirectedEdgeId, next: DirectedEdgeId) {
        self.directed_edges[de.0].next = Some(next);
    }

    /// Mark a directed edge as part of a result.
    pub fn set_in_result(&mut self, de: DirectedEdgeId, in_result: bool) {
        self.directed_edges[de.0].in_result = in_result;
    }

    // -----------------------------------------------------------------------
    // Linking
    // -----------------------------------------------------------------------

    /// Link every directed edge so that `next` turns to the following edge
    /// counter-clockwise at its destination; the resulting cycles trace the
    /// faces of the graph.
    pub fn link_all_directed_edges(&mut self) {
        for n in 0..self.nodes.len() {
            let ids: Vec<_> = self.nodes[n].star.ids().collect();
            let Some(&first_out) = ids.first() else { continue };
            for (i, &out) in ids.iter().enumerate() {
                let next_out = ids.get(i + 1).copied().unwrap_or(first_out);
                let incoming = self.directed_edges[out.0].sym;
                self.directed_edges[incoming.0].next = Some(next_out);
            }
        }
    }

    /// At every node, link each in-result incoming directed edge to the next
    /// in-result outgoing directed edge in counter-clockwise order.
    pub fn link_result_directed_edges(&mut self) -> Result<(), GraphError> {
        for n in 0..self.nodes.len() {
            let ids: Vec<_> = self.nodes[n].star.ids().collect();
            if !ids.iter().any(|&out| self.directed_edges[out.0].in_result) {
                if ids.iter().any(|&out| self.directed_edges[self.directed_edges[out.0].sym.0].in_result) {
                    return Err(GraphError::NoOutgoingResultEdge(self.nodes[n].coord));
                }
                continue;
            }
            for (i, &out) in ids.iter().enumerate() {
                let incoming = self.directed_edges[out.0].sym;
                if !self.directed_edges[incoming.0].in_result {
                    continue;
                }
                let next_out = (1..=ids.len())
                    .map(|k| ids[(i + k) % ids.len()])
                    .find(|&cand| self.directed_edges[cand.0].in_result)
                    .ok_or(GraphError::NoOutgoingResultEdge(self.nodes[n].coord))?;
                self.directed_edges[incoming.0].next = Some(next_out);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Iterate over the linked ring of directed edges starting at `start`,
    /// ending just before returning to it (or at an unlinked edge).
    pub fn face_cycle(&self, start: DirectedEdgeId) -> FaceCycle<'_> {
        FaceCycle { graph: self, start, current: Some(start), steps: 0 }
    }

    /// The node a directed edge enters.
    pub fn dest(&self, de: DirectedEdgeId) -> NodeId {
        self.directed_edges[de.0].to
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Iterator over the directed edges of a linked ring.
pub struct FaceCycle<'a> {
    graph:   &'a PlanarGraph,
    start:   DirectedEdgeId,
    current: Option<DirectedEdgeId>,
    steps:   usize,
}

impl<'a> Iterator for FaceCycle<'a> {
    type Item = DirectedEdgeId;

    fn next(&mut self) -> Option<DirectedEdgeId> {
        let de = self.current?;
        self.steps += 1;
        // A ring can never be longer than the number of directed edges.
        let next = self.graph.directed_edges[de.0].next;
        self.current = next.filter(|n| *n != self.start && self.steps < self.graph.directed_edges.len());
        Some(de)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Location;

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    /// Build a simple triangle and verify the directed-edge linkage.
    #[test]
    fn triangle() {
        let mut g = PlanarGraph::new();
        let label = Label::line_for(0, Location::Interior);

        let ab = g.add_edge(vec![c(0.0, 0.0), c(1.0, 0.0)], label).unwrap();
        g.add_edge(vec![c(1.0, 0.0), c(0.5, 1.0)], label).unwrap();
        g.add_edge(vec![c(0.5, 1.0), c(0.0, 0.0)], label).unwrap();

        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.num_directed_edges(), 6);
        assert_eq!(ab, EdgeId(0));

        g.link_all_directed_edges();
        for de in 0..g.num_directed_edges() {
            assert_eq!(g.face_cycle(DirectedEdgeId(de)).count(), 3);
        }
    }

    #[test]
    fn add_node_deduplicates_exactly() {
        let mut g = PlanarGraph::new();
        let a = g.add_node(c(0.0, 1.0));
        let b = g.add_node(c(-0.0, 1.0));
        let d = g.add_node(c(0.0, 1.0 + f64::EPSILON));
        assert_eq!(a, b);
        assert_ne!(a, d);
        assert_eq!(g.find_node(c(0.0, 1.0)), Some(a));
    }

    #[test]
    fn parallel_duplicate_edge_is_rejected() {
        let mut g = PlanarGraph::new();
        let label = Label::default();
        g.add_edge(vec![c(0.0, 0.0), c(2.0, 0.0)], label).unwrap();
        let err = g.add_edge(vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0)], label).unwrap_err();
        assert_eq!(err, GraphError::DuplicateDirection(c(0.0, 0.0)));
        assert_eq!(g.num_edges(), 1);
    }
}
