//! DE-9IM relate.
//!
//! Each argument is turned into a [`GeometryGraph`] of labelled edges and
//! nodes.  The [`RelateComputer`] nodes the edges, merges the nodes of both
//! graphs into a [`RelateNodeGraph`], bundles the edge ends at each node and
//! labels them relative to both arguments, and reads the
//! [`IntersectionMatrix`] off the labels.
use std::fmt;

mod computer;
mod edge_end;
mod geometry_graph;
mod matrix;
mod node_graph;

pub use computer::{RelateComputer, RelateEngine};
pub use edge_end::{edge_ends, EdgeEnd, EdgeEndBundle};
pub use geometry_graph::{dimension, GeometryGraph};
pub use matrix::{Dimension, IntersectionMatrix};
pub use node_graph::{EdgeEndBundleStar, RelateNode, RelateNodeGraph};

/// Progress of a [`RelateComputer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Unbuilt,
    NodesComputed,
    LabelsCopied,
    EdgeEndsLinked,
    MatrixComputed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unbuilt => "unbuilt",
            Phase::NodesComputed => "nodes computed",
            Phase::LabelsCopied => "labels copied",
            Phase::EdgeEndsLinked => "edge ends linked",
            Phase::MatrixComputed => "matrix computed",
        };
        f.write_str(name)
    }
}
