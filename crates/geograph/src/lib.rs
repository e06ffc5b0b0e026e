pub mod edge;
pub mod error;
pub mod graph;
pub mod label;
pub mod quadrant;
pub mod robust;
pub mod star;

pub use edge::{Edge, EdgeIntersection, EdgeIntersectionList};
pub use error::GraphError;
pub use graph::{CoordKey, DirectedEdge, DirectedEdgeId, DirectedEdgeStar, EdgeId, Node, NodeId, PlanarGraph, StarEntry};
pub use label::{Label, Location, Position, TopologyLocation};
pub use quadrant::Quadrant;
pub use robust::{is_ccw, orientation, Orientation, DD};
pub use star::{Directed, EdgeDirection, EdgeEndStar};
