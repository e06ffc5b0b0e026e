//! Computational-geometry building blocks shared by noding and relate.
mod boundary;
mod distance;
mod intersector;
mod locate;

pub use boundary::BoundaryNodeRule;
pub use distance::{distance_squared, point_segment_distance};
pub use intersector::{compute_edge_distance, IntersectionKind, LineIntersector};
pub use locate::{locate_in_polygon, locate_in_ring, locate_point_in_area, PointLocator};

pub use geograph::robust::intersection_point;
pub use geograph::{is_ccw, orientation, Orientation};
