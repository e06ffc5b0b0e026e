//! Finding and recording the intersections of edges.
//!
//! Noding runs in two steps.  An [`EdgeSetIntersector`] proposes the pairs
//! of segments that may intersect, either through monotone chains indexed in
//! an [`StrTree`](crate::StrTree) or by brute force.  The
//! [`IntersectionAdder`] then intersects each pair and records every
//! non-trivial intersection point on both edges.
mod adder;
mod chain;
mod noder;

pub use adder::IntersectionAdder;
pub use chain::MonotoneChain;
pub use noder::{EdgeRef, EdgeSet, EdgeSetIntersector, Noder, NodingSummary, SimpleIntersector, StrTreeIntersector};
