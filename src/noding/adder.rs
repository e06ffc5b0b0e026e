use geo::Coord;

use crate::algorithm::LineIntersector;
use crate::noding::noder::{EdgeRef, EdgeSet};

/// Intersects candidate segment pairs and records the intersection points
/// on both edges.
///
/// Intersections that every edge has by construction are *trivial* and are
/// neither recorded nor reported: adjacent segments of one edge meeting at
/// their shared vertex, and the first and last segments of a closed edge
/// meeting at its start point.
#[derive(Clone, Debug, Default)]
pub struct IntersectionAdder {
    li: LineIntersector,
    include_proper: bool,
    record_isolated: bool,
    boundary_nodes: [Vec<Coord<f64>>; 2],

    has_intersection: bool,
    has_proper: bool,
    has_proper_interior: bool,
    proper_intersection_point: Option<Coord<f64>>,
    num_tests: usize,
    num_intersections: usize,
}

impl IntersectionAdder {
    /// `include_proper` controls whether proper intersections are recorded
    /// on the edges (they are always reported); `record_isolated` clears the
    /// isolated flag of every edge found to intersect another.
    pub fn new(include_proper: bool, record_isolated: bool) -> Self {
        Self { include_proper, record_isolated, ..Self::default() }
    }

    /// Boundary nodes of the two input geometries; a proper intersection at
    /// one of them is not counted as interior.
    pub fn set_boundary_nodes(&mut self, a: Vec<Coord<f64>>, b: Vec<Coord<f64>>) {
        self.boundary_nodes = [a, b];
    }

    #[inline] pub fn has_intersection(&self) -> bool { self.has_intersection }

    /// `true` if some intersection crossed both segments in their interiors.
    #[inline] pub fn has_proper_intersection(&self) -> bool { self.has_proper }

    /// `true` if some proper intersection is not at a boundary node.
    #[inline] pub fn has_proper_interior_intersection(&self) -> bool { self.has_proper_interior }

    /// The last proper intersection found.
    #[inline] pub fn proper_intersection_point(&self) -> Option<Coord<f64>> { self.proper_intersection_point }

    /// Number of segment pairs tested.
    #[inline] pub fn num_tests(&self) -> usize { self.num_tests }

    /// Number of segment pairs found to intersect, trivial ones included.
    #[inline] pub fn num_intersections(&self) -> usize { self.num_intersections }

    fn is_trivial(&self, edges: &EdgeSet<'_>, e0: EdgeRef, s0: usize, e1: EdgeRef, s1: usize) -> bool {
        if e0 != e1 || self.li.num_points() != 1 {
            return false;
        }
        if s0.abs_diff(s1) == 1 {
            return true;
        }
        let edge = edges.edge(e0);
        let last = edge.num_points() - 2;
        edge.is_closed() && ((s0 == 0 && s1 == last) || (s1 == 0 && s0 == last))
    }

    fn is_boundary_point(&self) -> bool {
        self.li.points().iter().any(|p| self.boundary_nodes.iter().any(|nodes| nodes.contains(p)))
    }

    /// Intersect segment `s0` of `e0` with segment `s1` of `e1`.
    pub fn add_intersections(&mut self, edges: &mut EdgeSet<'_>, e0: EdgeRef, s0: usize, e1: EdgeRef, s1: usize) {
        if e0 == e1 && s0 == s1 {
            return;
        }
        self.num_tests += 1;

        let (p0, p1) = edges.segment(e0, s0);
        let (q0, q1) = edges.segment(e1, s1);
        self.li.compute(p0, p1, q0, q1);
        if !self.li.has_intersection() {
            return;
        }

        if self.record_isolated {
            edges.edge_mut(e0).set_isolated(false);
            edges.edge_mut(e1).set_isolated(false);
        }
        self.num_intersections += 1;
        if self.is_trivial(edges, e0, s0, e1, s1) {
            return;
        }
        self.has_intersection = true;

        let proper = self.li.is_proper();
        if self.include_proper || !proper {
            for i in 0..self.li.num_points() {
                let pt = self.li.point(i);
                edges.edge_mut(e0).add_intersection(pt, s0, self.li.edge_distance(0, i));
                edges.edge_mut(e1).add_intersection(pt, s1, self.li.edge_distance(1, i));
            }
        }
        if proper {
            self.proper_intersection_point = Some(self.li.point(0));
            self.has_proper = true;
            if !self.is_boundary_point() {
                self.has_proper_interior = true;
            }
        }
    }
}
