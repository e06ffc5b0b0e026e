//! Segment intersection.

use geo::Coord;

use geograph::robust::intersection_point;
use geograph::{orientation, Orientation};

use crate::algorithm::distance::point_segment_distance;
use crate::bounds::BoundingBox;

/// How two segments meet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    #[default]
    None,
    /// A single point.
    Point,
    /// A shared collinear stretch, given by its two end points.
    Collinear,
}

/// Computes the intersection of two segments, or of a point and a segment,
/// and keeps the result for inspection.
///
/// An intersection is *proper* when the segments cross at a single point in
/// the interior of both.  All orientation tests are robust, and a computed
/// crossing point is always kept inside both segments' envelopes.
#[derive(Clone, Debug, Default)]
pub struct LineIntersector {
    kind: IntersectionKind,
    segments: [[Coord<f64>; 2]; 2],
    points: [Coord<f64>; 2],
    proper: bool,
}

#[inline]
fn in_envelope(p1: Coord<f64>, p2: Coord<f64>, q: Coord<f64>) -> bool {
    q.x >= p1.x.min(p2.x) && q.x <= p1.x.max(p2.x) && q.y >= p1.y.min(p2.y) && q.y <= p1.y.max(p2.y)
}

impl LineIntersector {
    pub fn new() -> Self { Self::default() }

    /// Intersect the point `p` with the segment `p1`–`p2`.  The result is
    /// proper if `p` lies in the segment's interior.  The point is kept as a
    /// degenerate second segment.
    pub fn compute_point(&mut self, p: Coord<f64>, p1: Coord<f64>, p2: Coord<f64>) -> IntersectionKind {
        self.segments = [[p1, p2], [p, p]];
        self.proper = false;
        self.kind = IntersectionKind::None;
        if in_envelope(p1, p2, p) && orientation(p1, p2, p) == Orientation::Collinear {
            self.proper = p != p1 && p != p2;
            self.points[0] = p;
            self.kind = IntersectionKind::Point;
        }
        self.kind
    }

    /// Intersect the segments `p1`–`p2` and `q1`–`q2`.
    pub fn compute(&mut self, p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> IntersectionKind {
        self.segments = [[p1, p2], [q1, q2]];
        self.kind = self.compute_intersect(p1, p2, q1, q2);
        self.kind
    }

    fn compute_intersect(&mut self, p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> IntersectionKind {
        self.proper = false;

        let env_p = BoundingBox::new(p1.x, p1.y, p2.x, p2.y);
        if !env_p.intersects(&BoundingBox::new(q1.x, q1.y, q2.x, q2.y)) {
            return IntersectionKind::None;
        }

        let pq1 = orientation(p1, p2, q1).index();
        let pq2 = orientation(p1, p2, q2).index();
        if pq1 * pq2 > 0 {
            return IntersectionKind::None;
        }
        let qp1 = orientation(q1, q2, p1).index();
        let qp2 = orientation(q1, q2, p2).index();
        if qp1 * qp2 > 0 {
            return IntersectionKind::None;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return self.compute_collinear(p1, p2, q1, q2);
        }

        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint touches the other segment.  Shared endpoints are
            // taken as exact; otherwise the touching endpoint is the answer.
            self.points[0] = if p1 == q1 || p1 == q2 {
                p1
            } else if p2 == q1 || p2 == q2 {
                p2
            } else if pq1 == 0 {
                q1
            } else if pq2 == 0 {
                q2
            } else if qp1 == 0 {
                p1
            } else {
                p2
            };
        } else {
            self.proper = true;
            self.points[0] = self.crossing(p1, p2, q1, q2);
        }
        IntersectionKind::Point
    }

    fn compute_collinear(&mut self, p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> IntersectionKind {
        let q1_in_p = in_envelope(p1, p2, q1);
        let q2_in_p = in_envelope(p1, p2, q2);
        let p1_in_q = in_envelope(q1, q2, p1);
        let p2_in_q = in_envelope(q1, q2, p2);

        let (a, b, single) = if q1_in_p && q2_in_p {
            (q1, q2, false)
        } else if p1_in_q && p2_in_q {
            (p1, p2, false)
        } else if q1_in_p && p1_in_q {
            (q1, p1, q1 == p1 && !q2_in_p && !p2_in_q)
        } else if q1_in_p && p2_in_q {
            (q1, p2, q1 == p2 && !q2_in_p && !p1_in_q)
        } else if q2_in_p && p1_in_q {
            (q2, p1, q2 == p1 && !q1_in_p && !p2_in_q)
        } else if q2_in_p && p2_in_q {
            (q2, p2, q2 == p2 && !q1_in_p && !p1_in_q)
        } else {
            return IntersectionKind::None;
        };
        self.points = [a, b];
        if single { IntersectionKind::Point } else { IntersectionKind::Collinear }
    }

    /// Crossing point of two properly intersecting segments.
    fn crossing(&self, p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> Coord<f64> {
        match intersection_point(p1, p2, q1, q2) {
            Some(pt) if in_envelope(p1, p2, pt) && in_envelope(q1, q2, pt) => pt,
            _ => nearest_endpoint(p1, p2, q1, q2),
        }
    }

    // -----------------------------------------------------------------------
    // Result
    // -----------------------------------------------------------------------

    #[inline] pub fn kind(&self) -> IntersectionKind { self.kind }

    #[inline] pub fn has_intersection(&self) -> bool { self.kind != IntersectionKind::None }

    #[inline] pub fn is_proper(&self) -> bool { self.has_intersection() && self.proper }

    #[inline] pub fn is_collinear(&self) -> bool { self.kind == IntersectionKind::Collinear }

    /// Number of intersection points: 0, 1 or 2.
    pub fn num_points(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    #[inline] pub fn point(&self, i: usize) -> Coord<f64> { self.points[i] }

    pub fn points(&self) -> &[Coord<f64>] { &self.points[..self.num_points()] }

    /// `true` if `pt` is one of the intersection points.
    pub fn is_intersection(&self, pt: Coord<f64>) -> bool {
        self.points().contains(&pt)
    }

    /// `true` if some intersection point is not an endpoint of segment
    /// `segment` (0 or 1) of the last computation.
    pub fn is_interior_intersection_on(&self, segment: usize) -> bool {
        let [a, b] = self.segments[segment];
        self.points().iter().any(|pt| *pt != a && *pt != b)
    }

    /// `true` if some intersection point is interior to either segment.
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_on(0) || self.is_interior_intersection_on(1)
    }

    /// Distance of intersection point `point` along segment `segment`, see
    /// [`compute_edge_distance`].
    pub fn edge_distance(&self, segment: usize, point: usize) -> f64 {
        let [p0, p1] = self.segments[segment];
        compute_edge_distance(self.points[point], p0, p1)
    }
}

/// The endpoint of either segment closest to the other segment.
fn nearest_endpoint(p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> Coord<f64> {
    [
        (p1, point_segment_distance(p1, q1, q2)),
        (p2, point_segment_distance(p2, q1, q2)),
        (q1, point_segment_distance(q1, p1, p2)),
        (q2, point_segment_distance(q2, p1, p2)),
    ]
    .into_iter()
    .reduce(|best, cand| if cand.1 < best.1 { cand } else { best })
    .map_or(p1, |(pt, _)| pt)
}

/// A monotone measure of how far `p` lies along the segment `p0`–`p1`.
///
/// `p` must lie on the segment.  The larger coordinate delta is used, which
/// keeps the measure exact for axis-parallel segments and strictly positive
/// for any point other than `p0`.
pub fn compute_edge_distance(p: Coord<f64>, p0: Coord<f64>, p1: Coord<f64>) -> f64 {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    if p == p0 {
        return 0.0;
    }
    if p == p1 {
        return dx.max(dy);
    }
    let pdx = (p.x - p0.x).abs();
    let pdy = (p.y - p0.y).abs();
    let dist = if dx > dy { pdx } else { pdy };
    if dist == 0.0 { pdx.max(pdy) } else { dist }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    #[test]
    fn proper_crossing() {
        let mut li = LineIntersector::new();
        assert_eq!(li.compute(c(0.0, 0.0), c(10.0, 10.0), c(0.0, 10.0), c(10.0, 0.0)), IntersectionKind::Point);
        assert!(li.is_proper());
        assert_eq!(li.point(0), c(5.0, 5.0));
        assert_eq!(li.edge_distance(0, 0), 5.0);
        assert!(li.is_interior_intersection());
    }

    #[test]
    fn touching_at_endpoint_is_not_proper() {
        let mut li = LineIntersector::new();
        assert_eq!(li.compute(c(0.0, 0.0), c(10.0, 0.0), c(5.0, 0.0), c(5.0, 5.0)), IntersectionKind::Point);
        assert!(!li.is_proper());
        assert_eq!(li.point(0), c(5.0, 0.0));
        assert!(li.is_interior_intersection_on(0));
        assert!(!li.is_interior_intersection_on(1));
    }

    #[test]
    fn shared_endpoint() {
        let mut li = LineIntersector::new();
        li.compute(c(0.0, 0.0), c(1.0, 1.0), c(1.0, 1.0), c(2.0, 0.0));
        assert_eq!(li.points(), &[c(1.0, 1.0)]);
        assert!(!li.is_interior_intersection());
    }

    #[test]
    fn collinear_overlap() {
        let mut li = LineIntersector::new();
        assert_eq!(li.compute(c(0.0, 0.0), c(10.0, 0.0), c(5.0, 0.0), c(15.0, 0.0)), IntersectionKind::Collinear);
        assert!(li.is_intersection(c(5.0, 0.0)) && li.is_intersection(c(10.0, 0.0)));
        assert!(!li.is_proper());

        // Collinear segments meeting end to end share a single point.
        assert_eq!(li.compute(c(0.0, 0.0), c(5.0, 0.0), c(5.0, 0.0), c(9.0, 0.0)), IntersectionKind::Point);
        assert_eq!(li.compute(c(0.0, 0.0), c(4.0, 0.0), c(5.0, 0.0), c(9.0, 0.0)), IntersectionKind::None);
    }

    #[test]
    fn disjoint_and_parallel() {
        let mut li = LineIntersector::new();
        assert_eq!(li.compute(c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)), IntersectionKind::None);
        assert_eq!(li.compute(c(0.0, 0.0), c(1.0, 1.0), c(2.0, 0.0), c(3.0, -5.0)), IntersectionKind::None);
        assert_eq!(li.num_points(), 0);
    }

    #[test]
    fn point_on_segment() {
        let mut li = LineIntersector::new();
        assert_eq!(li.compute_point(c(2.0, 2.0), c(0.0, 0.0), c(4.0, 4.0)), IntersectionKind::Point);
        assert!(li.is_proper());
        assert_eq!(li.compute_point(c(0.0, 0.0), c(0.0, 0.0), c(4.0, 4.0)), IntersectionKind::Point);
        assert!(!li.is_proper());
        assert_eq!(li.compute_point(c(2.0, 2.1), c(0.0, 0.0), c(4.0, 4.0)), IntersectionKind::None);
    }

    #[test]
    fn edge_distance_is_monotone() {
        let (p0, p1) = (c(0.0, 0.0), c(3.0, 8.0));
        let d = |t: f64| compute_edge_distance(c(3.0 * t, 8.0 * t), p0, p1);
        assert_eq!(d(0.0), 0.0);
        assert!(d(0.25) < d(0.5) && d(0.5) < d(1.0));
        assert_eq!(d(1.0), 8.0);
    }

    #[test]
    fn point_test_replaces_previous_segments() {
        let mut li = LineIntersector::new();
        li.compute(c(0.0, 0.0), c(10.0, 10.0), c(0.0, 10.0), c(10.0, 0.0));
        assert_eq!(li.compute_point(c(0.0, 3.0), c(0.0, 0.0), c(0.0, 4.0)), IntersectionKind::Point);
        assert!(li.is_proper());
        assert_eq!(li.edge_distance(0, 0), 3.0);
        assert_eq!(li.edge_distance(1, 0), 0.0);
        assert!(li.is_interior_intersection_on(0));
        assert!(!li.is_interior_intersection_on(1));
    }
}
