//! Edge directions and angularly sorted stars of edge ends around a node.

use std::cmp::Ordering;

use geo::Coord;

use crate::error::GraphError;
use crate::quadrant::Quadrant;
use crate::robust::{orientation, Orientation};

/// The direction of an edge end: the ray from `p0` (at the node) through
/// `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeDirection {
    p0: Coord<f64>,
    p1: Coord<f64>,
    dx: f64,
    dy: f64,
    quadrant: Quadrant,
}

impl EdgeDirection {
    /// Fails with [`GraphError::ZeroLengthSegment`] if `p0 == p1`.
    pub fn new(p0: Coord<f64>, p1: Coord<f64>) -> Result<Self, GraphError> {
        let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
        let quadrant = Quadrant::of(dx, dy).ok_or(GraphError::ZeroLengthSegment(p0))?;
        Ok(Self { p0, p1, dx, dy, quadrant })
    }

    /// The node the ray starts from.
    #[inline] pub fn origin(&self) -> Coord<f64> { self.p0 }

    /// The point the ray passes through.
    #[inline] pub fn directed_coord(&self) -> Coord<f64> { self.p1 }

    #[inline] pub fn dx(&self) -> f64 { self.dx }

    #[inline] pub fn dy(&self) -> f64 { self.dy }

    #[inline] pub fn quadrant(&self) -> Quadrant { self.quadrant }

    /// Angle in radians in `(-π, π]`.
    pub fn angle(&self) -> f64 { self.dy.atan2(self.dx) }

    /// Compare by angle, counter-clockwise from the positive x-axis.
    ///
    /// Quadrants are compared first; within a quadrant the robust
    /// orientation decides, so the order is exact.  Collinear rays compare
    /// equal.
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => match orientation(other.p0, other.p1, self.p1) {
                Orientation::CounterClockwise => Ordering::Greater,
                Orientation::Clockwise => Ordering::Less,
                Orientation::Collinear => Ordering::Equal,
            },
            ord => ord,
        }
    }
}

/// Anything that leaves a node in a known direction.
pub trait Directed {
    fn direction(&self) -> &EdgeDirection;
}

impl Directed for EdgeDirection {
    fn direction(&self) -> &EdgeDirection { self }
}

/// Edge ends around one node, sorted by increasing angle.
#[derive(Clone, Debug)]
pub struct EdgeEndStar<E> {
    ends: Vec<E>,
}

impl<E> Default for EdgeEndStar<E> {
    fn default() -> Self { Self { ends: Vec::new() } }
}

impl<E: Directed> EdgeEndStar<E> {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.ends.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ends.is_empty() }

    #[inline] pub fn get(&self, i: usize) -> &E { &self.ends[i] }

    #[inline] pub fn get_mut(&mut self, i: usize) -> &mut E { &mut self.ends[i] }

    /// Ends in counter-clockwise order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> { self.ends.iter() }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> { self.ends.iter_mut() }

    /// `Ok(i)` if an end with the same direction is at `i`, otherwise
    /// `Err(i)` with the insertion position.
    pub fn find(&self, dir: &EdgeDirection) -> Result<usize, usize> {
        self.ends.binary_search_by(|e| e.direction().compare(dir))
    }

    /// Insert `end` at its angular position, rejecting a direction already
    /// present.
    pub fn insert_unique(&mut self, end: E) -> Result<usize, GraphError> {
        match self.find(end.direction()) {
            Ok(_) => Err(GraphError::DuplicateDirection(end.direction().origin())),
            Err(i) => {
                self.ends.insert(i, end);
                Ok(i)
            }
        }
    }

    /// Insert `end`, or hand it to `merge` together with the end already
    /// stored in the same direction.
    pub fn insert_or_merge(&mut self, end: E, merge: impl FnOnce(&mut E, E)) -> usize {
        match self.find(end.direction()) {
            Ok(i) => {
                merge(&mut self.ends[i], end);
                i
            }
            Err(i) => {
                self.ends.insert(i, end);
                i
            }
        }
    }

    /// Index of the next end counter-clockwise from `i`.
    pub fn next_ccw(&self, i: usize) -> usize {
        if i + 1 == self.ends.len() { 0 } else { i + 1 }
    }

    /// Index of the next end clockwise from `i`.
    pub fn next_cw(&self, i: usize) -> usize {
        if i == 0 { self.ends.len() - 1 } else { i - 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(x: f64, y: f64) -> EdgeDirection {
        EdgeDirection::new(Coord { x: 0.0, y: 0.0 }, Coord { x, y }).unwrap()
    }

    #[test]
    fn compare_follows_angle() {
        let east = dir(1.0, 0.0);
        let north = dir(0.0, 1.0);
        let ne = dir(1.0, 1.0);
        let south = dir(0.0, -1.0);
        assert_eq!(east.compare(&ne), Ordering::Less);
        assert_eq!(ne.compare(&north), Ordering::Less);
        assert_eq!(south.compare(&north), Ordering::Greater);
        assert_eq!(dir(2.0, 2.0).compare(&ne), Ordering::Equal);
    }

    #[test]
    fn star_stays_sorted() {
        let mut star = EdgeEndStar::new();
        for (x, y) in [(0.0, -1.0), (1.0, 0.0), (-1.0, 0.0), (0.0, 1.0)] {
            star.insert_unique(dir(x, y)).unwrap();
        }
        let angles: Vec<_> = star.iter().map(|d| (d.dx(), d.dy())).collect();
        assert_eq!(angles, vec![(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]);
        assert_eq!(star.next_ccw(3), 0);
        assert_eq!(star.next_cw(0), 3);
    }

    #[test]
    fn duplicate_direction_fails() {
        let mut star = EdgeEndStar::new();
        star.insert_unique(dir(1.0, 1.0)).unwrap();
        assert!(matches!(star.insert_unique(dir(3.0, 3.0)), Err(GraphError::DuplicateDirection(_))));
    }

    #[test]
    fn zero_length_direction_fails() {
        let p = Coord { x: 1.0, y: 1.0 };
        assert_eq!(EdgeDirection::new(p, p), Err(GraphError::ZeroLengthSegment(p)));
    }
}
