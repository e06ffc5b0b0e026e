//! Edge ends and the bundles of coincident edge ends at a node.

use geo::Coord;
use smallvec::SmallVec;

use geograph::{Directed, Edge, EdgeDirection, EdgeId, EdgeIntersection, Label, Location, Position};

use crate::algorithm::BoundaryNodeRule;
use crate::error::ModelError;

/// The stub of a noded edge leaving a node.
#[derive(Clone, Copy, Debug)]
pub struct EdgeEnd {
    /// Which argument the edge belongs to.
    pub arg: usize,
    pub edge: EdgeId,
    pub label: Label,
    direction: EdgeDirection,
}

impl EdgeEnd {
    pub fn new(arg: usize, edge: EdgeId, p0: Coord<f64>, p1: Coord<f64>, label: Label) -> Result<Self, ModelError> {
        Ok(Self { arg, edge, label, direction: EdgeDirection::new(p0, p1)? })
    }

    /// The node the end leaves from.
    #[inline] pub fn coord(&self) -> Coord<f64> { self.direction.origin() }
}

impl Directed for EdgeEnd {
    fn direction(&self) -> &EdgeDirection { &self.direction }
}

/// Create the edge ends of `edge` at each of its intersections: one
/// pointing back along the edge (with the label flipped) and one pointing
/// forward.  The intersection list must contain the endpoints.
pub fn edge_ends(arg: usize, id: EdgeId, edge: &Edge, out: &mut Vec<EdgeEnd>) -> Result<(), ModelError> {
    let eis: Vec<EdgeIntersection> = edge.intersections().iter().collect();
    for (i, curr) in eis.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| &eis[j]);
        let next = eis.get(i + 1);
        if let Some(end) = end_for_prev(arg, id, edge, curr, prev)? {
            out.push(end);
        }
        if let Some(end) = end_for_next(arg, id, edge, curr, next)? {
            out.push(end);
        }
    }
    Ok(())
}

fn end_for_prev(arg: usize, id: EdgeId, edge: &Edge, curr: &EdgeIntersection, prev: Option<&EdgeIntersection>) -> Result<Option<EdgeEnd>, ModelError> {
    let mut i_prev = curr.segment_index;
    if curr.distance == 0.0 {
        // At the start of the edge there is nothing behind.
        if i_prev == 0 {
            return Ok(None);
        }
        i_prev -= 1;
    }
    let p_prev = match prev {
        Some(p) if p.segment_index >= i_prev => p.coord,
        _ => edge.coord(i_prev),
    };
    EdgeEnd::new(arg, id, curr.coord, p_prev, edge.label().flipped()).map(Some)
}

fn end_for_next(arg: usize, id: EdgeId, edge: &Edge, curr: &EdgeIntersection, next: Option<&EdgeIntersection>) -> Result<Option<EdgeEnd>, ModelError> {
    let i_next = curr.segment_index + 1;
    let p_next = match next {
        Some(n) if n.segment_index == curr.segment_index => n.coord,
        _ if i_next < edge.num_points() => edge.coord(i_next),
        _ => return Ok(None),
    };
    EdgeEnd::new(arg, id, curr.coord, p_next, *edge.label()).map(Some)
}

/// All edge ends leaving a node in one direction.
#[derive(Clone, Debug)]
pub struct EdgeEndBundle {
    pub label: Label,
    ends: SmallVec<[EdgeEnd; 2]>,
    direction: EdgeDirection,
}

impl EdgeEndBundle {
    pub fn new(end: EdgeEnd) -> Self {
        let mut ends = SmallVec::new();
        ends.push(end);
        Self { label: end.label, direction: end.direction, ends }
    }

    pub fn insert(&mut self, end: EdgeEnd) {
        self.ends.push(end);
    }

    #[inline] pub fn ends(&self) -> &[EdgeEnd] { &self.ends }

    #[inline] pub fn coord(&self) -> Coord<f64> { self.direction.origin() }

    /// Combine the labels of the bundled ends.  The `On` location of each
    /// geometry is `Boundary` or `Interior` by the rule applied to the number
    /// of boundary ends; a side is `Interior` if any end says so.
    pub fn compute_label(&mut self, rule: BoundaryNodeRule) {
        let is_area = self.ends.iter().any(|e| e.label.is_area());
        self.label = if is_area { Label::area(None, None, None) } else { Label::line(None) };
        for geom in 0..2 {
            self.compute_label_on(geom, rule);
            if is_area {
                self.compute_label_side(geom, Position::Left);
                self.compute_label_side(geom, Position::Right);
            }
        }
    }

    fn compute_label_on(&mut self, geom: usize, rule: BoundaryNodeRule) {
        let mut boundary_count = 0;
        let mut found_interior = false;
        for e in &self.ends {
            match e.label.location(geom) {
                Some(Location::Boundary) => boundary_count += 1,
                Some(Location::Interior) => found_interior = true,
                _ => {}
            }
        }
        let loc = if boundary_count > 0 {
            Some(if rule.is_in_boundary(boundary_count) { Location::Boundary } else { Location::Interior })
        } else if found_interior {
            Some(Location::Interior)
        } else {
            None
        };
        self.label.set_location(geom, loc);
    }

    fn compute_label_side(&mut self, geom: usize, side: Position) {
        for e in self.ends.iter().filter(|e| e.label.is_area()) {
            match e.label.side(geom, side) {
                Some(Location::Interior) => {
                    self.label.set_side(geom, side, Some(Location::Interior));
                    return;
                }
                Some(Location::Exterior) => self.label.set_side(geom, side, Some(Location::Exterior)),
                _ => {}
            }
        }
    }
}

impl Directed for EdgeEndBundle {
    fn direction(&self) -> &EdgeDirection { &self.direction }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    #[test]
    fn ends_at_every_intersection() {
        let mut edge = Edge::new(vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)], Label::line_for(0, Location::Interior)).unwrap();
        edge.add_intersection(c(2.0, 0.0), 0, 2.0);
        edge.add_endpoint_intersections();

        let mut ends = Vec::new();
        edge_ends(0, EdgeId(0), &edge, &mut ends).unwrap();
        let pairs: Vec<_> = ends.iter().map(|e| (e.coord(), e.direction().directed_coord())).collect();
        assert_eq!(
            pairs,
            vec![
                (c(0.0, 0.0), c(2.0, 0.0)),
                (c(2.0, 0.0), c(0.0, 0.0)),
                (c(2.0, 0.0), c(4.0, 0.0)),
                (c(4.0, 4.0), c(4.0, 0.0)),
            ]
        );
    }

    #[test]
    fn backward_end_has_flipped_sides() {
        let label = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        let mut edge = Edge::new(vec![c(0.0, 0.0), c(2.0, 0.0), c(2.0, 2.0), c(0.0, 0.0)], label).unwrap();
        edge.add_endpoint_intersections();

        let mut ends = Vec::new();
        edge_ends(0, EdgeId(0), &edge, &mut ends).unwrap();
        assert_eq!(ends.len(), 2);
        assert_eq!(ends[0].label.side(0, Position::Left), Some(Location::Interior));
        assert_eq!(ends[1].label.side(0, Position::Left), Some(Location::Exterior));
    }

    #[test]
    fn bundle_label_counts_boundaries() {
        let dir = |label| EdgeEnd::new(0, EdgeId(0), c(0.0, 0.0), c(1.0, 0.0), label).unwrap();
        let mut bundle = EdgeEndBundle::new(dir(Label::line_for(0, Location::Boundary)));
        bundle.insert(dir(Label::line_for(0, Location::Boundary)));
        bundle.compute_label(BoundaryNodeRule::Mod2);
        assert_eq!(bundle.label.location(0), Some(Location::Interior));
        assert_eq!(bundle.label.location(1), None);
        bundle.compute_label(BoundaryNodeRule::EndPoint);
        assert_eq!(bundle.label.location(0), Some(Location::Boundary));
    }
}
