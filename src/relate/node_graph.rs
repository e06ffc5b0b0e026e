//! Nodes of the combined graph of both relate arguments, each with its star
//! of edge-end bundles.

use ahash::AHashMap;
use geo::{Coord, Geometry};

use geograph::{CoordKey, EdgeEndStar, Location, Position};

use crate::algorithm::{locate_point_in_area, BoundaryNodeRule};
use crate::error::ModelError;
use crate::relate::edge_end::{EdgeEnd, EdgeEndBundle};
use crate::relate::matrix::{Dimension, IntersectionMatrix};

/// Edge-end bundles around a node in counter-clockwise order.
pub type EdgeEndBundleStar = EdgeEndStar<EdgeEndBundle>;

/// A node of the relate graph.
#[derive(Clone, Debug)]
pub struct RelateNode {
    pub coord: Coord<f64>,
    pub label: geograph::Label,
    pub star: EdgeEndBundleStar,
}

impl RelateNode {
    fn new(coord: Coord<f64>) -> Self {
        Self { coord, label: Default::default(), star: EdgeEndBundleStar::new() }
    }

    /// Labelled by exactly one argument.
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }

    /// Toggle the node between boundary and interior of `arg`, as another
    /// boundary edge of that argument passes through it.
    pub fn set_label_boundary(&mut self, arg: usize) {
        let loc = match self.label.location(arg) {
            Some(Location::Boundary) => Location::Interior,
            _ => Location::Boundary,
        };
        self.label.set_location(arg, Some(loc));
    }

    /// Add `end` to the bundle with the same direction, starting a new one
    /// if there is none.
    pub fn add(&mut self, end: EdgeEnd) {
        self.star.insert_or_merge(EdgeEndBundle::new(end), |bundle, new| {
            for e in new.ends() {
                bundle.insert(*e);
            }
        });
    }

    /// Label every bundle of the star for both arguments.
    pub fn compute_labelling(&mut self, geoms: [&Geometry<f64>; 2], rule: BoundaryNodeRule) -> Result<(), ModelError> {
        for bundle in self.star.iter_mut() {
            bundle.compute_label(rule);
        }
        propagate_side_labels(&mut self.star, 0)?;
        propagate_side_labels(&mut self.star, 1)?;

        // A line end on a boundary can only come from a collapsed area.
        let mut has_collapse = [false; 2];
        for bundle in self.star.iter() {
            for (geom, collapsed) in has_collapse.iter_mut().enumerate() {
                if bundle.label.is_line(geom) && bundle.label.location(geom) == Some(Location::Boundary) {
                    *collapsed = true;
                }
            }
        }

        let mut located: [Option<Location>; 2] = [None; 2];
        let coord = self.coord;
        for bundle in self.star.iter_mut() {
            for geom in 0..2 {
                if !bundle.label.is_any_null(geom) {
                    continue;
                }
                let loc = if has_collapse[geom] {
                    Location::Exterior
                } else {
                    *located[geom].get_or_insert_with(|| locate_point_in_area(coord, geoms[geom]))
                };
                bundle.label.set_all_if_null(geom, loc);
            }
        }
        Ok(())
    }

    /// Contribute this node's own location pair as a point intersection.
    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        im.set_at_least_if_valid(self.label.location(0), self.label.location(1), Dimension::Point);
    }

    /// Contribute the bundles' labels: a line intersection for the `On`
    /// locations and an area intersection for each side.
    pub fn update_im_from_edges(&self, im: &mut IntersectionMatrix) {
        for bundle in self.star.iter() {
            update_im_from_label(&bundle.label, im);
        }
    }
}

/// Add the intersections implied by an edge label to `im`.
pub fn update_im_from_label(label: &geograph::Label, im: &mut IntersectionMatrix) {
    im.set_at_least_if_valid(label.location(0), label.location(1), Dimension::Line);
    if label.is_area() {
        for side in [Position::Left, Position::Right] {
            im.set_at_least_if_valid(label.side(0, side), label.side(1, side), Dimension::Area);
        }
    }
}

/// Walk the star counter-clockwise carrying the location of the face
/// between consecutive ends, filling unknown locations and checking that
/// known right sides agree with the face before them.
fn propagate_side_labels(star: &mut EdgeEndBundleStar, geom: usize) -> Result<(), ModelError> {
    // The face before the first end is the left side of the last end that
    // knows one.
    let start = star
        .iter()
        .filter(|b| b.label.is_area_for(geom))
        .filter_map(|b| b.label.side(geom, Position::Left))
        .last();
    let Some(mut curr) = start else { return Ok(()) };

    for bundle in star.iter_mut() {
        let label = &mut bundle.label;
        if label.location(geom).is_none() {
            label.set_location(geom, Some(curr));
        }
        if !label.is_area_for(geom) {
            continue;
        }
        let left = label.side(geom, Position::Left);
        match label.side(geom, Position::Right) {
            Some(right) => {
                if right != curr {
                    return Err(ModelError::SideLocationConflict(bundle.coord()));
                }
                curr = left.ok_or(ModelError::SideLocationConflict(bundle.coord()))?;
            }
            None => {
                if left.is_some() {
                    return Err(ModelError::SideLocationConflict(bundle.coord()));
                }
                label.set_side(geom, Position::Right, Some(curr));
                label.set_side(geom, Position::Left, Some(curr));
            }
        }
    }
    Ok(())
}

/// The nodes of both arguments, unique per coordinate.
#[derive(Clone, Debug, Default)]
pub struct RelateNodeGraph {
    nodes: Vec<RelateNode>,
    index: AHashMap<CoordKey, usize>,
}

impl RelateNodeGraph {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.nodes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn nodes(&self) -> &[RelateNode] { &self.nodes }

    pub fn nodes_mut(&mut self) -> &mut [RelateNode] { &mut self.nodes }

    /// The node at exactly `coord`, if any.
    pub fn find(&self, coord: Coord<f64>) -> Option<&RelateNode> {
        self.index.get(&CoordKey::from(coord)).map(|&i| &self.nodes[i])
    }

    /// The node at `coord`, created if it does not exist yet.
    pub fn add_node(&mut self, coord: Coord<f64>) -> &mut RelateNode {
        let next = self.nodes.len();
        let i = *self.index.entry(CoordKey::from(coord)).or_insert(next);
        if i == next {
            self.nodes.push(RelateNode::new(coord));
        }
        &mut self.nodes[i]
    }

    /// File each edge end under the node it leaves from.
    pub fn insert_edge_ends(&mut self, ends: impl IntoIterator<Item = EdgeEnd>) {
        for end in ends {
            self.add_node(end.coord()).add(end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon};
    use geograph::{EdgeId, Label};

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    #[test]
    fn boundary_label_toggles() {
        let mut graph = RelateNodeGraph::new();
        let node = graph.add_node(c(1.0, 1.0));
        node.set_label_boundary(0);
        assert_eq!(node.label.location(0), Some(Location::Boundary));
        node.set_label_boundary(0);
        assert_eq!(node.label.location(0), Some(Location::Interior));
        assert_eq!(graph.len(), 1);
        assert!(graph.add_node(c(-0.0, 1.0)).label.is_null(0));
        assert_eq!(graph.len(), 2);
        assert!(graph.find(c(1.0, 1.0)).is_some_and(RelateNode::is_isolated));
    }

    #[test]
    fn coincident_ends_share_a_bundle() {
        let mut graph = RelateNodeGraph::new();
        let end = |arg, to: Coord<f64>| EdgeEnd::new(arg, EdgeId(0), c(0.0, 0.0), to, Label::line_for(arg, Location::Interior)).unwrap();
        graph.insert_edge_ends([end(0, c(1.0, 0.0)), end(1, c(2.0, 0.0)), end(0, c(0.0, 1.0))]);
        let node = graph.find(c(0.0, 0.0)).unwrap();
        assert_eq!(node.star.len(), 2);
        assert_eq!(node.star.get(0).ends().len(), 2);
    }

    #[test]
    fn sides_propagate_around_a_node() {
        // A polygon corner at the origin with a line of the other argument
        // leaving it into the polygon interior.
        let square = Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]);
        let line = Geometry::LineString(geo::line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]);

        let ring = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        let mut graph = RelateNodeGraph::new();
        graph.insert_edge_ends([
            EdgeEnd::new(0, EdgeId(0), c(0.0, 0.0), c(2.0, 0.0), ring).unwrap(),
            EdgeEnd::new(0, EdgeId(0), c(0.0, 0.0), c(0.0, 2.0), ring.flipped()).unwrap(),
            EdgeEnd::new(1, EdgeId(0), c(0.0, 0.0), c(1.0, 1.0), Label::line_for(1, Location::Interior)).unwrap(),
        ]);
        let node = &mut graph.nodes_mut()[0];
        node.compute_labelling([&square, &line], BoundaryNodeRule::Mod2).unwrap();

        // The diagonal lies in the square's interior.
        let diagonal = node.star.iter().find(|b| b.ends()[0].arg == 1).unwrap();
        assert_eq!(diagonal.label.location(0), Some(Location::Interior));
        // The square's sides are in the exterior of the line.
        let side = node.star.iter().find(|b| b.ends()[0].arg == 0).unwrap();
        assert_eq!(side.label.side(1, Position::Left), Some(Location::Exterior));
    }

    #[test]
    fn inconsistent_sides_are_reported() {
        let square = Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]);
        // Both ends claim the interior on their left.
        let ring = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        let mut graph = RelateNodeGraph::new();
        graph.insert_edge_ends([
            EdgeEnd::new(0, EdgeId(0), c(0.0, 0.0), c(2.0, 0.0), ring).unwrap(),
            EdgeEnd::new(0, EdgeId(0), c(0.0, 0.0), c(0.0, 2.0), ring).unwrap(),
        ]);
        let node = &mut graph.nodes_mut()[0];
        assert!(matches!(
            node.compute_labelling([&square, &square], BoundaryNodeRule::Mod2),
            Err(ModelError::SideLocationConflict(_))
        ));
    }
}
