//! The planar graph of one relate argument.

use ahash::AHashMap;
use geo::{BoundingRect, Coord, Geometry, LineString, Polygon};
use tracing::trace;

use geograph::{is_ccw, Edge, EdgeId, GraphError, Label, Location, NodeId, PlanarGraph};

use crate::algorithm::BoundaryNodeRule;
use crate::bounds::BoundingBox;
use crate::error::ModelError;
use crate::noding::{IntersectionAdder, Noder};
use crate::relate::matrix::Dimension;

/// Topological dimension of a geometry; [`Dimension::Empty`] if it has no
/// points.
pub fn dimension(geom: &Geometry<f64>) -> Dimension {
    match geom {
        Geometry::Point(_) => Dimension::Point,
        Geometry::MultiPoint(mp) if mp.0.is_empty() => Dimension::Empty,
        Geometry::MultiPoint(_) => Dimension::Point,
        Geometry::Line(_) => Dimension::Line,
        Geometry::LineString(ls) if ls.0.is_empty() => Dimension::Empty,
        Geometry::LineString(_) => Dimension::Line,
        Geometry::MultiLineString(mls) if mls.iter().all(|ls| ls.0.is_empty()) => Dimension::Empty,
        Geometry::MultiLineString(_) => Dimension::Line,
        Geometry::Polygon(p) if p.exterior().0.is_empty() => Dimension::Empty,
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => Dimension::Area,
        Geometry::MultiPolygon(mp) if mp.iter().all(|p| p.exterior().0.is_empty()) => Dimension::Empty,
        Geometry::MultiPolygon(_) => Dimension::Area,
        Geometry::GeometryCollection(gc) => gc.iter().map(dimension).max().unwrap_or_default(),
    }
}

/// The edges and nodes of one geometry, labelled relative to it.
///
/// Linework becomes edges labelled `Interior`; polygon rings become edges
/// labelled `Boundary` with their interior on the right for a shell and on
/// the left for a hole.  Line endpoints are tallied per node while the
/// geometry is added; the boundary node rule then places each endpoint node
/// on the boundary or in the interior from its full count.
#[derive(Debug)]
pub struct GeometryGraph<'a> {
    arg_index: usize,
    geometry: &'a Geometry<f64>,
    graph: PlanarGraph,
    rule: BoundaryNodeRule,
    endpoints: AHashMap<NodeId, usize>,
    dimension: Dimension,
    bounds: BoundingBox,
}

impl<'a> GeometryGraph<'a> {
    pub fn new(arg_index: usize, geometry: &'a Geometry<f64>, rule: BoundaryNodeRule) -> Result<Self, ModelError> {
        let mut gg = Self {
            arg_index,
            geometry,
            graph: PlanarGraph::new(),
            rule,
            endpoints: AHashMap::new(),
            dimension: dimension(geometry),
            bounds: geometry.bounding_rect().map(BoundingBox::from).unwrap_or_default(),
        };
        gg.add(geometry)?;
        gg.apply_boundary_rule();
        trace!(
            arg = arg_index,
            nodes = gg.graph.num_nodes(),
            edges = gg.graph.num_edges(),
            "built geometry graph"
        );
        Ok(gg)
    }

    #[inline] pub fn arg_index(&self) -> usize { self.arg_index }

    #[inline] pub fn geometry(&self) -> &'a Geometry<f64> { self.geometry }

    #[inline] pub fn graph(&self) -> &PlanarGraph { &self.graph }

    #[inline] pub fn rule(&self) -> BoundaryNodeRule { self.rule }

    #[inline] pub fn dimension(&self) -> Dimension { self.dimension }

    #[inline] pub fn bounds(&self) -> BoundingBox { self.bounds }

    #[inline] pub fn edges(&self) -> &[Edge] { self.graph.edges() }

    #[inline] pub fn edges_mut(&mut self) -> &mut [Edge] { self.graph.edges_mut() }

    #[inline] pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge { self.graph.edge_mut(id) }

    /// Coordinates of the nodes on this geometry's boundary.
    pub fn boundary_nodes(&self) -> Vec<Coord<f64>> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| n.label.location(self.arg_index) == Some(Location::Boundary))
            .map(|n| n.coord)
            .collect()
    }

    /// `true` if the boundary is non-empty: always for areas, for linework
    /// when the rule leaves some endpoint on the boundary.
    pub fn has_boundary(&self) -> bool {
        match self.dimension {
            Dimension::Area => true,
            Dimension::Line => !self.boundary_nodes().is_empty(),
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    fn add(&mut self, geom: &Geometry<f64>) -> Result<(), ModelError> {
        match geom {
            Geometry::Point(p) => self.insert_point(p.0, Location::Interior)?,
            Geometry::MultiPoint(mp) => {
                for p in mp {
                    self.insert_point(p.0, Location::Interior)?;
                }
            }
            Geometry::Line(l) => self.add_line_string(&LineString::from(vec![l.start, l.end]))?,
            Geometry::LineString(ls) => self.add_line_string(ls)?,
            Geometry::MultiLineString(mls) => {
                for ls in mls {
                    self.add_line_string(ls)?;
                }
            }
            Geometry::Polygon(p) => self.add_polygon(p)?,
            Geometry::MultiPolygon(mp) => {
                for p in mp {
                    self.add_polygon(p)?;
                }
            }
            Geometry::Rect(r) => self.add_polygon(&r.to_polygon())?,
            Geometry::Triangle(t) => self.add_polygon(&t.to_polygon())?,
            Geometry::GeometryCollection(gc) => {
                for g in gc {
                    self.add(g)?;
                }
            }
        }
        Ok(())
    }

    fn add_line_string(&mut self, ls: &LineString<f64>) -> Result<(), ModelError> {
        if ls.0.is_empty() {
            return Ok(());
        }
        let mut coords = ls.0.clone();
        coords.dedup();
        if coords.len() < 2 {
            return Err(ModelError::TooFewPoints { kind: "linestring", count: coords.len(), min: 2 });
        }
        let (first, last) = (coords[0], coords[coords.len() - 1]);
        self.graph.insert_edge(Edge::new(coords, Label::line_for(self.arg_index, Location::Interior))?);
        self.add_endpoint(first);
        self.add_endpoint(last);
        Ok(())
    }

    fn add_polygon(&mut self, p: &Polygon<f64>) -> Result<(), ModelError> {
        self.add_polygon_ring(p.exterior(), Location::Exterior, Location::Interior)?;
        for hole in p.interiors() {
            // Holes are oriented so the polygon interior is on the other
            // side from a shell.
            self.add_polygon_ring(hole, Location::Interior, Location::Exterior)?;
        }
        Ok(())
    }

    /// `cw_left` and `cw_right` are the side locations for a clockwise ring.
    fn add_polygon_ring(&mut self, ring: &LineString<f64>, cw_left: Location, cw_right: Location) -> Result<(), ModelError> {
        if ring.0.is_empty() {
            return Ok(());
        }
        let mut coords = ring.0.clone();
        coords.dedup();
        if coords.len() < 4 {
            return Err(ModelError::TooFewPoints { kind: "ring", count: coords.len(), min: 4 });
        }
        let (left, right) = if is_ccw(&coords) { (cw_right, cw_left) } else { (cw_left, cw_right) };
        let start = coords[0];
        self.graph.insert_edge(Edge::new(coords, Label::area_for(self.arg_index, Location::Boundary, left, right))?);
        self.insert_point(start, Location::Boundary)
    }

    fn insert_point(&mut self, coord: Coord<f64>, on: Location) -> Result<(), ModelError> {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            return Err(GraphError::NonFiniteCoordinate(coord).into());
        }
        let id = self.graph.add_node(coord);
        self.graph.node_mut(id).label.set_location(self.arg_index, Some(on));
        Ok(())
    }

    fn add_endpoint(&mut self, coord: Coord<f64>) {
        let id = self.graph.add_node(coord);
        *self.endpoints.entry(id).or_default() += 1;
    }

    /// Place every endpoint node by the number of line ends meeting there.
    fn apply_boundary_rule(&mut self) {
        for (&id, &count) in &self.endpoints {
            let loc = if self.rule.is_in_boundary(count) { Location::Boundary } else { Location::Interior };
            self.graph.node_mut(id).label.set_location(self.arg_index, Some(loc));
        }
    }

    /// Line ends meeting at `coord`; 0 if it is no endpoint.
    pub fn endpoint_count(&self, coord: Coord<f64>) -> usize {
        self.graph
            .find_node(coord)
            .and_then(|id| self.endpoints.get(&id).copied())
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Noding
    // -----------------------------------------------------------------------

    fn is_boundary_node(&self, coord: Coord<f64>) -> bool {
        self.graph
            .find_node(coord)
            .is_some_and(|id| self.graph.node(id).label.location(self.arg_index) == Some(Location::Boundary))
    }

    /// `true` for polygons and multipolygons, whose rings are assumed valid
    /// and need no self-intersection test.
    fn is_areal(&self) -> bool {
        matches!(
            self.geometry,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_)
        )
    }

    /// Node the edges of this geometry against each other and add a node for
    /// every intersection.  Segments of the same polygon ring are only tested
    /// against each other with `compute_ring_self_nodes`.
    pub fn compute_self_nodes(&mut self, noder: &Noder, compute_ring_self_nodes: bool) -> Result<IntersectionAdder, ModelError> {
        let mut adder = IntersectionAdder::new(true, false);
        let test_all = compute_ring_self_nodes || !self.is_areal();
        noder.compute_self_nodes(self.graph.edges_mut(), &mut adder, test_all)?;
        self.add_self_intersection_nodes()?;
        Ok(adder)
    }

    /// Node the edges of this geometry against those of `other`, recording
    /// proper intersections only if `include_proper` is set.
    pub fn compute_edge_intersections(&mut self, other: &mut GeometryGraph<'_>, noder: &Noder, include_proper: bool) -> Result<IntersectionAdder, ModelError> {
        let mut adder = IntersectionAdder::new(include_proper, true);
        adder.set_boundary_nodes(self.boundary_nodes(), other.boundary_nodes());
        noder.compute_cross_nodes(self.graph.edges_mut(), other.graph.edges_mut(), &mut adder)?;
        Ok(adder)
    }

    /// Self-intersections on a ring lie on the boundary, those on a line
    /// in the interior.  Nodes already on the boundary keep their place.
    fn add_self_intersection_nodes(&mut self) -> Result<(), ModelError> {
        let arg = self.arg_index;
        let found: Vec<(Coord<f64>, Option<Location>)> = self
            .graph
            .edges()
            .iter()
            .flat_map(|e| {
                let loc = e.label().location(arg);
                e.intersections().iter().map(move |ei| (ei.coord, loc))
            })
            .collect();

        for (coord, loc) in found {
            if self.is_boundary_node(coord) {
                continue;
            }
            if let Some(loc) = loc {
                self.insert_point(coord, loc)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon, MultiLineString};

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    #[test]
    fn line_endpoints_are_boundary() {
        let geom = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)]);
        let gg = GeometryGraph::new(0, &geom, BoundaryNodeRule::Mod2).unwrap();
        assert_eq!(gg.edges().len(), 1);
        // The repeated point is dropped.
        assert_eq!(gg.edges()[0].num_points(), 3);
        let mut bdy = gg.boundary_nodes();
        bdy.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(bdy, vec![c(0.0, 0.0), c(2.0, 0.0)]);
        assert!(gg.has_boundary());
        assert_eq!(gg.dimension(), Dimension::Line);
    }

    #[test]
    fn shared_endpoint_follows_the_rule() {
        let geom = Geometry::MultiLineString(MultiLineString(vec![
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
            line_string![(x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
        ]));
        let mod2 = GeometryGraph::new(0, &geom, BoundaryNodeRule::Mod2).unwrap();
        assert!(!mod2.boundary_nodes().contains(&c(1.0, 0.0)));
        let endpoint = GeometryGraph::new(0, &geom, BoundaryNodeRule::EndPoint).unwrap();
        assert!(endpoint.boundary_nodes().contains(&c(1.0, 0.0)));
    }

    #[test]
    fn closed_line_has_no_boundary_under_mod2() {
        let geom = Geometry::LineString(line_string![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)
        ]);
        let gg = GeometryGraph::new(1, &geom, BoundaryNodeRule::Mod2).unwrap();
        assert!(!gg.has_boundary());
    }

    #[test]
    fn ring_sides_follow_orientation() {
        // Counter-clockwise shell: interior on the left.
        let geom = Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]);
        let gg = GeometryGraph::new(0, &geom, BoundaryNodeRule::Mod2).unwrap();
        let label = gg.edges()[0].label();
        assert_eq!(label.location(0), Some(Location::Boundary));
        assert_eq!(label.side(0, geograph::Position::Left), Some(Location::Interior));
        assert_eq!(label.side(0, geograph::Position::Right), Some(Location::Exterior));
        assert_eq!(gg.boundary_nodes(), vec![c(0.0, 0.0)]);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let line = Geometry::LineString(line_string![(x: 1.0, y: 1.0), (x: 1.0, y: 1.0)]);
        assert!(matches!(
            GeometryGraph::new(0, &line, BoundaryNodeRule::Mod2),
            Err(ModelError::TooFewPoints { kind: "linestring", count: 1, min: 2 })
        ));
        let ring = Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0)]);
        assert!(matches!(
            GeometryGraph::new(0, &ring, BoundaryNodeRule::Mod2),
            Err(ModelError::TooFewPoints { kind: "ring", .. })
        ));
    }

    #[test]
    fn self_crossing_line_gets_an_interior_node() {
        let geom = Geometry::LineString(line_string![
            (x: 0.0, y: 0.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0), (x: 0.0, y: 2.0)
        ]);
        let mut gg = GeometryGraph::new(0, &geom, BoundaryNodeRule::Mod2).unwrap();
        let adder = gg.compute_self_nodes(&Noder::default(), false).unwrap();
        assert!(adder.has_proper_intersection());
        let id = gg.graph().find_node(c(1.0, 1.0)).unwrap();
        assert_eq!(gg.graph().node(id).label.location(0), Some(Location::Interior));
    }

    fn fan(ends: usize) -> Geometry<f64> {
        // `ends` lines leaving (1, 0), each with a free far end.
        let dirs = [(0.0, 0.0), (2.0, 0.0), (1.0, 1.0)];
        Geometry::MultiLineString(MultiLineString(
            dirs[..ends].iter().map(|&(x, y)| line_string![(x: 1.0, y: 0.0), (x: x, y: y)]).collect(),
        ))
    }

    #[test]
    fn endpoint_valence_is_counted_in_full() {
        let hub = c(1.0, 0.0);
        for (ends, rule, on_boundary) in [
            (1, BoundaryNodeRule::MultiValentEndPoint, false),
            (2, BoundaryNodeRule::MultiValentEndPoint, true),
            (3, BoundaryNodeRule::MultiValentEndPoint, true),
            (1, BoundaryNodeRule::MonoValentEndPoint, true),
            (2, BoundaryNodeRule::MonoValentEndPoint, false),
            (3, BoundaryNodeRule::MonoValentEndPoint, false),
            (2, BoundaryNodeRule::Mod2, false),
            (3, BoundaryNodeRule::Mod2, true),
            (3, BoundaryNodeRule::EndPoint, true),
        ] {
            let geom = fan(ends);
            let gg = GeometryGraph::new(0, &geom, rule).unwrap();
            assert_eq!(gg.endpoint_count(hub), ends);
            assert_eq!(gg.boundary_nodes().contains(&hub), on_boundary, "{ends} ends under {rule:?}");
            let id = gg.graph().find_node(hub).unwrap();
            let expected = if on_boundary { Location::Boundary } else { Location::Interior };
            assert_eq!(gg.graph().node(id).label.location(0), Some(expected));
        }
    }

    #[test]
    fn non_finite_points_are_rejected() {
        for geom in [
            Geometry::Point(geo::Point::new(f64::NAN, 0.0)),
            Geometry::MultiPoint(geo::MultiPoint::from(vec![(0.0, 0.0), (f64::INFINITY, 1.0)])),
        ] {
            assert!(matches!(
                GeometryGraph::new(0, &geom, BoundaryNodeRule::Mod2),
                Err(ModelError::Graph(GraphError::NonFiniteCoordinate(_)))
            ));
        }
    }
}
