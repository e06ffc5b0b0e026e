//! Point location.

use geo::{Coord, Geometry, LineString, Polygon};

use geograph::{orientation, Location, Orientation};

use crate::algorithm::boundary::BoundaryNodeRule;
use crate::algorithm::intersector::{IntersectionKind, LineIntersector};
use crate::bounds::BoundingBox;

/// Counts crossings of a rightward ray from `p` with ring segments.
#[derive(Debug)]
struct RayCrossingCounter {
    p: Coord<f64>,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    fn new(p: Coord<f64>) -> Self {
        Self { p, crossings: 0, on_segment: false }
    }

    fn count_segment(&mut self, p1: Coord<f64>, p2: Coord<f64>) {
        let p = self.p;
        // Entirely left of the point.
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 {
            self.on_segment = true;
            return;
        }
        // Horizontal segment at the point's height.
        if p1.y == p.y && p2.y == p.y {
            if p.x >= p1.x.min(p2.x) && p.x <= p1.x.max(p2.x) {
                self.on_segment = true;
            }
            return;
        }
        // Straddles the ray: upward edges include their start, downward
        // edges their end.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation(p1, p2, p);
            if orient == Orientation::Collinear {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient == Orientation::CounterClockwise {
                self.crossings += 1;
            }
        }
    }

    fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Location of `p` relative to the closed ring `ring`.
pub fn locate_in_ring(p: Coord<f64>, ring: &[Coord<f64>]) -> Location {
    let mut counter = RayCrossingCounter::new(p);
    for w in ring.windows(2) {
        counter.count_segment(w[1], w[0]);
        if counter.on_segment {
            break;
        }
    }
    counter.location()
}

/// Location of `p` relative to a polygon with holes.
pub fn locate_in_polygon(p: Coord<f64>, polygon: &Polygon<f64>) -> Location {
    let shell = polygon.exterior();
    if shell.0.is_empty() {
        return Location::Exterior;
    }
    match locate_in_ring(p, &shell.0) {
        Location::Interior => {}
        other => return other,
    }
    for hole in polygon.interiors() {
        match locate_in_ring(p, &hole.0) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

/// Location of `p` relative to the areal components of `geom`; points and
/// lines are ignored.
pub fn locate_point_in_area(p: Coord<f64>, geom: &Geometry<f64>) -> Location {
    let mut loc = Location::Exterior;
    for_each_polygon(geom, &mut |poly| {
        if loc == Location::Exterior {
            loc = locate_in_polygon(p, poly);
        }
    });
    loc
}

fn for_each_polygon(geom: &Geometry<f64>, f: &mut impl FnMut(&Polygon<f64>)) {
    match geom {
        Geometry::Polygon(poly) => f(poly),
        Geometry::MultiPolygon(mp) => mp.iter().for_each(|poly| f(poly)),
        Geometry::Rect(r) => f(&r.to_polygon()),
        Geometry::Triangle(t) => f(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| for_each_polygon(g, f)),
        _ => {}
    }
}

/// `true` if `p` lies on one of the segments of `coords`.
fn is_on_line(p: Coord<f64>, coords: &[Coord<f64>]) -> bool {
    let mut li = LineIntersector::new();
    coords.windows(2).any(|w| li.compute_point(p, w[0], w[1]) != IntersectionKind::None)
}

/// Locates points relative to arbitrary geometries, using a boundary node
/// rule to decide on the endpoints of linear components.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointLocator {
    rule: BoundaryNodeRule,
}

#[derive(Default)]
struct Tally {
    interior: bool,
    boundaries: usize,
}

impl Tally {
    fn update(&mut self, loc: Location) {
        match loc {
            Location::Interior => self.interior = true,
            Location::Boundary => self.boundaries += 1,
            Location::Exterior => {}
        }
    }
}

impl PointLocator {
    pub fn new(rule: BoundaryNodeRule) -> Self {
        Self { rule }
    }

    #[inline] pub fn rule(&self) -> BoundaryNodeRule { self.rule }

    /// `true` unless `p` is exterior to `geom`.
    pub fn intersects(&self, p: Coord<f64>, geom: &Geometry<f64>) -> bool {
        self.locate(p, geom) != Location::Exterior
    }

    pub fn locate(&self, p: Coord<f64>, geom: &Geometry<f64>) -> Location {
        match geom {
            Geometry::LineString(ls) => return locate_on_line_string(p, ls),
            Geometry::Line(l) => return locate_on_line_string(p, &LineString::from(vec![l.start, l.end])),
            Geometry::Polygon(poly) => return locate_in_polygon(p, poly),
            _ => {}
        }
        let mut tally = Tally::default();
        compute_location(p, geom, &mut tally);
        if self.rule.is_in_boundary(tally.boundaries) {
            Location::Boundary
        } else if tally.boundaries > 0 || tally.interior {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

fn compute_location(p: Coord<f64>, geom: &Geometry<f64>, tally: &mut Tally) {
    match geom {
        Geometry::Point(pt) => tally.update(if pt.0 == p { Location::Interior } else { Location::Exterior }),
        Geometry::MultiPoint(mp) => {
            for pt in mp {
                tally.update(if pt.0 == p { Location::Interior } else { Location::Exterior });
            }
        }
        Geometry::Line(l) => tally.update(locate_on_line_string(p, &LineString::from(vec![l.start, l.end]))),
        Geometry::LineString(ls) => tally.update(locate_on_line_string(p, ls)),
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                tally.update(locate_on_line_string(p, ls));
            }
        }
        Geometry::Polygon(poly) => tally.update(locate_in_polygon(p, poly)),
        Geometry::MultiPolygon(mp) => {
            for poly in mp {
                tally.update(locate_in_polygon(p, poly));
            }
        }
        Geometry::Rect(r) => tally.update(locate_in_polygon(p, &r.to_polygon())),
        Geometry::Triangle(t) => tally.update(locate_in_polygon(p, &t.to_polygon())),
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                compute_location(p, g, tally);
            }
        }
    }
}

fn locate_on_line_string(p: Coord<f64>, ls: &LineString<f64>) -> Location {
    let coords = &ls.0;
    if !BoundingBox::from_coords(coords).covers_point(p) {
        return Location::Exterior;
    }
    if !ls.is_closed() && (coords.first() == Some(&p) || coords.last() == Some(&p)) {
        return Location::Boundary;
    }
    if is_on_line(p, coords) {
        Location::Interior
    } else {
        Location::Exterior
    }
}
