//! Edges and their ordered intersection lists.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use geo::Coord;

use crate::error::GraphError;
use crate::label::Label;

// ---------------------------------------------------------------------------
// EdgeIntersection
// ---------------------------------------------------------------------------

/// A point on an edge where it meets another edge (or one of its own
/// endpoints).
///
/// `segment_index` is the index of the segment containing the point and
/// `distance` a monotone measure of how far along that segment it lies
/// (not necessarily Euclidean).  Intersections are ordered by
/// `(segment_index, distance)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeIntersection {
    pub coord: Coord<f64>,
    pub segment_index: usize,
    pub distance: f64,
}

impl EdgeIntersection {
    /// `true` if this intersection lies at the given segment's start vertex.
    pub fn is_at_vertex(&self) -> bool {
        self.distance == 0.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Key {
    segment_index: usize,
    distance: f64,
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| self.distance.total_cmp(&other.distance))
    }
}

// ---------------------------------------------------------------------------
// EdgeIntersectionList
// ---------------------------------------------------------------------------

/// The intersections of one edge, kept sorted along the edge.  Adding an
/// intersection with an existing key is a no-op.
#[derive(Clone, Debug, Default)]
pub struct EdgeIntersectionList {
    map: BTreeMap<Key, Coord<f64>>,
}

impl EdgeIntersectionList {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.map.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Insert an intersection; returns `false` if one with the same position
    /// already exists.
    pub fn add(&mut self, coord: Coord<f64>, segment_index: usize, distance: f64) -> bool {
        // `+ 0.0` folds -0.0 into 0.0 so both sort together.
        let key = Key { segment_index, distance: distance + 0.0 };
        if self.map.contains_key(&key) {
            return false;
        }
        self.map.insert(key, coord);
        true
    }

    /// Intersections in order along the edge.
    pub fn iter(&self) -> impl Iterator<Item = EdgeIntersection> + '_ {
        self.map.iter().map(|(k, c)| EdgeIntersection {
            coord: *c,
            segment_index: k.segment_index,
            distance: k.distance,
        })
    }

    /// Add both endpoints of the edge with vertex `coords`.
    pub fn add_endpoints(&mut self, coords: &[Coord<f64>]) {
        let Some((first, last)) = coords.first().zip(coords.last()) else { return };
        self.add(*first, 0, 0.0);
        self.add(*last, coords.len() - 1, 0.0);
    }

    /// `true` if any recorded intersection is exactly `pt`.
    pub fn is_intersection(&self, pt: Coord<f64>) -> bool {
        self.map.values().any(|c| *c == pt)
    }

    /// Vertex sequences of the sub-edges between consecutive intersections.
    ///
    /// The endpoints must already be present (see [`Self::add_endpoints`]).
    pub fn split_coords(&self, coords: &[Coord<f64>]) -> Vec<Vec<Coord<f64>>> {
        let eis: Vec<_> = self.iter().collect();
        eis.windows(2)
            .map(|w| Self::split_between(coords, &w[0], &w[1]))
            .filter(|pts| pts.len() >= 2)
            .collect()
    }

    fn split_between(coords: &[Coord<f64>], ei0: &EdgeIntersection, ei1: &EdgeIntersection) -> Vec<Coord<f64>> {
        let last_seg_start = coords[ei1.segment_index.min(coords.len() - 1)];
        // The end intersection is a new point unless it coincides with the
        // start vertex of its segment.
        let use_end = ei1.distance > 0.0 || ei1.coord != last_seg_start;

        let mut pts = Vec::with_capacity(ei1.segment_index - ei0.segment_index + 2);
        pts.push(ei0.coord);
        for c in &coords[ei0.segment_index + 1..=ei1.segment_index.min(coords.len() - 1)] {
            if pts.last() != Some(c) {
                pts.push(*c);
            }
        }
        if use_end && pts.last() != Some(&ei1.coord) {
            pts.push(ei1.coord);
        }
        pts
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A labelled polyline in a planar graph; also the segment string consumed by
/// noding.
#[derive(Clone, Debug)]
pub struct Edge {
    coords: Vec<Coord<f64>>,
    label: Label,
    intersections: EdgeIntersectionList,
    /// Cleared once the edge is found to intersect the other geometry.
    isolated: bool,
}

impl Edge {
    /// Create an edge, validating its vertices: at least two points, all
    /// finite, no two consecutive points equal.
    pub fn new(coords: Vec<Coord<f64>>, label: Label) -> Result<Self, GraphError> {
        if coords.len() < 2 {
            return Err(GraphError::TooFewPoints(coords.len()));
        }
        if let Some(c) = coords.iter().find(|c| !(c.x.is_finite() && c.y.is_finite())) {
            return Err(GraphError::NonFiniteCoordinate(*c));
        }
        if let Some(w) = coords.windows(2).find(|w| w[0] == w[1]) {
            return Err(GraphError::ZeroLengthSegment(w[0]));
        }
        Ok(Self { coords, label, intersections: EdgeIntersectionList::new(), isolated: true })
    }

    #[inline] pub fn coords(&self) -> &[Coord<f64>] { &self.coords }

    #[inline] pub fn coord(&self, i: usize) -> Coord<f64> { self.coords[i] }

    /// Number of vertices.
    #[inline] pub fn num_points(&self) -> usize { self.coords.len() }

    #[inline] pub fn is_closed(&self) -> bool { self.coords.first() == self.coords.last() }

    #[inline] pub fn label(&self) -> &Label { &self.label }

    #[inline] pub fn label_mut(&mut self) -> &mut Label { &mut self.label }

    #[inline] pub fn set_label(&mut self, label: Label) { self.label = label; }

    #[inline] pub fn intersections(&self) -> &EdgeIntersectionList { &self.intersections }

    #[inline] pub fn is_isolated(&self) -> bool { self.isolated }

    #[inline] pub fn set_isolated(&mut self, isolated: bool) { self.isolated = isolated; }

    /// Record an intersection at `coord` on segment `segment_index`.
    ///
    /// A point equal to the segment's end vertex is filed under the next
    /// segment with distance 0, so every vertex has a single key.
    pub fn add_intersection(&mut self, coord: Coord<f64>, segment_index: usize, distance: f64) {
        let next = segment_index + 1;
        let (index, dist) = if next < self.coords.len() && coord == self.coords[next] {
            (next, 0.0)
        } else {
            (segment_index, distance)
        };
        self.intersections.add(coord, index, dist);
    }

    /// Make sure both endpoints are recorded as intersections.
    pub fn add_endpoint_intersections(&mut self) {
        self.intersections.add_endpoints(&self.coords);
    }

    /// Vertex sequences of this edge split at every recorded intersection.
    pub fn split_coords(&self) -> Vec<Vec<Coord<f64>>> {
        let mut list = self.intersections.clone();
        list.add_endpoints(&self.coords);
        list.split_coords(&self.coords)
    }
}
