use geo::Coord;
use tracing::{debug, trace};

use geograph::{Edge, Label};

use crate::config::{IntersectorKind, TopologyConfig};
use crate::error::ModelError;
use crate::index::StrTree;
use crate::noding::adder::IntersectionAdder;
use crate::noding::chain::MonotoneChain;

/// Address of an edge in an [`EdgeSet`]: group, then index in the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRef(pub usize, pub usize);

/// One or two groups of edges being noded together.
pub struct EdgeSet<'a> {
    groups: [&'a mut [Edge]; 2],
}

impl<'a> EdgeSet<'a> {
    pub fn single(edges: &'a mut [Edge]) -> Self {
        Self { groups: [edges, Default::default()] }
    }

    pub fn pair(a: &'a mut [Edge], b: &'a mut [Edge]) -> Self {
        Self { groups: [a, b] }
    }

    #[inline] pub fn group(&self, g: usize) -> &[Edge] { self.groups[g] }

    #[inline] pub fn edge(&self, r: EdgeRef) -> &Edge { &self.groups[r.0][r.1] }

    #[inline] pub fn edge_mut(&mut self, r: EdgeRef) -> &mut Edge { &mut self.groups[r.0][r.1] }

    /// Endpoints of segment `i` of edge `r`.
    #[inline]
    pub fn segment(&self, r: EdgeRef, i: usize) -> (Coord<f64>, Coord<f64>) {
        let e = self.edge(r);
        (e.coord(i), e.coord(i + 1))
    }

    fn refs(&self, g: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        (0..self.groups[g].len()).map(move |i| EdgeRef(g, i))
    }
}

/// Proposes candidate segment pairs to an [`IntersectionAdder`].
pub trait EdgeSetIntersector {
    /// Intersect the edges of a single set with each other.  Unless
    /// `test_all_segments` is set, segments of the same edge are not tested
    /// against each other.
    fn compute_self(&self, edges: &mut [Edge], adder: &mut IntersectionAdder, test_all_segments: bool) -> Result<(), ModelError>;

    /// Intersect every edge of `a` with every edge of `b`.
    fn compute_cross(&self, a: &mut [Edge], b: &mut [Edge], adder: &mut IntersectionAdder) -> Result<(), ModelError>;
}

// ---------------------------------------------------------------------------
// Monotone chains in an STR tree
// ---------------------------------------------------------------------------

/// Indexes the monotone chains of the edges in an [`StrTree`] and tests only
/// chains whose envelopes overlap.
#[derive(Clone, Copy, Debug)]
pub struct StrTreeIntersector {
    node_capacity: usize,
}

impl StrTreeIntersector {
    pub fn new(node_capacity: usize) -> Result<Self, ModelError> {
        if node_capacity < 2 {
            return Err(ModelError::InvalidNodeCapacity(node_capacity));
        }
        Ok(Self { node_capacity })
    }

    fn chains(edges: &EdgeSet<'_>, group: usize) -> Vec<MonotoneChain> {
        edges
            .refs(group)
            .flat_map(|r| MonotoneChain::split(r, edges.edge(r).coords()))
            .collect()
    }

    fn index(&self, chains: &[MonotoneChain]) -> Result<StrTree<usize, crate::index::Built>, ModelError> {
        let mut tree = StrTree::with_capacity(self.node_capacity)?;
        for (i, mc) in chains.iter().enumerate() {
            tree.insert(mc.bounds(), i)?;
        }
        Ok(tree.build())
    }

    /// Segment pairs of two overlapping chains.
    fn collect(edges: &EdgeSet<'_>, mc0: &MonotoneChain, mc1: &MonotoneChain, same_chain: bool, out: &mut Vec<(EdgeRef, usize, EdgeRef, usize)>) {
        let mut pairs = Vec::new();
        mc0.overlaps(edges.edge(mc0.edge()).coords(), mc1, edges.edge(mc1.edge()).coords(), &mut pairs);
        out.extend(
            pairs
                .into_iter()
                .filter(|(i, j)| !same_chain || i < j)
                .map(|(i, j)| (mc0.edge(), i, mc1.edge(), j)),
        );
    }

    fn apply(edges: &mut EdgeSet<'_>, pairs: Vec<(EdgeRef, usize, EdgeRef, usize)>, adder: &mut IntersectionAdder) {
        trace!(candidates = pairs.len(), "testing segment pairs");
        for (e0, s0, e1, s1) in pairs {
            adder.add_intersections(edges, e0, s0, e1, s1);
        }
    }
}

impl Default for StrTreeIntersector {
    fn default() -> Self {
        Self { node_capacity: crate::index::DEFAULT_NODE_CAPACITY }
    }
}

impl EdgeSetIntersector for StrTreeIntersector {
    fn compute_self(&self, edges: &mut [Edge], adder: &mut IntersectionAdder, test_all_segments: bool) -> Result<(), ModelError> {
        let mut set = EdgeSet::single(edges);
        let chains = Self::chains(&set, 0);
        let tree = self.index(&chains)?;

        let mut pairs = Vec::new();
        for (i, mc0) in chains.iter().enumerate() {
            for &j in tree.query(&mc0.bounds()) {
                let mc1 = &chains[j];
                if j < i || (!test_all_segments && mc0.edge() == mc1.edge()) {
                    continue;
                }
                Self::collect(&set, mc0, mc1, i == j, &mut pairs);
            }
        }
        Self::apply(&mut set, pairs, adder);
        Ok(())
    }

    fn compute_cross(&self, a: &mut [Edge], b: &mut [Edge], adder: &mut IntersectionAdder) -> Result<(), ModelError> {
        let mut set = EdgeSet::pair(a, b);
        let chains0 = Self::chains(&set, 0);
        let chains1 = Self::chains(&set, 1);
        let tree = self.index(&chains1)?;

        let mut pairs = Vec::new();
        for mc0 in &chains0 {
            for &j in tree.query(&mc0.bounds()) {
                Self::collect(&set, mc0, &chains1[j], false, &mut pairs);
            }
        }
        Self::apply(&mut set, pairs, adder);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Brute force
// ---------------------------------------------------------------------------

/// Tests every pair of segments.  Quadratic; kept as a reference for the
/// indexed intersector.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleIntersector;

impl SimpleIntersector {
    fn all_pairs(set: &mut EdgeSet<'_>, e0: EdgeRef, e1: EdgeRef, adder: &mut IntersectionAdder) {
        let n0 = set.edge(e0).num_points() - 1;
        let n1 = set.edge(e1).num_points() - 1;
        for s0 in 0..n0 {
            // Within one edge each unordered pair is tested once.
            let first = if e0 == e1 { s0 + 1 } else { 0 };
            for s1 in first..n1 {
                adder.add_intersections(set, e0, s0, e1, s1);
            }
        }
    }
}

impl EdgeSetIntersector for SimpleIntersector {
    fn compute_self(&self, edges: &mut [Edge], adder: &mut IntersectionAdder, test_all_segments: bool) -> Result<(), ModelError> {
        let n = edges.len();
        let mut set = EdgeSet::single(edges);
        for i in 0..n {
            for j in i..n {
                if i == j && !test_all_segments {
                    continue;
                }
                Self::all_pairs(&mut set, EdgeRef(0, i), EdgeRef(0, j), adder);
            }
        }
        Ok(())
    }

    fn compute_cross(&self, a: &mut [Edge], b: &mut [Edge], adder: &mut IntersectionAdder) -> Result<(), ModelError> {
        let (na, nb) = (a.len(), b.len());
        let mut set = EdgeSet::pair(a, b);
        for i in 0..na {
            for j in 0..nb {
                Self::all_pairs(&mut set, EdgeRef(0, i), EdgeRef(1, j), adder);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Noder
// ---------------------------------------------------------------------------

/// Counters and flags reported by [`Noder::compute_nodes`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodingSummary {
    pub num_tests: usize,
    pub num_intersections: usize,
    pub has_intersection: bool,
    pub has_proper_intersection: bool,
    pub proper_intersection_point: Option<Coord<f64>>,
}

impl From<&IntersectionAdder> for NodingSummary {
    fn from(adder: &IntersectionAdder) -> Self {
        Self {
            num_tests: adder.num_tests(),
            num_intersections: adder.num_intersections(),
            has_intersection: adder.has_intersection(),
            has_proper_intersection: adder.has_proper_intersection(),
            proper_intersection_point: adder.proper_intersection_point(),
        }
    }
}

/// Computes all intersections among a set of edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noder {
    kind: IntersectorKind,
    index: StrTreeIntersector,
}

impl Noder {
    pub fn new(config: &TopologyConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { kind: config.intersector, index: StrTreeIntersector::new(config.node_capacity)? })
    }

    /// The configured edge-set intersector.
    pub fn intersector(&self) -> &dyn EdgeSetIntersector {
        match self.kind {
            IntersectorKind::StrTree => &self.index,
            IntersectorKind::Simple => &SimpleIntersector,
        }
    }

    /// Record every intersection among `edges` on the edges involved, then
    /// add each edge's endpoints to its intersection list.
    pub fn compute_nodes(&self, edges: &mut [Edge]) -> Result<NodingSummary, ModelError> {
        let mut adder = IntersectionAdder::new(true, false);
        self.intersector().compute_self(edges, &mut adder, true)?;
        for e in edges.iter_mut() {
            e.add_endpoint_intersections();
        }
        let summary = NodingSummary::from(&adder);
        debug!(
            edges = edges.len(),
            tests = summary.num_tests,
            intersections = summary.num_intersections,
            proper = summary.has_proper_intersection,
            "computed nodes"
        );
        Ok(summary)
    }

    /// Intersect the edges of one geometry with each other, reporting to
    /// `adder`.
    pub fn compute_self_nodes(&self, edges: &mut [Edge], adder: &mut IntersectionAdder, test_all_segments: bool) -> Result<(), ModelError> {
        self.intersector().compute_self(edges, adder, test_all_segments)
    }

    /// Intersect the edges of two geometries, reporting to `adder`.
    pub fn compute_cross_nodes(&self, a: &mut [Edge], b: &mut [Edge], adder: &mut IntersectionAdder) -> Result<(), ModelError> {
        self.intersector().compute_cross(a, b, adder)
    }

    /// Node the given vertex sequences and return the noded pieces of each.
    pub fn node_coords(&self, lines: Vec<Vec<Coord<f64>>>) -> Result<Vec<Vec<Vec<Coord<f64>>>>, ModelError> {
        let mut edges = lines
            .into_iter()
            .map(|coords| Edge::new(coords, Label::default()))
            .collect::<Result<Vec<_>, _>>()?;
        self.compute_nodes(&mut edges)?;
        Ok(edges.iter().map(Edge::split_coords).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    fn line(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| c(x, y)).collect()
    }

    #[test]
    fn self_crossing_line_is_noded() {
        let noder = Noder::default();
        let pieces = noder
            .node_coords(vec![line(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)])])
            .unwrap();
        assert_eq!(pieces[0].len(), 3);
        assert_eq!(pieces[0][0], line(&[(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(pieces[0][2], line(&[(1.0, 1.0), (0.0, 2.0)]));
    }

    #[test]
    fn invalid_input_is_rejected_up_front() {
        let noder = Noder::default();
        let err = noder.node_coords(vec![line(&[(0.0, 0.0), (0.0, 0.0)])]).unwrap_err();
        assert!(matches!(err, ModelError::Graph(_)));
    }

    #[test]
    fn same_edge_is_skipped_when_asked() {
        let mut edges = vec![Edge::new(line(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]), Label::default()).unwrap()];
        for intersector in [&StrTreeIntersector::default() as &dyn EdgeSetIntersector, &SimpleIntersector] {
            let mut adder = IntersectionAdder::new(true, false);
            intersector.compute_self(&mut edges, &mut adder, false).unwrap();
            assert_eq!(adder.num_tests(), 0);
            assert!(!adder.has_intersection());
        }
    }

    #[test]
    fn capacity_below_two_is_refused() {
        assert!(matches!(StrTreeIntersector::new(1), Err(ModelError::InvalidNodeCapacity(1))));
        let mut edges = vec![
            Edge::new(line(&[(0.0, 0.0), (2.0, 2.0)]), Label::default()).unwrap(),
            Edge::new(line(&[(0.0, 2.0), (2.0, 0.0)]), Label::default()).unwrap(),
        ];
        let mut adder = IntersectionAdder::new(true, false);
        StrTreeIntersector::new(2).unwrap().compute_self(&mut edges, &mut adder, false).unwrap();
        assert!(adder.has_proper_intersection());
    }
}
