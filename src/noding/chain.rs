use geo::Coord;

use geograph::Quadrant;

use crate::bounds::BoundingBox;
use crate::noding::noder::EdgeRef;

/// A run of consecutive segments of one edge whose directions all fall in
/// the same quadrant.
///
/// The envelope of any sub-run of a monotone chain is spanned by its first
/// and last vertex, which makes overlap tests between chains cheap to
/// refine by bisection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonotoneChain {
    edge: EdgeRef,
    start: usize,
    end: usize,
    bounds: BoundingBox,
}

impl MonotoneChain {
    /// Split the vertex sequence `coords` of `edge` into monotone chains.
    pub fn split(edge: EdgeRef, coords: &[Coord<f64>]) -> Vec<MonotoneChain> {
        let mut chains = Vec::new();
        let mut start = 0;
        while start + 1 < coords.len() {
            let end = chain_end(coords, start);
            chains.push(MonotoneChain {
                edge,
                start,
                end,
                bounds: BoundingBox::new(coords[start].x, coords[start].y, coords[end].x, coords[end].y),
            });
            start = end;
        }
        chains
    }

    #[inline] pub fn edge(&self) -> EdgeRef { self.edge }

    /// Index of the first vertex.
    #[inline] pub fn start(&self) -> usize { self.start }

    /// Index of the last vertex.
    #[inline] pub fn end(&self) -> usize { self.end }

    #[inline] pub fn bounds(&self) -> BoundingBox { self.bounds }

    /// Collect the index pairs `(i, j)` of segments of `self` and `other`
    /// whose envelopes overlap.  `coords` and `other_coords` are the vertices
    /// of the two chains' edges.
    pub fn overlaps(
        &self,
        coords: &[Coord<f64>],
        other: &MonotoneChain,
        other_coords: &[Coord<f64>],
        out: &mut Vec<(usize, usize)>,
    ) {
        overlaps_between(coords, self.start, self.end, other_coords, other.start, other.end, out);
    }
}

/// Index of the last vertex of the chain starting at `start`.
fn chain_end(coords: &[Coord<f64>], start: usize) -> usize {
    let quadrant = Quadrant::of_segment(coords[start], coords[start + 1]);
    let mut last = start + 1;
    while last + 1 < coords.len() && Quadrant::of_segment(coords[last], coords[last + 1]) == quadrant {
        last += 1;
    }
    last
}

fn overlaps_between(
    c0: &[Coord<f64>],
    start0: usize,
    end0: usize,
    c1: &[Coord<f64>],
    start1: usize,
    end1: usize,
    out: &mut Vec<(usize, usize)>,
) {
    let b0 = BoundingBox::new(c0[start0].x, c0[start0].y, c0[end0].x, c0[end0].y);
    let b1 = BoundingBox::new(c1[start1].x, c1[start1].y, c1[end1].x, c1[end1].y);
    if !b0.intersects(&b1) {
        return;
    }
    if end0 - start0 == 1 && end1 - start1 == 1 {
        out.push((start0, start1));
        return;
    }

    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    let halves = |s: usize, m: usize, e: usize| -> [(usize, usize); 2] { [(s, m), (m, e)] };
    for (s0, e0) in halves(start0, mid0, end0) {
        if s0 == e0 {
            continue;
        }
        for (s1, e1) in halves(start1, mid1, end1) {
            if s1 < e1 {
                overlaps_between(c0, s0, e0, c1, s1, e1, out);
            }
        }
    }
}
