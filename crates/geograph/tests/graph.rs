use geo::Coord;
use geograph::{Directed, DirectedEdgeId, GraphError, Label, Location, NodeId, PlanarGraph};

fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

/// A minimal two-triangle planar graph shared by several tests.
///
/// ```
///   c
///  /|\
/// / | \
/// a---b
///  \ /
///   d
/// ```
/// Triangles: (a, b, c) and (a, d, b).  Four nodes, five edges, three faces
/// (two triangles and the outer face).
fn two_triangles() -> (PlanarGraph, [NodeId; 4]) {
    let mut g = PlanarGraph::new();
    let label = Label::line_for(0, Location::Interior);

    for pts in [
        [c(0.0, 0.0), c(2.0, 0.0)],
        [c(2.0, 0.0), c(1.0, 2.0)],
        [c(1.0, 2.0), c(0.0, 0.0)],
        [c(2.0, 0.0), c(1.0, -2.0)],
        [c(1.0, -2.0), c(0.0, 0.0)],
    ] {
        g.add_edge(pts.to_vec(), label).unwrap();
    }

    let node = |x, y| g.find_node(c(x, y)).unwrap();
    let ids = [node(0.0, 0.0), node(2.0, 0.0), node(1.0, 2.0), node(1.0, -2.0)];
    (g, ids)
}

/// The directed edge running from `from` to `to`.
fn directed(g: &PlanarGraph, from: NodeId, to: NodeId) -> DirectedEdgeId {
    g.node(from).star.ids().find(|&de| g.dest(de) == to).unwrap()
}

#[test]
fn counts_are_correct() {
    let (g, _) = two_triangles();
    assert_eq!(g.num_nodes(), 4);
    assert_eq!(g.num_edges(), 5);
    assert_eq!(g.num_directed_edges(), 10);
}

#[test]
fn sym_is_an_involution() {
    let (g, _) = two_triangles();
    for i in 0..g.num_directed_edges() {
        let de = DirectedEdgeId(i);
        let sym = g.directed_edge(de).sym;
        assert_ne!(sym, de);
        assert_eq!(g.directed_edge(sym).sym, de);
        assert_eq!(g.directed_edge(sym).from, g.directed_edge(de).to);
        assert_eq!(g.directed_edge(sym).edge, g.directed_edge(de).edge);
    }
}

#[test]
fn star_is_sorted_by_angle() {
    let (g, [a, b, ..]) = two_triangles();
    // b is connected to c, a and d, in counter-clockwise order from +x.
    let angles: Vec<_> = g.node(b).star.iter().map(|e| e.direction().angle()).collect();
    assert_eq!(angles.len(), 3);
    let mut sorted = angles.clone();
    sorted.sort_by(|x, y| x.rem_euclid(std::f64::consts::TAU).total_cmp(&y.rem_euclid(std::f64::consts::TAU)));
    assert_eq!(angles, sorted);

    let ba = directed(&g, b, a);
    let pos = g.node(b).star.position(ba).unwrap();
    let star = &g.node(b).star;
    assert_eq!(star.next_cw(star.next_ccw(pos)), pos);
}

#[test]
fn face_cycle_lengths() {
    let (mut g, [a, b, c, d]) = two_triangles();
    g.link_all_directed_edges();

    // a→b runs along the lower triangle, b→a along the upper one and b→c
    // around the outer face.
    assert_eq!(g.face_cycle(directed(&g, a, b)).count(), 3);
    assert_eq!(g.face_cycle(directed(&g, b, a)).count(), 3);
    let outer: Vec<_> = g.face_cycle(directed(&g, b, c)).map(|de| g.dest(de)).collect();
    assert_eq!(outer, vec![c, a, d, b]);

    // Every directed edge lies on exactly one face.
    let lengths: Vec<_> = (0..g.num_directed_edges()).map(|i| g.face_cycle(DirectedEdgeId(i)).count()).collect();
    assert_eq!(lengths.iter().filter(|&&n| n == 3).count(), 6);
    assert_eq!(lengths.iter().filter(|&&n| n == 4).count(), 4);
}

#[test]
fn result_edges_link_into_a_ring() {
    let (mut g, [a, b, c, _]) = two_triangles();
    let ring = [directed(&g, a, b), directed(&g, b, c), directed(&g, c, a)];
    for de in ring {
        g.set_in_result(de, true);
    }
    g.link_result_directed_edges().unwrap();

    let cycle: Vec<_> = g.face_cycle(ring[0]).collect();
    assert_eq!(cycle, ring.to_vec());
}

#[test]
fn unmatched_result_edge_is_an_error() {
    let (mut g, [a, b, ..]) = two_triangles();
    g.set_in_result(directed(&g, a, b), true);
    assert_eq!(g.link_result_directed_edges(), Err(GraphError::NoOutgoingResultEdge(c(2.0, 0.0))));
}
