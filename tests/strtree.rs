use std::collections::BTreeSet;

use planartopo::{BoundingBox, ModelError, StrTree};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

fn random_boxes(rng: &mut StdRng, n: usize) -> Vec<BoundingBox> {
    (0..n)
        .map(|_| {
            let (x, y) = (rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0));
            let (w, h) = (rng.random_range(0.0..40.0), rng.random_range(0.0..40.0));
            BoundingBox::new(x, y, x + w, y + h)
        })
        .collect()
}

fn build(boxes: &[BoundingBox], capacity: usize) -> StrTree<usize, planartopo::Built> {
    let mut tree = StrTree::with_capacity(capacity).unwrap();
    for (i, b) in boxes.iter().enumerate() {
        tree.insert(*b, i).unwrap();
    }
    tree.build()
}

fn brute_force(boxes: &[BoundingBox], search: &BoundingBox) -> BTreeSet<usize> {
    boxes.iter().enumerate().filter(|(_, b)| b.intersects(search)).map(|(i, _)| i).collect()
}

#[test]
fn rectangle_example() {
    let mut tree = StrTree::new();
    tree.insert(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "a").unwrap();
    tree.insert(BoundingBox::new(20.0, 20.0, 30.0, 30.0), "b").unwrap();
    tree.insert(BoundingBox::new(50.0, 50.0, 60.0, 60.0), "c").unwrap();
    let tree = tree.build();

    let found: BTreeSet<_> = tree.query(&BoundingBox::new(5.0, 5.0, 25.0, 25.0)).into_iter().copied().collect();
    assert_eq!(found, BTreeSet::from(["a", "b"]));
    assert!(tree.query(&BoundingBox::new(100.0, 100.0, 110.0, 110.0)).is_empty());
    assert_eq!(tree.depth(), 1);
}

#[test]
fn query_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5752);
    for capacity in [2, 4, 10, 16] {
        let boxes = random_boxes(&mut rng, 500);
        let tree = build(&boxes, capacity);
        assert_eq!(tree.len(), 500);
        for search in random_boxes(&mut rng, 50) {
            let found: BTreeSet<usize> = tree.query(&search).into_iter().copied().collect();
            assert_eq!(found, brute_force(&boxes, &search), "capacity {capacity}, search {search:?}");
        }
    }
}

#[test]
fn query_matches_rstar() {
    let mut rng = StdRng::seed_from_u64(42);
    let boxes = random_boxes(&mut rng, 2000);
    let tree = build(&boxes, 10);

    let reference = RTree::bulk_load(
        boxes
            .iter()
            .enumerate()
            .map(|(i, b)| GeomWithData::new(Rectangle::from_corners([b.min_x(), b.min_y()], [b.max_x(), b.max_y()]), i))
            .collect(),
    );

    for search in random_boxes(&mut rng, 100) {
        let envelope = AABB::from_corners([search.min_x(), search.min_y()], [search.max_x(), search.max_y()]);
        let expected: BTreeSet<usize> = reference.locate_in_envelope_intersecting(&envelope).map(|r| r.data).collect();
        let found: BTreeSet<usize> = tree.query(&search).into_iter().copied().collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn every_item_is_reachable() {
    let mut rng = StdRng::seed_from_u64(3);
    let boxes = random_boxes(&mut rng, 777);
    let tree = build(&boxes, 9);
    let ids: BTreeSet<usize> = tree.items().map(|(_, i)| *i).collect();
    assert_eq!(ids, (0..777).collect());
    for (bounds, i) in tree.items() {
        assert_eq!(*bounds, boxes[*i]);
    }
}

#[test]
fn remove_keeps_queries_consistent() {
    let mut rng = StdRng::seed_from_u64(11);
    let boxes = random_boxes(&mut rng, 300);
    let mut tree = build(&boxes, 6);

    let mut alive: BTreeSet<usize> = (0..300).collect();
    for i in (0..300).step_by(3) {
        assert!(tree.remove(&boxes[i], &i));
        // A second removal of the same item finds nothing.
        assert!(!tree.remove(&boxes[i], &i));
        alive.remove(&i);
    }
    assert_eq!(tree.len(), alive.len());

    for search in random_boxes(&mut rng, 50) {
        let found: BTreeSet<usize> = tree.query(&search).into_iter().copied().collect();
        let expected: BTreeSet<usize> = brute_force(&boxes, &search).intersection(&alive).copied().collect();
        assert_eq!(found, expected);
    }

    for i in alive.clone() {
        assert!(tree.remove(&boxes[i], &i));
    }
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    assert!(tree.query(&BoundingBox::new(0.0, 0.0, 1000.0, 1000.0)).is_empty());
}

#[test]
fn nearest_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(99);
    let boxes = random_boxes(&mut rng, 400);
    let tree = build(&boxes, 8);
    let dist = |q: &BoundingBox, b: &BoundingBox| q.distance(b);

    for query in random_boxes(&mut rng, 30) {
        let (_, d) = tree.nearest_neighbour(&query, |_, i| dist(&query, &boxes[*i])).unwrap();
        let best = boxes.iter().map(|b| dist(&query, b)).fold(f64::INFINITY, f64::min);
        assert_eq!(d, best);

        let k = tree.nearest_neighbours(&query, 5, |_, i| dist(&query, &boxes[*i]));
        let mut all: Vec<f64> = boxes.iter().map(|b| dist(&query, b)).collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(k.iter().map(|(_, d)| *d).collect::<Vec<_>>(), all[..5].to_vec());
    }
}

#[test]
fn capacity_below_two_is_rejected() {
    assert!(matches!(StrTree::<u8>::with_capacity(1), Err(ModelError::InvalidNodeCapacity(1))));
}
