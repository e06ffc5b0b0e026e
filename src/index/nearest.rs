//! Best-first nearest-neighbour search over a built [`StrTree`].
//!
//! Entries are popped from a min-heap keyed on a lower bound of their
//! distance to the query: the box distance for nodes, the exact distance
//! reported by the caller for items.  The caller's distance must never be
//! smaller than the box distance, so an item popped from the heap is closer
//! than anything still queued.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::bounds::BoundingBox;
use crate::index::node::{Boundable, InternalNode};
use crate::index::strtree::{Built, StrTree};

enum Entry<'a, T> {
    Node(&'a InternalNode<T>),
    Item(&'a T),
}

struct Queued<'a, T> {
    dist: f64,
    seq: usize,
    entry: Entry<'a, T>,
}

impl<T> PartialEq for Queued<'_, T> {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl<T> Eq for Queued<'_, T> {}

impl<T> PartialOrd for Queued<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<T> Ord for Queued<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smaller distance first, then insertion order.
        other.dist.total_cmp(&self.dist).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Heap state of one search.
struct Search<'a, T, F> {
    bounds: BoundingBox,
    distance: F,
    heap: BinaryHeap<Queued<'a, T>>,
    seq: usize,
}

impl<'a, T, F: FnMut(&BoundingBox, &T) -> f64> Search<'a, T, F> {
    fn new(tree: &'a StrTree<T, Built>, bounds: BoundingBox, distance: F) -> Self {
        let mut search = Self { bounds, distance, heap: BinaryHeap::new(), seq: 0 };
        if let Some(root) = tree.root() {
            search.push_node(root);
        }
        search
    }

    fn push(&mut self, dist: f64, entry: Entry<'a, T>) {
        self.heap.push(Queued { dist, seq: self.seq, entry });
        self.seq += 1;
    }

    fn push_node(&mut self, node: &'a InternalNode<T>) {
        let dist = node.bounds().map_or(f64::INFINITY, |b| b.distance(&self.bounds));
        self.push(dist, Entry::Node(node));
    }

    /// Next item in order of distance.
    fn next_item(&mut self) -> Option<(&'a T, f64)> {
        while let Some(Queued { dist, entry, .. }) = self.heap.pop() {
            match entry {
                Entry::Item(item) => return Some((item, dist)),
                Entry::Node(node) => {
                    for child in node.children() {
                        match child {
                            Boundable::Leaf { bounds, item } => {
                                let d = (self.distance)(bounds, item);
                                self.push(d, Entry::Item(item));
                            }
                            Boundable::Internal(n) => self.push_node(n),
                        }
                    }
                }
            }
        }
        None
    }

    /// Smallest key still queued.
    fn peek_dist(&self) -> Option<f64> {
        self.heap.peek().map(|q| q.dist)
    }
}

impl<T> StrTree<T, Built> {
    /// The item closest to `bounds` together with its distance.
    ///
    /// `distance(item_bounds, item)` is the exact distance from an item to
    /// the query object; it must be at least
    /// `item_bounds.distance(bounds)`.  Ties go to the item reached first.
    pub fn nearest_neighbour<F>(&self, bounds: &BoundingBox, distance: F) -> Option<(&T, f64)>
    where
        F: FnMut(&BoundingBox, &T) -> f64,
    {
        Search::new(self, *bounds, distance).next_item()
    }

    /// Up to `k` items closest to `bounds`, nearest first.
    pub fn nearest_neighbours<F>(&self, bounds: &BoundingBox, k: usize, distance: F) -> Vec<(&T, f64)>
    where
        F: FnMut(&BoundingBox, &T) -> f64,
    {
        let mut search = Search::new(self, *bounds, distance);
        std::iter::from_fn(|| search.next_item()).take(k).collect()
    }

    /// `true` if some item lies within `max_distance` of `bounds`.
    pub fn is_within_distance<F>(&self, bounds: &BoundingBox, max_distance: f64, distance: F) -> bool
    where
        F: FnMut(&BoundingBox, &T) -> f64,
    {
        let mut search = Search::new(self, *bounds, distance);
        while search.peek_dist().is_some_and(|d| d <= max_distance) {
            if let Some((_, d)) = search.next_item() {
                return d <= max_distance;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> StrTree<(f64, f64), Built> {
        let mut tree = StrTree::with_capacity(4).unwrap();
        for i in 0..10 {
            for j in 0..10 {
                let p = (i as f64 * 10.0, j as f64 * 10.0);
                tree.insert(BoundingBox::new(p.0, p.1, p.0, p.1), p).unwrap();
            }
        }
        tree.build()
    }

    fn box_distance(query: BoundingBox) -> impl FnMut(&BoundingBox, &(f64, f64)) -> f64 {
        move |b, _| b.distance(&query)
    }

    #[test]
    fn nearest_point() {
        let t = tree();
        let q = BoundingBox::new(31.0, 58.0, 31.0, 58.0);
        let (item, d) = t.nearest_neighbour(&q, box_distance(q)).unwrap();
        assert_eq!(*item, (30.0, 60.0));
        assert!((d - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn k_nearest_are_sorted() {
        let t = tree();
        let q = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        let found = t.nearest_neighbours(&q, 3, box_distance(q));
        let items: Vec<_> = found.iter().map(|(p, _)| **p).collect();
        assert_eq!(items[0], (0.0, 0.0));
        assert!(items[1..].contains(&(10.0, 0.0)) && items[1..].contains(&(0.0, 10.0)));
        assert!(found.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn within_distance() {
        let t = tree();
        let q = BoundingBox::new(-3.0, -4.0, -3.0, -4.0);
        assert!(t.is_within_distance(&q, 5.0, box_distance(q)));
        assert!(!t.is_within_distance(&q, 4.9, box_distance(q)));
    }

    #[test]
    fn empty_tree_has_no_neighbour() {
        let t = StrTree::<u8>::new().build();
        let q = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(t.nearest_neighbour(&q, |b, _| b.distance(&q)).is_none());
        assert!(t.nearest_neighbours(&q, 4, |b, _| b.distance(&q)).is_empty());
    }
}
