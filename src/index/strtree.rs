//! Sort-Tile-Recursive packed R-tree.
//!
//! The tree is filled while [`Open`] and packed in one pass by
//! [`StrTree::build`], which returns the [`Built`] tree.  Only a built tree
//! can be queried, and only an open tree accepts inserts:
//!
//! ```compile_fail
//! use planartopo::{BoundingBox, StrTree};
//!
//! let mut open = StrTree::new();
//! open.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), "a").unwrap();
//! let mut built = open.build();
//! built.insert(BoundingBox::new(2.0, 2.0, 3.0, 3.0), "b").unwrap();
//! ```
//!
//! # Packing
//!
//! With `n` entries and node capacity `M`, a level is packed into
//! `ceil(n / M)` nodes: the entries are sorted on the x-coordinate of their
//! centres and cut into `ceil(sqrt(ceil(n / M)))` vertical slices of
//! `ceil(n / slices)` entries; each slice is sorted on y and chunked into
//! nodes of at most `M` entries.  The new nodes are packed the same way until
//! a single root remains.

use std::marker::PhantomData;
use std::ops::ControlFlow;

use tracing::debug;

use geograph::GraphError;

use crate::bounds::BoundingBox;
use crate::error::ModelError;
use crate::index::node::{Boundable, InternalNode};

pub const DEFAULT_NODE_CAPACITY: usize = 10;

/// Typestate of a tree that still accepts inserts.
#[derive(Clone, Copy, Debug)]
pub struct Open;

/// Typestate of a packed tree.
#[derive(Clone, Copy, Debug)]
pub struct Built;

/// Receives items found by [`StrTree::query_with`].
pub trait ItemVisitor<T> {
    fn visit_item(&mut self, item: &T);

    /// Stop the traversal once this returns `true`.
    fn is_done(&self) -> bool { false }
}

impl<T, F: FnMut(&T)> ItemVisitor<T> for F {
    fn visit_item(&mut self, item: &T) { self(item) }
}

/// A rectangle index bulk-loaded with the STR algorithm.
#[derive(Clone, Debug)]
pub struct StrTree<T, S = Open> {
    node_capacity: usize,
    pending: Vec<(BoundingBox, T)>,
    root: Option<InternalNode<T>>,
    len: usize,
    _state: PhantomData<S>,
}

impl<T> Default for StrTree<T, Open> {
    fn default() -> Self {
        Self {
            node_capacity: DEFAULT_NODE_CAPACITY,
            pending: Vec::new(),
            root: None,
            len: 0,
            _state: PhantomData,
        }
    }
}

impl<T, S> StrTree<T, S> {
    #[inline] pub fn node_capacity(&self) -> usize { self.node_capacity }

    /// Number of items in the tree.
    #[inline] pub fn len(&self) -> usize { self.len }

    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
}

// ---------------------------------------------------------------------------
// Open
// ---------------------------------------------------------------------------

impl<T> StrTree<T, Open> {
    /// An empty tree with node capacity 10.
    pub fn new() -> Self { Self::default() }

    /// An empty tree with the given node capacity (at least 2).
    pub fn with_capacity(node_capacity: usize) -> Result<Self, ModelError> {
        if node_capacity < 2 {
            return Err(ModelError::InvalidNodeCapacity(node_capacity));
        }
        Ok(Self { node_capacity, ..Self::default() })
    }

    /// Queue an item.  Items with empty bounds can never be found and are
    /// dropped; bounds with a NaN or infinite ordinate are refused.
    pub fn insert(&mut self, bounds: BoundingBox, item: T) -> Result<(), ModelError> {
        if bounds.is_empty() {
            return Ok(());
        }
        if let Some(corner) = bounds.non_finite_corner() {
            return Err(GraphError::NonFiniteCoordinate(corner).into());
        }
        self.pending.push((bounds, item));
        self.len += 1;
        Ok(())
    }

    /// Pack the queued items.
    pub fn build(self) -> StrTree<T, Built> {
        let n = self.pending.len();
        let leaves: Vec<_> = self
            .pending
            .into_iter()
            .map(|(bounds, item)| Boundable::Leaf { bounds, item })
            .collect();
        let root = (!leaves.is_empty()).then(|| create_higher_levels(leaves, self.node_capacity));

        let tree = StrTree {
            node_capacity: self.node_capacity,
            pending: Vec::new(),
            root,
            len: n,
            _state: PhantomData,
        };
        debug!(items = n, depth = tree.depth(), capacity = tree.node_capacity, "built STR tree");
        tree
    }
}

fn create_higher_levels<T>(leaves: Vec<Boundable<T>>, capacity: usize) -> InternalNode<T> {
    let mut level = 0;
    let mut nodes = create_parent_boundables(leaves, level, capacity);
    while nodes.len() > 1 {
        level += 1;
        let children = nodes.into_iter().map(Boundable::Internal).collect();
        nodes = create_parent_boundables(children, level, capacity);
    }
    // `leaves` is never empty, so one node is always left.
    nodes.pop().unwrap_or_else(|| InternalNode::new(level, Vec::new()))
}

fn create_parent_boundables<T>(mut children: Vec<Boundable<T>>, level: u32, capacity: usize) -> Vec<InternalNode<T>> {
    let n = children.len();
    let leaf_count = n.div_ceil(capacity);
    let slice_count = (leaf_count as f64).sqrt().ceil() as usize;
    let slice_capacity = n.div_ceil(slice_count.max(1));

    children.sort_by(|a, b| a.centre_x().total_cmp(&b.centre_x()));

    let mut parents = Vec::with_capacity(leaf_count);
    let mut rest = children.into_iter().peekable();
    while rest.peek().is_some() {
        let mut slice: Vec<_> = rest.by_ref().take(slice_capacity).collect();
        slice.sort_by(|a, b| a.centre_y().total_cmp(&b.centre_y()));

        let mut entries = slice.into_iter().peekable();
        while entries.peek().is_some() {
            parents.push(InternalNode::new(level, entries.by_ref().take(capacity).collect()));
        }
    }
    parents
}

// ---------------------------------------------------------------------------
// Built
// ---------------------------------------------------------------------------

impl<T> StrTree<T, Built> {
    /// A built tree is already packed.
    pub fn build(self) -> Self { self }

    #[inline] pub fn root(&self) -> Option<&InternalNode<T>> { self.root.as_ref() }

    /// Number of node levels; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.level() as usize + 1)
    }

    /// Items whose bounds intersect `bounds`.
    pub fn query(&self, bounds: &BoundingBox) -> Vec<&T> {
        let mut found = Vec::new();
        if let Some(root) = &self.root {
            Self::query_node(root, bounds, &mut found);
        }
        found
    }

    fn query_node<'a>(node: &'a InternalNode<T>, search: &BoundingBox, found: &mut Vec<&'a T>) {
        if !node.bounds().is_some_and(|b| b.intersects(search)) {
            return;
        }
        for child in node.children() {
            match child {
                Boundable::Leaf { bounds, item } if bounds.intersects(search) => found.push(item),
                Boundable::Leaf { .. } => {}
                Boundable::Internal(n) => Self::query_node(n, search, found),
            }
        }
    }

    /// Stream the items whose bounds intersect `bounds` into `visitor`,
    /// stopping as soon as it reports done.
    pub fn query_with<V: ItemVisitor<T>>(&self, bounds: &BoundingBox, visitor: &mut V) {
        if let Some(root) = &self.root {
            if !visitor.is_done() {
                let _ = Self::visit_node(root, bounds, visitor);
            }
        }
    }

    fn visit_node<V: ItemVisitor<T>>(node: &InternalNode<T>, search: &BoundingBox, visitor: &mut V) -> ControlFlow<()> {
        if !node.bounds().is_some_and(|b| b.intersects(search)) {
            return ControlFlow::Continue(());
        }
        for child in node.children() {
            match child {
                Boundable::Leaf { bounds, item } => {
                    if bounds.intersects(search) {
                        visitor.visit_item(item);
                        if visitor.is_done() {
                            return ControlFlow::Break(());
                        }
                    }
                }
                Boundable::Internal(n) => Self::visit_node(n, search, visitor)?,
            }
        }
        ControlFlow::Continue(())
    }

    /// Every item with its bounds, in tree order.
    pub fn items(&self) -> Items<'_, T> {
        Items { stack: self.root.iter().map(|r| r.children().iter()).collect() }
    }
}

impl<T: PartialEq> StrTree<T, Built> {
    /// Remove the first item equal to `item` from the subtrees intersecting
    /// `bounds`.  Nodes left empty are pruned and bounds on the path are
    /// recomputed.  Returns `false` if no such item was found.
    pub fn remove(&mut self, bounds: &BoundingBox, item: &T) -> bool {
        let Some(root) = self.root.as_mut() else { return false };
        if !Self::remove_from(root, bounds, item) {
            return false;
        }
        self.len -= 1;
        if root.is_empty() {
            self.root = None;
        }
        true
    }

    fn remove_from(node: &mut InternalNode<T>, search: &BoundingBox, item: &T) -> bool {
        if !node.bounds().is_some_and(|b| b.intersects(search)) {
            return false;
        }
        let children = node.children_mut();
        let found = children
            .iter()
            .position(|c| matches!(c, Boundable::Leaf { item: it, .. } if it == item));
        let removed = match found {
            Some(i) => {
                children.remove(i);
                true
            }
            None => {
                let mut removed = false;
                for i in 0..children.len() {
                    let Boundable::Internal(child) = &mut children[i] else { continue };
                    if Self::remove_from(child, search, item) {
                        if child.is_empty() {
                            children.remove(i);
                        }
                        removed = true;
                        break;
                    }
                }
                removed
            }
        };
        if removed {
            node.refresh_bounds();
        }
        removed
    }
}

/// Iterator over the items of a built tree, see [`StrTree::items`].
pub struct Items<'a, T> {
    stack: Vec<std::slice::Iter<'a, Boundable<T>>>,
}

impl<'a, T> Iterator for Items<'a, T> {
    type Item = (&'a BoundingBox, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Boundable::Leaf { bounds, item }) => return Some((bounds, item)),
                Some(Boundable::Internal(node)) => self.stack.push(node.children().iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
