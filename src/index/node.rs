use crate::bounds::BoundingBox;

/// An entry of an [`StrTree`](super::StrTree): a caller item or an internal
/// node.
#[derive(Clone, Debug)]
pub enum Boundable<T> {
    Leaf { bounds: BoundingBox, item: T },
    Internal(InternalNode<T>),
}

impl<T> Boundable<T> {
    /// Bounds of the entry; `None` only for an empty internal node.
    pub fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Boundable::Leaf { bounds, .. } => Some(*bounds),
            Boundable::Internal(node) => node.bounds,
        }
    }

    pub(super) fn centre_x(&self) -> f64 {
        self.bounds().and_then(|b| b.centre()).map_or(0.0, |c| c.x)
    }

    pub(super) fn centre_y(&self) -> f64 {
        self.bounds().and_then(|b| b.centre()).map_or(0.0, |c| c.y)
    }
}

/// A node of the tree.  Level 0 nodes hold leaves; levels increase towards
/// the root.
#[derive(Clone, Debug)]
pub struct InternalNode<T> {
    level: u32,
    children: Vec<Boundable<T>>,
    bounds: Option<BoundingBox>,
}

impl<T> InternalNode<T> {
    pub(super) fn new(level: u32, children: Vec<Boundable<T>>) -> Self {
        let mut node = Self { level, children, bounds: None };
        node.refresh_bounds();
        node
    }

    #[inline] pub fn level(&self) -> u32 { self.level }

    #[inline] pub fn children(&self) -> &[Boundable<T>] { &self.children }

    /// Union of the children's bounds; `None` if the node has no children.
    #[inline] pub fn bounds(&self) -> Option<BoundingBox> { self.bounds }

    #[inline] pub fn is_empty(&self) -> bool { self.children.is_empty() }

    pub(super) fn children_mut(&mut self) -> &mut Vec<Boundable<T>> { &mut self.children }

    pub(super) fn refresh_bounds(&mut self) {
        self.bounds = self
            .children
            .iter()
            .filter_map(Boundable::bounds)
            .reduce(|a, b| a.union(&b));
    }
}
