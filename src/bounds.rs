//! Axis-aligned bounding boxes.

use geo::{Coord, Rect};

/// An axis-aligned rectangle, possibly empty.
///
/// The empty box has `min > max` on both axes, so [`union`](Self::union) and
/// [`expand_to_include`](Self::expand_to_include) need no special case for
/// it.  Empty boxes intersect nothing and cover nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self { Self::EMPTY }
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// The box spanned by two corners, in any order.  A NaN ordinate is
    /// kept, so the result fails [`is_finite`](Self::is_finite).
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { min_x: min_nan(x1, x2), min_y: min_nan(y1, y2), max_x: max_nan(x1, x2), max_y: max_nan(y1, y2) }
    }

    /// The degenerate box holding a single point.
    pub fn from_point(c: Coord<f64>) -> Self {
        Self { min_x: c.x, min_y: c.y, max_x: c.x, max_y: c.y }
    }

    /// The smallest box holding every coordinate; empty for no coordinates.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coord<f64>>) -> Self {
        coords.into_iter().fold(Self::EMPTY, |b, c| b.expand_to_include(*c))
    }

    #[inline] pub fn is_empty(&self) -> bool { self.min_x > self.max_x }

    /// `true` if all four ordinates are finite.  Always `false` for the
    /// empty box.
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite() && self.min_y.is_finite() && self.max_x.is_finite() && self.max_y.is_finite()
    }

    /// The first non-finite corner, if any.
    pub fn non_finite_corner(&self) -> Option<Coord<f64>> {
        [Coord { x: self.min_x, y: self.min_y }, Coord { x: self.max_x, y: self.max_y }]
            .into_iter()
            .find(|c| !(c.x.is_finite() && c.y.is_finite()))
    }

    #[inline] pub fn min_x(&self) -> f64 { self.min_x }
    #[inline] pub fn min_y(&self) -> f64 { self.min_y }
    #[inline] pub fn max_x(&self) -> f64 { self.max_x }
    #[inline] pub fn max_y(&self) -> f64 { self.max_y }

    /// Width, or 0 for an empty box.
    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    /// Height, or 0 for an empty box.
    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    pub fn area(&self) -> f64 { self.width() * self.height() }

    /// Centre point; `None` for an empty box.
    pub fn centre(&self) -> Option<Coord<f64>> {
        (!self.is_empty()).then(|| Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        })
    }

    /// `true` if the boxes share at least one point (touching counts).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.is_empty() || other.is_empty())
            && other.min_x <= self.max_x
            && other.max_x >= self.min_x
            && other.min_y <= self.max_y
            && other.max_y >= self.min_y
    }

    /// `true` if `p` lies inside or on the boundary.
    pub fn intersects_point(&self, p: Coord<f64>) -> bool {
        self.covers_point(p)
    }

    /// `true` if every point of `other` lies inside or on the boundary of
    /// this box.
    pub fn covers(&self, other: &BoundingBox) -> bool {
        !(self.is_empty() || other.is_empty())
            && other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn covers_point(&self, p: Coord<f64>) -> bool {
        !self.is_empty() && p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Same as [`covers`](Self::covers).
    #[inline] pub fn contains(&self, other: &BoundingBox) -> bool { self.covers(other) }

    /// The smallest box holding both boxes.
    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: min_nan(self.min_x, other.min_x),
            min_y: min_nan(self.min_y, other.min_y),
            max_x: max_nan(self.max_x, other.max_x),
            max_y: max_nan(self.max_y, other.max_y),
        }
    }

    #[must_use]
    pub fn expand_to_include(&self, p: Coord<f64>) -> BoundingBox {
        self.union(&BoundingBox::from_point(p))
    }

    #[must_use]
    pub fn expand_to_include_box(&self, other: &BoundingBox) -> BoundingBox {
        self.union(other)
    }

    /// Minimum Euclidean distance between the boxes; 0 if they intersect and
    /// infinite if either is empty.
    pub fn distance(&self, other: &BoundingBox) -> f64 {
        if self.is_empty() || other.is_empty() {
            return f64::INFINITY;
        }
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        dx.hypot(dy)
    }

    /// Convert to a `geo::Rect`; `None` for an empty box.
    pub fn to_rect(&self) -> Option<Rect<f64>> {
        (!self.is_empty()).then(|| {
            Rect::new(Coord { x: self.min_x, y: self.min_y }, Coord { x: self.max_x, y: self.max_y })
        })
    }
}

// `f64::min` and `f64::max` return the other operand for NaN.
#[inline]
fn min_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

#[inline]
fn max_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(r: Rect<f64>) -> Self {
        Self { min_x: r.min().x, min_y: r.min().y, max_x: r.max().x, max_y: r.max().y }
    }
}

impl From<Coord<f64>> for BoundingBox {
    fn from(c: Coord<f64>) -> Self { Self::from_point(c) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    #[test]
    fn empty_is_union_identity() {
        let b = BoundingBox::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(BoundingBox::EMPTY.union(&b), b);
        assert_eq!(b.union(&BoundingBox::EMPTY), b);
        assert!(BoundingBox::EMPTY.is_empty());
        assert!(!BoundingBox::EMPTY.intersects(&BoundingBox::EMPTY));
        assert!(!b.covers(&BoundingBox::EMPTY));
        assert_eq!(BoundingBox::EMPTY.centre(), None);
        assert_eq!(BoundingBox::EMPTY.area(), 0.0);
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&BoundingBox::new(10.5, 0.0, 11.0, 1.0)));
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn covers_includes_boundary() {
        let a = BoundingBox::new(10.0, 10.0, 0.0, 0.0);
        assert!(a.covers(&BoundingBox::new(0.0, 0.0, 10.0, 5.0)));
        assert!(a.contains(&a));
        assert!(a.covers_point(c(10.0, 0.0)));
        assert!(!a.covers_point(c(10.0, 10.5)));
    }

    #[test]
    fn expand_and_distance() {
        let b = BoundingBox::from_coords(&[c(1.0, 1.0), c(3.0, -1.0)]);
        assert_eq!(b, BoundingBox::new(1.0, -1.0, 3.0, 1.0));
        let b = b.expand_to_include(c(0.0, 4.0));
        assert_eq!((b.width(), b.height()), (3.0, 5.0));
        assert_eq!(b.centre(), Some(c(1.5, 1.5)));
        let far = BoundingBox::from_point(c(6.0, 8.0));
        assert_eq!(b.distance(&far), (9.0f64 + 16.0).sqrt());
    }

    #[test]
    fn rect_round_trip() {
        let r = Rect::new(c(0.0, 5.0), c(2.0, 1.0));
        let b = BoundingBox::from(r);
        assert_eq!(b.to_rect(), Some(r));
        assert_eq!(BoundingBox::EMPTY.to_rect(), None);
    }

    #[test]
    fn nan_survives_construction() {
        let b = BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0);
        assert!(!b.is_finite());
        assert!(b.non_finite_corner().is_some());
        assert!(!b.intersects(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        let grown = BoundingBox::new(0.0, 0.0, 1.0, 1.0).expand_to_include(c(0.5, f64::NAN));
        assert!(!grown.is_finite());
        let inf = BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0);
        assert_eq!(inf.non_finite_corner(), Some(c(f64::INFINITY, 1.0)));
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!BoundingBox::EMPTY.is_finite());
    }
}
