//! Robust geometric predicates.
//!
//! [`orientation`] evaluates the sign of the determinant
//!
//! ```text
//! | p1.x - p0.x   p1.y - p0.y |
//! | p2.x - p0.x   p2.y - p0.y |
//! ```
//!
//! in three stages:
//!
//! 1. plain double arithmetic, accepted when the result clears Shewchuk's
//!    certified error bound;
//! 2. double-double arithmetic ([`DD`]), accepted when it clears a
//!    conservative bound on its own rounding error;
//! 3. exact expansion arithmetic.
//!
//! The returned sign is therefore the sign of the exact determinant for every
//! finite input, so cyclic invariance and antisymmetry hold exactly.

mod dd;
mod expansion;

use std::fmt;
use std::ops::Neg;

use geo::Coord;

pub use dd::{two_diff, two_prod, two_sum, DD};

/// Half an ulp of 1.0; the unit roundoff of IEEE-754 binary64.
const EPSILON: f64 = f64::EPSILON / 2.0;

/// Shewchuk's first-stage error bound for `orient2d`.
const CCW_ERRBOUND_A: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;

/// Bound on the relative error of the double-double determinant.
const DD_ERRBOUND: f64 = 1e-29;

/// Turn direction of an ordered triple of points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    /// `-1` for clockwise, `0` for collinear, `1` for counter-clockwise.
    #[inline]
    pub fn index(self) -> i32 {
        match self {
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
            Orientation::CounterClockwise => 1,
        }
    }

    #[inline]
    fn from_sign(sign: i32) -> Self {
        match sign.signum() {
            1 => Orientation::CounterClockwise,
            -1 => Orientation::Clockwise,
            _ => Orientation::Collinear,
        }
    }
}

impl Neg for Orientation {
    type Output = Orientation;

    fn neg(self) -> Orientation {
        match self {
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::Collinear => Orientation::Collinear,
            Orientation::CounterClockwise => Orientation::Clockwise,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Clockwise => "clockwise",
            Orientation::Collinear => "collinear",
            Orientation::CounterClockwise => "counter-clockwise",
        })
    }
}

/// Orientation of `p2` relative to the directed line `p0 → p1`.
///
/// `CounterClockwise` means `p2` lies to the left.
pub fn orientation(p0: Coord<f64>, p1: Coord<f64>, p2: Coord<f64>) -> Orientation {
    // Evaluate (p0 - p2) × (p1 - p2), which has the sign of (p1 - p0) × (p2 - p0).
    let (ax, ay, bx, by, cx, cy) = (p0.x, p0.y, p1.x, p1.y, p2.x, p2.y);

    let detleft = (ax - cx) * (by - cy);
    let detright = (ay - cy) * (bx - cx);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Orientation::from_sign(sign(det));
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Orientation::from_sign(sign(det));
        }
        -detleft - detright
    } else {
        return Orientation::from_sign(sign(det));
    };

    let errbound = CCW_ERRBOUND_A * detsum;
    if det >= errbound || -det >= errbound {
        return Orientation::from_sign(sign(det));
    }

    let det_dd = (DD::new(ax) - DD::new(cx)) * (DD::new(by) - DD::new(cy))
        - (DD::new(ay) - DD::new(cy)) * (DD::new(bx) - DD::new(cx));
    if det_dd.abs().hi() > DD_ERRBOUND * detsum {
        return Orientation::from_sign(det_dd.signum());
    }

    Orientation::from_sign(expansion::orient_sign(ax, ay, bx, by, cx, cy))
}

#[inline]
fn sign(x: f64) -> i32 {
    if x > 0.0 { 1 } else if x < 0.0 { -1 } else { 0 }
}

/// Orientation evaluated in plain double precision, with no fallback.
///
/// Exposed so callers and tests can observe where the naive determinant goes
/// wrong.
pub fn orientation_naive(p0: Coord<f64>, p1: Coord<f64>, p2: Coord<f64>) -> Orientation {
    let det = (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x);
    Orientation::from_sign(sign(det))
}

/// Intersection point of the infinite lines `p1p2` and `q1q2`, computed in
/// double-double precision.
///
/// Returns `None` when the lines are parallel or the result is not finite.
pub fn intersection_point(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> Option<Coord<f64>> {
    // Homogeneous line coefficients.
    let px = DD::new(p1.y) - DD::new(p2.y);
    let py = DD::new(p2.x) - DD::new(p1.x);
    let pw = DD::new(p1.x).mul_f64(p2.y) - DD::new(p2.x).mul_f64(p1.y);

    let qx = DD::new(q1.y) - DD::new(q2.y);
    let qy = DD::new(q2.x) - DD::new(q1.x);
    let qw = DD::new(q1.x).mul_f64(q2.y) - DD::new(q2.x).mul_f64(q1.y);

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;
    if w.signum() == 0 {
        return None;
    }

    let x = (x / w).to_f64();
    let y = (y / w).to_f64();
    (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
}

/// Returns `true` if the closed ring `ring` (first point repeated at the end)
/// is oriented counter-clockwise.
///
/// Uses the orientation at the highest vertex, so it is robust for rings
/// with collinear runs; flat or collapsed tops fall back to the sign of the
/// shoelace area.
pub fn is_ccw(ring: &[Coord<f64>]) -> bool {
    let n = ring.len().saturating_sub(1);
    if n < 3 {
        return false;
    }

    let hi = (1..n).fold(0, |best, i| if ring[i].y > ring[best].y { i } else { best });
    let hi_pt = ring[hi];

    let mut prev = hi;
    loop {
        prev = if prev == 0 { n - 1 } else { prev - 1 };
        if ring[prev] != hi_pt || prev == hi { break; }
    }
    let mut next = hi;
    loop {
        next = (next + 1) % n;
        if ring[next] != hi_pt || next == hi { break; }
    }

    let (p, q) = (ring[prev], ring[next]);
    if p == hi_pt || q == hi_pt || p == q {
        return signed_area(ring) > 0.0;
    }

    match orientation(p, hi_pt, q) {
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
        // Flat top: the ring runs right-to-left along it when counter-clockwise.
        Orientation::Collinear => p.x > q.x,
    }
}

/// Signed shoelace area; positive for counter-clockwise rings.
fn signed_area(ring: &[Coord<f64>]) -> f64 {
    ring.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}
