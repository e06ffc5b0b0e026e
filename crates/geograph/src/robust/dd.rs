//! Double-double arithmetic.
//!
//! A [`DD`] is the unevaluated sum `hi + lo` of two doubles with
//! `|lo| <= ulp(hi) / 2`, giving roughly 106 bits of significand.  Addition
//! and multiplication are built on the error-free transforms [`two_sum`] and
//! [`two_prod`].

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Error-free sum: returns `(s, e)` with `s = fl(a + b)` and `a + b = s + e`
/// exactly.
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    (s, e)
}

/// Error-free difference: `a - b = s + e` exactly.
#[inline]
pub fn two_diff(a: f64, b: f64) -> (f64, f64) {
    two_sum(a, -b)
}

/// Error-free product using a fused multiply-add: `a * b = p + e` exactly.
#[inline]
pub fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let e = a.mul_add(b, -p);
    (p, e)
}

/// Renormalise `a + b` assuming `|a| >= |b|`.
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let e = b - (s - a);
    (s, e)
}

/// A double-double number.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DD {
    hi: f64,
    lo: f64,
}

impl DD {
    pub const ZERO: DD = DD { hi: 0.0, lo: 0.0 };

    #[inline] pub fn new(x: f64) -> Self { Self { hi: x, lo: 0.0 } }

    #[inline] pub fn hi(self) -> f64 { self.hi }

    #[inline] pub fn lo(self) -> f64 { self.lo }

    /// Nearest double to this value.
    #[inline] pub fn to_f64(self) -> f64 { self.hi + self.lo }

    /// `-1`, `0` or `1`.
    #[inline]
    pub fn signum(self) -> i32 {
        if self.hi > 0.0 { 1 }
        else if self.hi < 0.0 { -1 }
        else if self.lo > 0.0 { 1 }
        else if self.lo < 0.0 { -1 }
        else { 0 }
    }

    #[inline] pub fn abs(self) -> Self { if self.signum() < 0 { -self } else { self } }

    #[inline] pub fn is_finite(self) -> bool { self.hi.is_finite() && self.lo.is_finite() }

    /// `self * other` where `other` is a plain double.
    #[inline]
    pub fn mul_f64(self, other: f64) -> Self {
        self * DD::new(other)
    }

    /// `self - other` where `other` is a plain double.
    #[inline]
    pub fn sub_f64(self, other: f64) -> Self {
        self - DD::new(other)
    }
}

impl From<f64> for DD {
    fn from(x: f64) -> Self { DD::new(x) }
}

impl Neg for DD {
    type Output = DD;
    #[inline]
    fn neg(self) -> DD { DD { hi: -self.hi, lo: -self.lo } }
}

impl Add for DD {
    type Output = DD;
    #[inline]
    fn add(self, o: DD) -> DD {
        let (s, mut e) = two_sum(self.hi, o.hi);
        let (t, f) = two_sum(self.lo, o.lo);
        e += t;
        let (s, mut e) = quick_two_sum(s, e);
        e += f;
        let (hi, lo) = quick_two_sum(s, e);
        DD { hi, lo }
    }
}

impl Sub for DD {
    type Output = DD;
    #[inline]
    fn sub(self, o: DD) -> DD { self + (-o) }
}

impl Mul for DD {
    type Output = DD;
    #[inline]
    fn mul(self, o: DD) -> DD {
        let (p, mut e) = two_prod(self.hi, o.hi);
        e += self.hi * o.lo + self.lo * o.hi;
        let (hi, lo) = quick_two_sum(p, e);
        DD { hi, lo }
    }
}

impl Div for DD {
    type Output = DD;
    fn div(self, o: DD) -> DD {
        let q1 = self.hi / o.hi;
        let r = self - o.mul_f64(q1);
        let q2 = r.hi / o.hi;
        let r = r - o.mul_f64(q2);
        let q3 = r.hi / o.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        DD { hi, lo } + DD::new(q3)
    }
}
