//! Exact sign of the 2x2 orientation determinant via expansion arithmetic.
//!
//! An expansion is a sequence of non-overlapping doubles in increasing order
//! of magnitude whose exact sum is the represented value.  Its sign is the
//! sign of the last (largest) non-zero component.

use super::dd::{two_diff, two_prod, two_sum};

/// Add the double `b` to the expansion `e` exactly, dropping zero components.
fn grow(e: &mut Vec<f64>, b: f64) {
    let mut q = b;
    let mut out = Vec::with_capacity(e.len() + 1);
    for &component in e.iter() {
        let (sum, err) = two_sum(q, component);
        if err != 0.0 {
            out.push(err);
        }
        q = sum;
    }
    if q != 0.0 {
        out.push(q);
    }
    *e = out;
}

/// Exact product of two two-term values, pushed term by term into `e`.
fn grow_product(e: &mut Vec<f64>, a: (f64, f64), b: (f64, f64), negate: bool) {
    let s = if negate { -1.0 } else { 1.0 };
    for x in [a.0, a.1] {
        for y in [b.0, b.1] {
            let (p, err) = two_prod(x, y);
            grow(e, s * err);
            grow(e, s * p);
        }
    }
}

/// Exact sign of `(a - c) × (b - c)`.
pub(super) fn orient_sign(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> i32 {
    let acx = two_diff(ax, cx);
    let acy = two_diff(ay, cy);
    let bcx = two_diff(bx, cx);
    let bcy = two_diff(by, cy);

    let mut e = Vec::with_capacity(32);
    grow_product(&mut e, acx, bcy, false);
    grow_product(&mut e, acy, bcx, true);

    match e.iter().rev().find(|v| **v != 0.0) {
        Some(v) if *v > 0.0 => 1,
        Some(_) => -1,
        None => 0,
    }
}
