use geo::Coord;

/// Quadrant of a direction vector, numbered counter-clockwise from the
/// positive x-axis.
///
/// ```text
///   NW(1) | NE(0)
///   ------+------
///   SW(2) | SE(3)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quadrant {
    NE = 0,
    NW = 1,
    SW = 2,
    SE = 3,
}

impl Quadrant {
    /// Quadrant of the vector `(dx, dy)`; `None` for the zero vector.
    ///
    /// A zero component counts as non-negative: `(1, 0)` and `(0, 1)` are
    /// `NE`, `(-1, 0)` is `NW` and `(0, -1)` is `SE`.
    pub fn of(dx: f64, dy: f64) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Quadrant::NE,
            (true, false) => Quadrant::SE,
            (false, true) => Quadrant::NW,
            (false, false) => Quadrant::SW,
        })
    }

    /// Quadrant of the segment `p0 → p1`; `None` if the points are equal.
    pub fn of_segment(p0: Coord<f64>, p1: Coord<f64>) -> Option<Self> {
        Self::of(p1.x - p0.x, p1.y - p0.y)
    }
}
