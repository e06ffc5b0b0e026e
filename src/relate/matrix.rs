//! The DE-9IM intersection matrix.

use std::fmt;
use std::str::FromStr;

use geograph::Location;

use crate::error::ModelError;

/// Dimension of an intersection, ordered from empty to area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    #[default]
    Empty,
    Point,
    Line,
    Area,
}

impl Dimension {
    pub fn symbol(self) -> char {
        match self {
            Dimension::Empty => 'F',
            Dimension::Point => '0',
            Dimension::Line => '1',
            Dimension::Area => '2',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'F' | 'f' => Some(Dimension::Empty),
            '0' => Some(Dimension::Point),
            '1' => Some(Dimension::Line),
            '2' => Some(Dimension::Area),
            _ => None,
        }
    }

    /// `true` for any non-empty dimension.
    #[inline]
    pub fn is_true(self) -> bool {
        self != Dimension::Empty
    }
}

/// One cell of a pattern.
fn cell_matches(actual: Dimension, required: char) -> Option<bool> {
    match required {
        '*' => Some(true),
        'T' | 't' => Some(actual.is_true()),
        c => Dimension::from_symbol(c).map(|d| d == actual),
    }
}

fn pattern_chars(pattern: &str) -> Result<[char; 9], ModelError> {
    let chars: Vec<char> = pattern.chars().collect();
    chars.try_into().map_err(|_| ModelError::InvalidPattern(pattern.to_string()))
}

const LOCATIONS: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

/// A 3×3 matrix of the dimensions of the intersections between the
/// interior, boundary and exterior of two geometries.  Rows belong to the
/// first geometry, columns to the second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntersectionMatrix {
    cells: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    /// A matrix with every cell empty.
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.cells[a.index()][b.index()]
    }

    #[inline]
    pub fn set(&mut self, a: Location, b: Location, dim: Dimension) {
        self.cells[a.index()][b.index()] = dim;
    }

    /// Raise the cell to `dim` if it is lower.
    pub fn set_at_least(&mut self, a: Location, b: Location, dim: Dimension) {
        let cell = &mut self.cells[a.index()][b.index()];
        if *cell < dim {
            *cell = dim;
        }
    }

    /// [`Self::set_at_least`] when both locations are known.
    pub fn set_at_least_if_valid(&mut self, a: Option<Location>, b: Option<Location>, dim: Dimension) {
        if let (Some(a), Some(b)) = (a, b) {
            self.set_at_least(a, b, dim);
        }
    }

    /// Raise every cell to the dimension given for it in `pattern`.  `F`,
    /// `T` and `*` leave the cell unchanged.
    pub fn set_at_least_pattern(&mut self, pattern: &str) -> Result<(), ModelError> {
        let chars = pattern_chars(pattern)?;
        for (i, c) in chars.into_iter().enumerate() {
            match c {
                '*' | 'T' | 't' => {}
                c => {
                    let dim = Dimension::from_symbol(c).ok_or_else(|| ModelError::InvalidPattern(pattern.to_string()))?;
                    self.set_at_least(LOCATIONS[i / 3], LOCATIONS[i % 3], dim);
                }
            }
        }
        Ok(())
    }

    /// Set every cell to `dim`.
    pub fn set_all(&mut self, dim: Dimension) {
        self.cells = [[dim; 3]; 3];
    }

    /// The matrix with the roles of the two geometries swapped.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut t = Self::new();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, dim) in row.iter().enumerate() {
                t.cells[j][i] = *dim;
            }
        }
        t
    }

    /// `true` if every cell matches `pattern`, a nine character string of
    /// `F`, `0`, `1`, `2`, `T` (any non-empty dimension) and `*` (anything).
    pub fn matches(&self, pattern: &str) -> Result<bool, ModelError> {
        let chars = pattern_chars(pattern)?;
        let mut all = true;
        for (i, c) in chars.into_iter().enumerate() {
            let ok = cell_matches(self.cells[i / 3][i % 3], c)
                .ok_or_else(|| ModelError::InvalidPattern(pattern.to_string()))?;
            all &= ok;
        }
        Ok(all)
    }

    // -----------------------------------------------------------------------
    // Named predicates
    // -----------------------------------------------------------------------

    fn ii(&self) -> Dimension { self.get(Location::Interior, Location::Interior) }
    fn ib(&self) -> Dimension { self.get(Location::Interior, Location::Boundary) }
    fn ie(&self) -> Dimension { self.get(Location::Interior, Location::Exterior) }
    fn bi(&self) -> Dimension { self.get(Location::Boundary, Location::Interior) }
    fn bb(&self) -> Dimension { self.get(Location::Boundary, Location::Boundary) }
    fn be(&self) -> Dimension { self.get(Location::Boundary, Location::Exterior) }
    fn ei(&self) -> Dimension { self.get(Location::Exterior, Location::Interior) }
    fn eb(&self) -> Dimension { self.get(Location::Exterior, Location::Boundary) }

    pub fn is_disjoint(&self) -> bool {
        !self.ii().is_true() && !self.ib().is_true() && !self.bi().is_true() && !self.bb().is_true()
    }

    pub fn is_intersects(&self) -> bool { !self.is_disjoint() }

    /// Touches is undefined between two points.
    pub fn is_touches(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        if dim_a > dim_b {
            return self.is_touches(dim_b, dim_a);
        }
        use Dimension::*;
        match (dim_a, dim_b) {
            (Area, Area) | (Line, Line) | (Line, Area) | (Point, Area) | (Point, Line) => {
                !self.ii().is_true() && (self.ib().is_true() || self.bi().is_true() || self.bb().is_true())
            }
            _ => false,
        }
    }

    pub fn is_crosses(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::*;
        match (dim_a, dim_b) {
            (Point, Line) | (Point, Area) | (Line, Area) => self.ii().is_true() && self.ie().is_true(),
            (Line, Point) | (Area, Point) | (Area, Line) => self.ii().is_true() && self.ei().is_true(),
            (Line, Line) => self.ii() == Point,
            _ => false,
        }
    }

    pub fn is_within(&self) -> bool {
        self.ii().is_true() && !self.ie().is_true() && !self.be().is_true()
    }

    pub fn is_contains(&self) -> bool {
        self.ii().is_true() && !self.ei().is_true() && !self.eb().is_true()
    }

    fn has_point_in_common(&self) -> bool {
        self.ii().is_true() || self.ib().is_true() || self.bi().is_true() || self.bb().is_true()
    }

    pub fn is_covers(&self) -> bool {
        self.has_point_in_common() && !self.ei().is_true() && !self.eb().is_true()
    }

    pub fn is_covered_by(&self) -> bool {
        self.has_point_in_common() && !self.ie().is_true() && !self.be().is_true()
    }

    /// Topological equality; geometries of different dimension are never
    /// equal.
    pub fn is_equals(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        dim_a == dim_b
            && self.ii().is_true()
            && !self.ie().is_true()
            && !self.be().is_true()
            && !self.ei().is_true()
            && !self.eb().is_true()
    }

    pub fn is_overlaps(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::*;
        match (dim_a, dim_b) {
            (Point, Point) | (Area, Area) => self.ii().is_true() && self.ie().is_true() && self.ei().is_true(),
            (Line, Line) => self.ii() == Line && self.ie().is_true() && self.ei().is_true(),
            _ => false,
        }
    }
}

impl FromStr for IntersectionMatrix {
    type Err = ModelError;

    /// Parse nine dimension symbols (`F`, `0`, `1`, `2`) in row order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = pattern_chars(s)?;
        let mut im = Self::new();
        for (i, c) in chars.into_iter().enumerate() {
            im.cells[i / 3][i % 3] = Dimension::from_symbol(c).ok_or_else(|| ModelError::InvalidPattern(s.to_string()))?;
        }
        Ok(im)
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for dim in row {
                write!(f, "{}", dim.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Location::*;

    #[test]
    fn parse_and_display() {
        let im: IntersectionMatrix = "FF2FF1212".parse().unwrap();
        assert_eq!(im.to_string(), "FF2FF1212");
        assert_eq!(im.get(Interior, Exterior), Dimension::Area);
        assert_eq!(im.get(Boundary, Exterior), Dimension::Line);
        assert!(matches!("FF2FF121".parse::<IntersectionMatrix>(), Err(ModelError::InvalidPattern(_))));
        assert!(matches!("FF2FF121*".parse::<IntersectionMatrix>(), Err(ModelError::InvalidPattern(_))));
    }

    #[test]
    fn set_at_least_only_raises() {
        let mut im = IntersectionMatrix::new();
        im.set(Interior, Interior, Dimension::Line);
        im.set_at_least(Interior, Interior, Dimension::Point);
        assert_eq!(im.get(Interior, Interior), Dimension::Line);
        im.set_at_least_pattern("2FFF0FFF*").unwrap();
        assert_eq!(im.to_string(), "2FFF0FFFF");
        im.set_at_least_if_valid(None, Some(Exterior), Dimension::Area);
        assert_eq!(im.to_string(), "2FFF0FFFF");
    }

    #[test]
    fn transpose_swaps_roles() {
        let im: IntersectionMatrix = "1020F1102".parse().unwrap();
        assert_eq!(im.transposed().to_string(), "1010F0212");
        assert_eq!(im.transposed().transposed(), im);
    }

    #[test]
    fn pattern_matching() {
        let im: IntersectionMatrix = "FF2F11212".parse().unwrap();
        assert!(im.matches("FF*F1****").unwrap());
        assert!(im.matches("F***T****").unwrap());
        assert!(!im.matches("T********").unwrap());
        assert!(im.matches("FF2F1121").is_err());
        assert!(im.matches("FF2F1121X").is_err());
    }

    #[test]
    fn predicates() {
        // Two squares sharing an edge.
        let touch: IntersectionMatrix = "FF2F11212".parse().unwrap();
        assert!(touch.is_touches(Dimension::Area, Dimension::Area));
        assert!(touch.is_intersects());
        assert!(!touch.is_overlaps(Dimension::Area, Dimension::Area));

        // A square inside a larger one.
        let inside: IntersectionMatrix = "2FF1FF212".parse().unwrap();
        assert!(inside.is_within());
        assert!(inside.is_covered_by());
        assert!(inside.transposed().is_contains());
        assert!(inside.transposed().is_covers());

        let equal: IntersectionMatrix = "2FFF1FFF2".parse().unwrap();
        assert!(equal.is_equals(Dimension::Area, Dimension::Area));
        assert!(!equal.is_equals(Dimension::Area, Dimension::Line));

        let crossing: IntersectionMatrix = "0F1FF0102".parse().unwrap();
        assert!(crossing.is_crosses(Dimension::Line, Dimension::Line));

        let disjoint: IntersectionMatrix = "FF2FF1212".parse().unwrap();
        assert!(disjoint.is_disjoint());
    }
}
