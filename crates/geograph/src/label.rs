//! Topological labels.
//!
//! A [`Label`] records, for each of the (at most two) input geometries, where
//! a graph component lies relative to that geometry.  Line components carry a
//! single `On` location; area components additionally carry the locations on
//! their `Left` and `Right` sides.
//!
//! Labels are small `Copy` values.  Combining two labels is done with the pure
//! [`Label::merged`] and orientation reversal with [`Label::flipped`].

use std::fmt;

/// Location of a point relative to a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// Row/column index in an intersection matrix.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }

    /// Single-character symbol (`i`, `b`, `e`).
    pub fn symbol(self) -> char {
        match self {
            Location::Interior => 'i',
            Location::Boundary => 'b',
            Location::Exterior => 'e',
        }
    }
}

/// Position relative to a directed graph component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    /// The opposite side; `On` is its own opposite.
    pub fn opposite(self) -> Self {
        match self {
            Position::Left => Position::Right,
            Position::Right => Position::Left,
            Position::On => Position::On,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            Position::On => 0,
            Position::Left => 1,
            Position::Right => 2,
        }
    }
}

/// The locations of one component relative to one geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TopologyLocation {
    locs: [Option<Location>; 3],
    area: bool,
}

impl TopologyLocation {
    /// A line location with only an `On` value.
    pub fn line(on: Option<Location>) -> Self {
        Self { locs: [on, None, None], area: false }
    }

    /// An area location with `On`, `Left` and `Right` values.
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self { locs: [on, left, right], area: true }
    }

    #[inline] pub fn is_area(&self) -> bool { self.area }

    #[inline] pub fn is_line(&self) -> bool { !self.area }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Location> {
        self.locs[pos.slot()]
    }

    /// Set the location at `pos`.  Side positions are ignored on a line.
    pub fn set(&mut self, pos: Position, loc: Option<Location>) {
        if pos == Position::On || self.area {
            self.locs[pos.slot()] = loc;
        }
    }

    fn slots(&self) -> &[Option<Location>] {
        if self.area { &self.locs } else { &self.locs[..1] }
    }

    /// `true` if every position is unset.
    pub fn is_null(&self) -> bool {
        self.slots().iter().all(Option::is_none)
    }

    /// `true` if any position is unset.
    pub fn is_any_null(&self) -> bool {
        self.slots().iter().any(Option::is_none)
    }

    /// `true` if every position equals `loc`.
    pub fn all_positions_equal(&self, loc: Location) -> bool {
        self.slots().iter().all(|l| *l == Some(loc))
    }

    pub fn set_all(&mut self, loc: Location) {
        let n = self.slots().len();
        self.locs[..n].fill(Some(loc));
    }

    pub fn set_all_if_null(&mut self, loc: Location) {
        let n = self.slots().len();
        for slot in &mut self.locs[..n] {
            slot.get_or_insert(loc);
        }
    }

    /// Swap left and right.
    pub fn flip(&mut self) {
        if self.area {
            self.locs.swap(1, 2);
        }
    }

    /// Fill unset positions from `other`, widening to an area if `other` is
    /// one.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.area && !self.area {
            self.area = true;
        }
        let n = self.slots().len().min(other.slots().len());
        for i in 0..n {
            if self.locs[i].is_none() {
                self.locs[i] = other.locs[i];
            }
        }
    }

    /// Drop the side locations.
    pub fn to_line(&self) -> Self {
        Self::line(self.locs[0])
    }
}

impl fmt::Display for TopologyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = |l: Option<Location>| l.map_or('-', Location::symbol);
        if self.area {
            write!(f, "{}{}{}", sym(self.locs[1]), sym(self.locs[0]), sym(self.locs[2]))
        } else {
            write!(f, "{}", sym(self.locs[0]))
        }
    }
}

/// Locations of a graph component relative to both input geometries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Label {
    elts: [TopologyLocation; 2],
}

impl Label {
    /// A line label with the same `On` location for both geometries.
    pub fn line(on: Option<Location>) -> Self {
        Self { elts: [TopologyLocation::line(on); 2] }
    }

    /// An area label with the same locations for both geometries.
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self { elts: [TopologyLocation::area(on, left, right); 2] }
    }

    /// A line label that is set only for geometry `geom`.
    pub fn line_for(geom: usize, on: Location) -> Self {
        let mut label = Self::line(None);
        label.elts[geom] = TopologyLocation::line(Some(on));
        label
    }

    /// An area label that is set only for geometry `geom`.
    pub fn area_for(geom: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Self::area(None, None, None);
        label.elts[geom] = TopologyLocation::area(Some(on), Some(left), Some(right));
        label
    }

    #[inline] pub fn topology(&self, geom: usize) -> &TopologyLocation { &self.elts[geom] }

    /// The `On` location for `geom`.
    #[inline] pub fn location(&self, geom: usize) -> Option<Location> { self.elts[geom].get(Position::On) }

    #[inline]
    pub fn side(&self, geom: usize, pos: Position) -> Option<Location> {
        self.elts[geom].get(pos)
    }

    /// Set the `On` location for `geom`.
    #[inline]
    pub fn set_location(&mut self, geom: usize, loc: Option<Location>) {
        self.elts[geom].set(Position::On, loc);
    }

    #[inline]
    pub fn set_side(&mut self, geom: usize, pos: Position, loc: Option<Location>) {
        self.elts[geom].set(pos, loc);
    }

    pub fn set_all(&mut self, geom: usize, loc: Location) {
        self.elts[geom].set_all(loc);
    }

    pub fn set_all_if_null(&mut self, geom: usize, loc: Location) {
        self.elts[geom].set_all_if_null(loc);
    }

    /// Number of geometries this label says anything about.
    pub fn geometry_count(&self) -> usize {
        self.elts.iter().filter(|e| !e.is_null()).count()
    }

    #[inline] pub fn is_null(&self, geom: usize) -> bool { self.elts[geom].is_null() }

    #[inline] pub fn is_any_null(&self, geom: usize) -> bool { self.elts[geom].is_any_null() }

    /// `true` if either geometry's location is an area location.
    pub fn is_area(&self) -> bool {
        self.elts[0].is_area() || self.elts[1].is_area()
    }

    #[inline] pub fn is_area_for(&self, geom: usize) -> bool { self.elts[geom].is_area() }

    #[inline] pub fn is_line(&self, geom: usize) -> bool { self.elts[geom].is_line() }

    pub fn all_positions_equal(&self, geom: usize, loc: Location) -> bool {
        self.elts[geom].all_positions_equal(loc)
    }

    /// Collapse geometry `geom` to a line location.
    pub fn to_line(&mut self, geom: usize) {
        if self.elts[geom].is_area() {
            self.elts[geom] = self.elts[geom].to_line();
        }
    }

    /// This label with left and right swapped for both geometries.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.elts[0].flip();
        self.elts[1].flip();
        self
    }

    /// This label with its unset positions filled from `other`.
    #[must_use]
    pub fn merged(mut self, other: &Label) -> Self {
        self.elts[0].merge(&other.elts[0]);
        self.elts[1].merge(&other.elts[1]);
        self
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A:{} B:{}", self.elts[0], self.elts[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Location::*;

    #[test]
    fn flip_swaps_sides() {
        let l = Label::area_for(0, Boundary, Exterior, Interior).flipped();
        assert_eq!(l.side(0, Position::Left), Some(Interior));
        assert_eq!(l.side(0, Position::Right), Some(Exterior));
        assert_eq!(l.location(0), Some(Boundary));
    }

    #[test]
    fn merge_fills_only_nulls() {
        let a = Label::line_for(0, Interior);
        let b = Label::line_for(1, Boundary).merged(&Label::line(Some(Exterior)));
        let m = a.merged(&b);
        assert_eq!(m.location(0), Some(Interior));
        assert_eq!(m.location(1), Some(Boundary));
    }

    #[test]
    fn merge_widens_line_to_area() {
        let line = Label::line_for(0, Boundary);
        let m = line.merged(&Label::area_for(0, Interior, Interior, Exterior));
        assert!(m.is_area_for(0));
        assert_eq!(m.location(0), Some(Boundary));
        assert_eq!(m.side(0, Position::Left), Some(Interior));
        assert_eq!(m.side(0, Position::Right), Some(Exterior));
    }

    #[test]
    fn geometry_count_ignores_null_elements() {
        assert_eq!(Label::default().geometry_count(), 0);
        assert_eq!(Label::line_for(1, Interior).geometry_count(), 1);
        assert_eq!(Label::line(Some(Exterior)).geometry_count(), 2);
    }

    #[test]
    fn side_on_line_is_ignored() {
        let mut l = Label::line_for(0, Interior);
        l.set_side(0, Position::Left, Some(Exterior));
        assert_eq!(l.side(0, Position::Left), None);
        assert_eq!(l.to_string(), "A:i B:-");
    }
}
