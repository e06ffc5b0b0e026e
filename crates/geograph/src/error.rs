use geo::Coord;
use thiserror::Error;

/// Modelling errors raised while assembling graph components.
///
/// All of these indicate malformed input geometry or a caller bug; none are
/// recoverable by retrying the same call.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate ({}, {})", .0.x, .0.y)]
    NonFiniteCoordinate(Coord<f64>),

    /// An edge needs at least two points.
    #[error("edge has {0} point(s); at least 2 are required")]
    TooFewPoints(usize),

    /// Two consecutive points of an edge are equal.
    #[error("zero-length segment at ({}, {})", .0.x, .0.y)]
    ZeroLengthSegment(Coord<f64>),

    /// Two distinct directed edges leave a node in the same direction.
    #[error("duplicate edge direction at node ({}, {})", .0.x, .0.y)]
    DuplicateDirection(Coord<f64>),

    /// An in-result edge enters a node with no in-result edge leaving it.
    #[error("no outgoing result edge at node ({}, {})", .0.x, .0.y)]
    NoOutgoingResultEdge(Coord<f64>),
}
