use geo::Coord;
use geograph::GraphError;
use thiserror::Error;

use crate::relate::Phase;

/// Errors raised by indexing, noding and relate.
///
/// Every variant is a precondition violation: malformed input geometry, an
/// invalid configuration or a call made in the wrong order.  Not-found
/// conditions are reported through return values instead.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("node capacity must be at least 2, got {0}")]
    InvalidNodeCapacity(usize),

    /// A linestring or ring has too few distinct points once repeated points
    /// are removed.
    #[error("{kind} has {count} distinct point(s); at least {min} are required")]
    TooFewPoints { kind: &'static str, count: usize, min: usize },

    /// Side labels around a node contradict each other.
    #[error("side location conflict at ({}, {})", .0.x, .0.y)]
    SideLocationConflict(Coord<f64>),

    /// A relate phase was run while the computer was in another phase.
    #[error("relate computer is at phase \"{found}\", expected \"{expected}\"")]
    PhaseOrder { expected: Phase, found: Phase },

    #[error("invalid intersection matrix pattern {0:?}")]
    InvalidPattern(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
