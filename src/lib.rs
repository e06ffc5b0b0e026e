#![doc = "Planar topology: STR-packed R-tree, robust predicates, noding and DE-9IM relate"]
mod bounds;
mod config;
mod error;
mod index;

pub mod algorithm;
pub mod noding;
pub mod relate;

#[doc(inline)]
pub use bounds::BoundingBox;

#[doc(inline)]
pub use config::{IntersectorKind, TopologyConfig};

#[doc(inline)]
pub use error::ModelError;

#[doc(inline)]
pub use index::{Boundable, Built, InternalNode, ItemVisitor, Items, Open, StrTree, DEFAULT_NODE_CAPACITY};

#[doc(inline)]
pub use noding::{Noder, NodingSummary};

#[doc(inline)]
pub use relate::{Dimension, IntersectionMatrix, Phase, RelateComputer, RelateEngine};

pub use geograph;
