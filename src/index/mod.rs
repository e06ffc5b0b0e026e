mod nearest;
mod node;
mod strtree;

pub use node::{Boundable, InternalNode};
pub use strtree::{Built, ItemVisitor, Items, Open, StrTree, DEFAULT_NODE_CAPACITY};
