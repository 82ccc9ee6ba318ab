
pub mod engine;
mod reconstruct;

pub use engine::{Search, SearchEvent, shortest_path};
pub use reconstruct::reconstruct_path;

use crate::collections::FxIndexMap;

/// Type alias for the predecessor tree accumulated during a search
/// N: Node - space on a graph
/// C: Cost of reaching the node from the origin
/// The tuple contains (parent_index, cost) where:
/// - parent_index is the index of the parent node in the map
/// - cost is the best known cost to reach this node from the origin
/// The origin's parent_index is usize::MAX to indicate it has no parent
pub type SearchTree<N, C> = FxIndexMap<N, (usize, C)>;
