use crate::errors::DispatchError;
use super::SearchTree;

/// Construct the ordered node path from a search's predecessor tree
/// Walks parent links backward from the goal until the origin sentinel, then reverses
/// tree: SearchTree<N, C> - map of nodes with their parent index and cost
/// goal_index: usize - index of the goal node in the tree
///
/// The goal must have been settled by the search that built the tree; a broken
/// parent chain is a programming error in the caller, not a routing outcome
pub fn reconstruct_path<N, C>(tree: &SearchTree<N, C>, goal_index: usize) -> Result<Vec<N>, DispatchError>
where
    N: Clone,
{

    let mut path = Vec::new();
    let mut current_index = goal_index;

    // Trace back from goal to origin
    while current_index != usize::MAX {
        if let Some((node, &(parent_index, _))) = tree.get_index(current_index) {
            path.push(node.clone());
            current_index = parent_index;
        } else {
            return Err(DispatchError::CorruptSearchTree);
        }
    }

    // The path is in reverse order, so reverse it
    path.reverse();

    if path.is_empty() {
        return Err(DispatchError::CorruptSearchTree);
    }

    Ok(path)
}
