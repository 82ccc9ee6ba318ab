
#[derive(Debug)]
pub enum DispatchError {
    NoPathFound, // No route exists between two required nodes
    InvalidInput(String), // Request rejected before any search work began
    CorruptSearchTree, // Parent chain in a search tree does not reach the origin
    KdTreeError(String),
}

impl From<kdtree::ErrorKind> for DispatchError {
    fn from(error: kdtree::ErrorKind) -> Self {
        DispatchError::KdTreeError(error.to_string())
    }
}
