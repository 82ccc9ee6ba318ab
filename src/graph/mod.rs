use crate::collections::FxIndexMap;
use crate::errors::DispatchError;
use crate::geometry::{Point, squared_euclidean};

use kdtree::KdTree;
use ordered_float::OrderedFloat;


/// Graph node identifier - matches the 64-bit ids used by road network extracts
pub type NodeId = i64;

/// Edge weight in meters
/// OrderedFloat so weights can key the search frontier
pub type EdgeWeight = OrderedFloat<f64>;

/// Weight assigned to edges inserted without a measured length
pub const DEFAULT_EDGE_LENGTH: f64 = 1.0;


/// Undirected road network with positive edge weights
/// Nodes carry planar positions used for nearest-node lookup and display,
/// never by the search itself.
/// Parallel edges between the same pair of nodes collapse to the minimum weight.
pub struct RoadNetwork {
    positions: FxIndexMap<NodeId, Point>,
    adjacency: FxIndexMap<NodeId, Vec<(NodeId, EdgeWeight)>>,
    tree: KdTree<f64, NodeId, [f64; 2]>,
}

impl RoadNetwork {

    pub fn new() -> Self {
        Self {
            positions: FxIndexMap::default(),
            adjacency: FxIndexMap::default(),
            tree: KdTree::new(2),
        }
    }

    /// Add a node with its planar position
    /// Node ids are unique - re-adding an existing id is rejected
    pub fn add_node(&mut self, id: NodeId, x: f64, y: f64) -> Result<(), DispatchError> {
        if self.positions.contains_key(&id) {
            return Err(DispatchError::InvalidInput(format!("node {id} already exists")));
        }
        self.tree.add([x, y], id)?;
        self.positions.insert(id, Point { x, y });
        self.adjacency.insert(id, Vec::new());
        Ok(())
    }

    /// Add an undirected edge with a measured length
    /// A repeated (a, b) pair keeps the minimum of the supplied lengths
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, length: f64) -> Result<(), DispatchError> {
        if !self.positions.contains_key(&a) || !self.positions.contains_key(&b) {
            return Err(DispatchError::InvalidInput(format!("edge ({a}, {b}) references an unknown node")));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(DispatchError::InvalidInput(format!("edge ({a}, {b}) has invalid length {length}")));
        }

        let weight = OrderedFloat(length);
        self.insert_half_edge(a, b, weight);
        if a != b {
            self.insert_half_edge(b, a, weight);
        }
        Ok(())
    }

    /// Add an undirected edge without a measured length
    pub fn add_unweighted_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), DispatchError> {
        self.add_edge(a, b, DEFAULT_EDGE_LENGTH)
    }

    /// Insert one direction of an edge, collapsing parallel edges to the minimum weight
    fn insert_half_edge(&mut self, from: NodeId, to: NodeId, weight: EdgeWeight) {
        // add_edge checked both endpoints exist
        let edges = self.adjacency.get_mut(&from).unwrap();

        match edges.iter_mut().find(|(node, _)| *node == to) {
            Some(edge) => edge.1 = edge.1.min(weight),
            None => edges.push((to, weight)),
        }
    }

    /// Iterate a node's neighbors with edge weights, in edge insertion order
    /// Unknown nodes yield an empty iterator
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeWeight)> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|edges| edges.iter().copied())
    }

    /// Weight of the edge between two adjacent nodes
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<EdgeWeight> {
        self.adjacency
            .get(&a)?
            .iter()
            .find(|(node, _)| *node == b)
            .map(|(_, weight)| *weight)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    pub fn position(&self, node: NodeId) -> Option<&Point> {
        self.positions.get(&node)
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate all node ids in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions.keys().copied()
    }

    /// Find the node closest to a planar coordinate
    /// Used to translate display clicks into node ids - not used by the search
    pub fn nearest_node(&self, x: f64, y: f64) -> Result<NodeId, DispatchError> {
        let sq_dist = |a: &[f64], b: &[f64]| squared_euclidean(a[0], a[1], b[0], b[1]);

        let nearest = self.tree.nearest(&[x, y], 1, &sq_dist)?;
        match nearest.first() {
            Some((_, id)) => Ok(**id),
            None => Err(DispatchError::InvalidInput("nearest_node on an empty network".to_string())),
        }
    }
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::new()
    }
}
