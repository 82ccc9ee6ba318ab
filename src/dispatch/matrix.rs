use crate::errors::DispatchError;
use crate::graph::{NodeId, RoadNetwork};
use crate::search::shortest_path;


/// All-pairs travel costs and paths between the points of interest of one
/// dispatch request
/// Index 0 is the origin, indices 1..=n are the sites in request order
/// Built once per request by running one search per ordered point pair;
/// symmetric over an undirected network, zero diagonal with single-node paths
pub struct TravelMatrix {
    points: Vec<NodeId>,
    distances: Vec<Vec<f64>>,
    paths: Vec<Vec<Vec<NodeId>>>,
}

impl TravelMatrix {

    pub fn build(network: &RoadNetwork, origin: NodeId, sites: &[NodeId]) -> Result<Self, DispatchError> {
        let points: Vec<NodeId> = std::iter::once(origin).chain(sites.iter().copied()).collect();

        for &node in &points {
            if !network.contains(node) {
                return Err(DispatchError::InvalidInput(format!("node {node} is not in the network")));
            }
        }

        let n = points.len();
        let mut distances = vec![vec![0.0; n]; n];
        let mut paths = vec![vec![Vec::new(); n]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    paths[i][j] = vec![points[i]];
                    continue;
                }

                // Every required pair must be connected - an unreachable site
                // makes the whole request unroutable
                let (path, cost) = shortest_path(points[i], |node| network.neighbors(*node), points[j])
                    .ok_or(DispatchError::NoPathFound)?;

                distances[i][j] = cost.into_inner();
                paths[i][j] = path;
            }
        }

        Ok(Self { points, distances, paths })
    }

    /// Number of points of interest, origin included
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of sites (points of interest minus the origin)
    pub fn site_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Node id of a point of interest
    pub fn point(&self, index: usize) -> NodeId {
        self.points[index]
    }

    /// Shortest-path cost between two points of interest
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }

    /// Full node path between two points of interest
    pub fn path(&self, from: usize, to: usize) -> &[NodeId] {
        &self.paths[from][to]
    }
}
