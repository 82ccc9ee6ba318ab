use crate::graph::NodeId;
use super::matrix::TravelMatrix;


/// Stitch one responder's leg paths into a single continuous node sequence
///
/// The route starts at the origin; each visited point appends its leg's path
/// with the first node dropped, so consecutive legs share their boundary node
/// exactly once. An empty order yields the single-node route at the origin.
/// Every consecutive pair in the result was part of some shortest-path leg,
/// so the route only drives edges of the underlying network.
pub fn assemble_route(matrix: &TravelMatrix, order: &[usize]) -> Vec<NodeId> {
    let mut route = vec![matrix.point(0)];
    let mut prev = 0;

    for &site in order {
        let leg = matrix.path(prev, site);
        route.extend_from_slice(&leg[1..]);
        prev = site;
    }

    route
}
