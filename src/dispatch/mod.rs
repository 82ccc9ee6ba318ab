
pub mod matrix;
pub mod optimizer;
pub mod route;

pub use matrix::TravelMatrix;
pub use optimizer::{Assignment, MAX_SITES, optimize};
pub use route::assemble_route;

use crate::errors::DispatchError;
use crate::graph::{NodeId, RoadNetwork};


/// Routed outcome of one dispatch request
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchPlan {
    /// Full drivable node sequence per responder, starting at the origin
    pub routes: Vec<Vec<NodeId>>,
    /// Site node ids per responder, in visit order
    pub visit_orders: Vec<Vec<NodeId>>,
    /// Total round-trip cost achieved by the chosen assignment
    pub total_cost: f64,
}


/// Assign the sites of one request to responders and build each responder's route
///
/// Validates the request, builds the all-pairs travel matrix, finds the
/// minimum-cost partition and per-responder visiting order, and stitches the
/// per-leg shortest paths into continuous routes for display or logging.
pub fn dispatch(
    network: &RoadNetwork,
    origin: NodeId,
    sites: &[NodeId],
    responder_count: usize,
) -> Result<DispatchPlan, DispatchError> {
    if responder_count == 0 {
        return Err(DispatchError::InvalidInput("responder count must be at least 1".to_string()));
    }
    if sites.len() > MAX_SITES {
        return Err(DispatchError::InvalidInput(
            format!("at most {MAX_SITES} sites per request, got {}", sites.len()),
        ));
    }
    if !network.contains(origin) {
        return Err(DispatchError::InvalidInput(format!("origin {origin} is not in the network")));
    }
    for (i, &site) in sites.iter().enumerate() {
        if !network.contains(site) {
            return Err(DispatchError::InvalidInput(format!("site {site} is not in the network")));
        }
        if site == origin {
            return Err(DispatchError::InvalidInput(format!("site {site} is the origin")));
        }
        if sites[..i].contains(&site) {
            return Err(DispatchError::InvalidInput(format!("site {site} selected twice")));
        }
    }

    let matrix = TravelMatrix::build(network, origin, sites)?;
    let assignment = optimize(&matrix, responder_count)?;

    let routes = assignment
        .orders
        .iter()
        .map(|order| assemble_route(&matrix, order))
        .collect();
    let visit_orders = assignment
        .orders
        .iter()
        .map(|order| order.iter().map(|&site| matrix.point(site)).collect())
        .collect();

    Ok(DispatchPlan {
        routes,
        visit_orders,
        total_cost: assignment.total_cost,
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    // Chain network: 0 -(3)- 1 -(2)- 2
    fn chain_network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_node(0, 0.0, 0.0).unwrap();
        network.add_node(1, 3.0, 0.0).unwrap();
        network.add_node(2, 5.0, 0.0).unwrap();
        network.add_edge(0, 1, 3.0).unwrap();
        network.add_edge(1, 2, 2.0).unwrap();
        network
    }

    #[test]
    fn test_dispatch_end_to_end() {
        let network = chain_network();
        let plan = dispatch(&network, 0, &[1, 2], 2).unwrap();

        // Both sites lie on one chain, so one responder takes both
        assert_eq!(plan.total_cost, 10.0);
        assert_eq!(plan.routes.len(), 2);
        assert_eq!(plan.visit_orders.len(), 2);

        let busy: Vec<_> = plan.routes.iter().filter(|route| route.len() > 1).collect();
        assert_eq!(busy, vec![&vec![0, 1, 2]]);

        let idle: Vec<_> = plan.routes.iter().filter(|route| route.len() == 1).collect();
        assert_eq!(idle, vec![&vec![0]]);

        let orders: Vec<_> = plan.visit_orders.iter().filter(|order| !order.is_empty()).collect();
        assert_eq!(orders, vec![&vec![1, 2]]);
    }

    #[test]
    fn test_dispatch_with_no_sites() {
        let network = chain_network();
        let plan = dispatch(&network, 0, &[], 2).unwrap();

        assert_eq!(plan.total_cost, 0.0);
        assert_eq!(plan.routes, vec![vec![0], vec![0]]);
    }

    #[test]
    fn test_dispatch_rejects_origin_as_site() {
        let network = chain_network();
        let result = dispatch(&network, 0, &[0], 2);
        assert!(matches!(result, Err(DispatchError::InvalidInput(_))));
    }

    #[test]
    fn test_dispatch_rejects_duplicate_site() {
        let network = chain_network();
        let result = dispatch(&network, 0, &[1, 1], 2);
        assert!(matches!(result, Err(DispatchError::InvalidInput(_))));
    }

    #[test]
    fn test_dispatch_rejects_unknown_origin() {
        let network = chain_network();
        let result = dispatch(&network, 99, &[1], 2);
        assert!(matches!(result, Err(DispatchError::InvalidInput(_))));
    }

    #[test]
    fn test_dispatch_rejects_zero_responders() {
        let network = chain_network();
        let result = dispatch(&network, 0, &[1], 0);
        assert!(matches!(result, Err(DispatchError::InvalidInput(_))));
    }
}
