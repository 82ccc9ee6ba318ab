use itertools::Itertools;

use crate::errors::DispatchError;
use super::matrix::TravelMatrix;


/// Largest site count the exhaustive optimizer accepts
/// Work grows as K^n partitions times up to n! orderings per subset, so
/// requests above this bound are rejected up front instead of hanging
pub const MAX_SITES: usize = 6;


/// Best split of sites across responders
/// orders[k] holds responder k's visiting order as matrix point indices
/// (1..=n); every site index appears in exactly one order; an empty order
/// is an idle responder
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub orders: Vec<Vec<usize>>,
    pub total_cost: f64,
}


/// Exhaustively partition the matrix's sites across `responder_count`
/// responders and order each subset for minimum total round-trip cost
///
/// Every assignment of sites to responders is enumerated as a base-K counter
/// (site k's responder is digit k of the code, codes ascending), and each
/// subset is ordered by trying its permutations in lexicographic order. Only
/// a strictly lower total replaces the incumbent, so the first-found minimum
/// under that enumeration order always wins and reruns are reproducible.
pub fn optimize(matrix: &TravelMatrix, responder_count: usize) -> Result<Assignment, DispatchError> {
    if responder_count == 0 {
        return Err(DispatchError::InvalidInput("responder count must be at least 1".to_string()));
    }

    let site_count = matrix.site_count();
    if site_count > MAX_SITES {
        return Err(DispatchError::InvalidInput(
            format!("at most {MAX_SITES} sites per request, got {site_count}"),
        ));
    }

    if site_count == 0 {
        return Ok(Assignment {
            orders: vec![Vec::new(); responder_count],
            total_cost: 0.0,
        });
    }

    // Responders beyond the site count can only idle - excluding them from
    // the enumeration leaves the optimum unchanged
    let buckets = responder_count.min(site_count);

    let mut best: Option<Assignment> = None;

    for code in 0..buckets.pow(site_count as u32) {

        // Decode this assignment: site k goes to digit k of the code
        let mut subsets: Vec<Vec<usize>> = vec![Vec::new(); buckets];
        let mut digits = code;
        for site in 1..=site_count {
            subsets[digits % buckets].push(site);
            digits /= buckets;
        }

        let mut orders = Vec::with_capacity(responder_count);
        let mut total_cost = 0.0;
        for subset in &subsets {
            let (order, cost) = best_visit_order(matrix, subset);
            orders.push(order);
            total_cost += cost;
        }
        // Idle responders excluded from the enumeration
        orders.resize(responder_count, Vec::new());

        if best.as_ref().is_none_or(|incumbent| total_cost < incumbent.total_cost) {
            best = Some(Assignment { orders, total_cost });
        }
    }

    Ok(best.expect("at least one assignment is always enumerated"))
}


/// Cheapest visiting order for one responder's subset of sites
/// Cost is the round trip: origin to first site, site to site legs, and the
/// last site back to the origin
/// An empty subset is an idle responder at cost zero
fn best_visit_order(matrix: &TravelMatrix, subset: &[usize]) -> (Vec<usize>, f64) {
    if subset.is_empty() {
        return (Vec::new(), 0.0);
    }

    let mut best_order = Vec::new();
    let mut best_cost = f64::INFINITY;

    for perm in subset.iter().copied().permutations(subset.len()) {
        let mut cost = 0.0;
        let mut prev = 0; // origin index
        for &site in &perm {
            cost += matrix.distance(prev, site);
            prev = site;
        }
        cost += matrix.distance(prev, 0); // return to the origin

        if cost < best_cost {
            best_cost = cost;
            best_order = perm;
        }
    }

    (best_order, best_cost)
}
