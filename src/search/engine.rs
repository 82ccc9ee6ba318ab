use super::{SearchTree, reconstruct_path};
use crate::collections::FxIndexMap;

use std::{collections::BinaryHeap, hash::Hash, cmp::Ordering, fmt::Debug};
use num_traits::Zero;
use indexmap::map::Entry::{Occupied, Vacant};
use rustc_hash::FxHashSet;


/// One observable step of a running search
/// Events are produced in the exact chronological order of the algorithm's
/// internal steps and are meant to be pulled one at a time by a consumer
/// (a display, a statistics collector, a test)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent<N> {
    /// A node's shortest distance from the origin was finalized
    Visited(N),
    /// A node's best known distance was strictly improved
    Relaxed(N),
    /// The destination was settled - carries the full origin to destination path
    Found(Vec<N>),
    /// The frontier emptied without reaching the destination - no path exists
    Exhausted,
}


/// Incremental Dijkstra search from a fixed origin toward a destination
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
///
/// Implemented as an explicit state machine: each call to `next` advances the
/// algorithm until it produces exactly one `SearchEvent`, so consumers control
/// the pace. Dropping the search mid-run is the only cancellation needed -
/// all state is owned by this struct.
///
/// The frontier may hold stale duplicate entries for a node; they are resolved
/// by skipping entries whose node is already settled, never by decrease-key.
/// Ties in cost fall back to BinaryHeap's internal sift order, which is
/// deterministic for a fixed push sequence, so a fixed graph and fixed
/// endpoints replay an identical event sequence.
pub struct Search<N, C, NN, IT>
where
    NN: Fn(&N) -> IT,
    IT: IntoIterator<Item = (N, C)>,
{
    neighbors: NN,
    destination: N,
    tree: SearchTree<N, C>,
    settled: FxHashSet<usize>,
    frontier: BinaryHeap<Candidate<C>>,
    expanding: Option<(usize, C, IT::IntoIter)>, // settled node mid neighbor sweep
    found_at: Option<usize>, // settled destination awaiting its Found event
    done: bool,
}

impl<N, C, NN, IT> Search<N, C, NN, IT>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT, // returns iterator of neighbors + costs
    IT: IntoIterator<Item = (N, C)>, // Iterator of neighbors + edge cost to neighbor node
    C: Zero + Ord + Copy + Debug,
{

    /// Start a search - no work happens until events are pulled
    /// The origin may equal the destination (degenerate one-node path)
    pub fn new(origin: N, neighbors: NN, destination: N) -> Self {
        let mut tree: SearchTree<N, C> = FxIndexMap::default();
        let mut frontier = BinaryHeap::new();

        // Seed the frontier with the origin at zero cost
        let origin_index = tree.insert_full(origin, (usize::MAX, Zero::zero())).0;
        frontier.push(Candidate {
            index: origin_index,
            cost: Zero::zero(),
        });

        Self {
            neighbors,
            destination,
            tree,
            settled: FxHashSet::default(),
            frontier,
            expanding: None,
            found_at: None,
            done: false,
        }
    }

    /// Final cost of a settled node, None while a node is unsettled
    pub fn distance(&self, node: &N) -> Option<C> {
        let index = self.tree.get_index_of(node)?;
        if self.settled.contains(&index) {
            Some(self.tree[index].1)
        } else {
            None
        }
    }
}

impl<N, C, NN, IT> Iterator for Search<N, C, NN, IT>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT,
    IT: IntoIterator<Item = (N, C)>,
    C: Zero + Ord + Copy + Debug,
{
    type Item = SearchEvent<N>;

    fn next(&mut self) -> Option<SearchEvent<N>> {
        if self.done {
            return None;
        }

        // The destination was settled on the previous pull - emit its path
        if let Some(goal_index) = self.found_at.take() {
            self.done = true;
            let path = reconstruct_path(&self.tree, goal_index)
                .expect("settled destination must trace back to the origin");
            return Some(SearchEvent::Found(path));
        }

        loop {
            // Finish sweeping the neighbors of the last settled node
            if let Some((index, cost, mut neighbor_iter)) = self.expanding.take() {
                while let Some((neighbor, edge_cost)) = neighbor_iter.next() {

                    // new cost to reach this node = edge cost + node cost
                    let new_cost = edge_cost + cost;

                    let neighbor_index;
                    match self.tree.entry(neighbor.clone()) {
                        Vacant(e) => {
                            // This is the first time we're seeing this neighbor
                            neighbor_index = e.index();
                            e.insert((index, new_cost));
                        }
                        Occupied(mut e) => {
                            if e.get().1 > new_cost {
                                // We've found a better path to this neighbor
                                neighbor_index = e.index();
                                e.insert((index, new_cost));
                            } else {
                                // The existing path is better, do nothing
                                continue;
                            }
                        }
                    }

                    // Strict improvement - queue the candidate and report it
                    // The old frontier entry, if any, stays behind as a stale duplicate
                    self.frontier.push(Candidate {
                        index: neighbor_index,
                        cost: new_cost,
                    });
                    self.expanding = Some((index, cost, neighbor_iter));
                    return Some(SearchEvent::Relaxed(neighbor));
                }
            }

            // Settle the cheapest frontier candidate
            match self.frontier.pop() {
                Some(Candidate { index, .. }) => {
                    if !self.settled.insert(index) {
                        // Stale duplicate entry for an already settled node
                        continue;
                    }

                    let (node, &(_, cost)) = self.tree.get_index(index).unwrap();
                    let node = node.clone();

                    if node == self.destination {
                        self.found_at = Some(index);
                    } else {
                        self.expanding = Some((index, cost, (self.neighbors)(&node).into_iter()));
                    }
                    return Some(SearchEvent::Visited(node));
                }
                None => {
                    // No path exists - a normal terminal outcome, not an error
                    self.done = true;
                    return Some(SearchEvent::Exhausted);
                }
            }
        }
    }
}


/// Run a search to completion
/// Returns the origin to destination path and its cost, or None when no path exists
pub fn shortest_path<N, C, NN, IT>(origin: N, neighbors: NN, destination: N) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT,
    IT: IntoIterator<Item = (N, C)>,
    C: Zero + Ord + Copy + Debug,
{
    let mut search = Search::new(origin, neighbors, destination.clone());

    loop {
        match search.next() {
            Some(SearchEvent::Found(path)) => {
                let cost = search
                    .distance(&destination)
                    .expect("found destination must be settled");
                return Some((path, cost));
            }
            Some(SearchEvent::Exhausted) | None => return None,
            Some(_) => {}
        }
    }
}


/// Frontier candidate
/// - for ordering we only need cost and a way to identify the node
/// - ordering is reversed so the BinaryHeap pops the smallest cost first
#[derive(Debug)]
struct Candidate<C> {
    index: usize,
    cost: C,
}

impl<C: Ord> Ord for Candidate<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost)
    }
}
impl<C: Ord> PartialOrd for Candidate<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<C: PartialEq> PartialEq for Candidate<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl<C: PartialEq> Eq for Candidate<C> {}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Helper function to create a neighbor function from a graph
    // Assumes data stored as: HashMap<String, Vec<(String, u32)>>
    fn create_neighbor_fn(graph: &HashMap<String, Vec<(String, u32)>>) -> impl Fn(&String) -> Vec<(String, u32)> + '_ {
        move |node: &String| {
            graph.get(node).unwrap_or(&vec![]).clone()
        }
    }

    fn diamond_graph() -> HashMap<String, Vec<(String, u32)>> {
        // Diamond-shaped graph: A -> B -> D and A -> C -> D
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![("B".to_string(), 1), ("C".to_string(), 3)]);
        graph.insert("B".to_string(), vec![("D".to_string(), 5)]);
        graph.insert("C".to_string(), vec![("D".to_string(), 1)]);
        graph.insert("D".to_string(), vec![]);
        graph
    }

    #[test]
    fn test_event_sequence_on_diamond_graph() {
        let graph = diamond_graph();
        let neighbors = create_neighbor_fn(&graph);

        let search = Search::new("A".to_string(), neighbors, "D".to_string());
        let events: Vec<_> = search.collect();

        // Fixed neighbor order and no cost ties make the full sequence deterministic
        let expected = vec![
            SearchEvent::Visited("A".to_string()),
            SearchEvent::Relaxed("B".to_string()),
            SearchEvent::Relaxed("C".to_string()),
            SearchEvent::Visited("B".to_string()),
            SearchEvent::Relaxed("D".to_string()), // via B at cost 6
            SearchEvent::Visited("C".to_string()),
            SearchEvent::Relaxed("D".to_string()), // improved via C at cost 4
            SearchEvent::Visited("D".to_string()),
            SearchEvent::Found(vec!["A".to_string(), "C".to_string(), "D".to_string()]),
        ];
        assert_eq!(events, expected);
    }

    #[test]
    fn test_found_path_cost_matches_settled_distance() {
        let graph = diamond_graph();
        let neighbors = create_neighbor_fn(&graph);

        let mut search = Search::new("A".to_string(), neighbors, "D".to_string());

        let mut found_path = None;
        while let Some(event) = search.next() {
            if let SearchEvent::Found(path) = event {
                found_path = Some(path);
            }
        }

        let path = found_path.unwrap();
        assert_eq!(path.first().unwrap(), "A");
        assert_eq!(path.last().unwrap(), "D");
        assert_eq!(search.distance(&"D".to_string()), Some(4));

        // Sum of edge weights along the path equals the settled distance
        let graph = diamond_graph();
        let mut total = 0;
        for pair in path.windows(2) {
            let edge = graph.get(&pair[0]).unwrap().iter()
                .find(|(node, _)| *node == pair[1])
                .map(|(_, cost)| *cost)
                .unwrap();
            total += edge;
        }
        assert_eq!(total, 4);
    }

    #[test]
    fn test_four_node_cycle() {
        // Undirected cycle A - B - C - D - A with unit weights
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![("B".to_string(), 1), ("D".to_string(), 1)]);
        graph.insert("B".to_string(), vec![("A".to_string(), 1), ("C".to_string(), 1)]);
        graph.insert("C".to_string(), vec![("B".to_string(), 1), ("D".to_string(), 1)]);
        graph.insert("D".to_string(), vec![("C".to_string(), 1), ("A".to_string(), 1)]);

        let neighbors = create_neighbor_fn(&graph);
        let mut search = Search::new("A".to_string(), neighbors, "C".to_string());

        let mut visited = Vec::new();
        let mut found = None;
        while let Some(event) = search.next() {
            match event {
                SearchEvent::Visited(node) => visited.push(node),
                SearchEvent::Found(path) => found = Some(path),
                SearchEvent::Relaxed(_) => {}
                SearchEvent::Exhausted => panic!("C is reachable from A"),
            }
        }

        // B and D both sit at distance 1 < 2, so all four nodes settle
        // before the destination's Found event; A first, C last
        assert_eq!(visited.len(), 4);
        assert_eq!(visited.first().unwrap(), "A");
        assert_eq!(visited.last().unwrap(), "C");

        // Either arc of the cycle is a valid minimum at cost 2
        let path = found.unwrap();
        let a_b_c: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let a_d_c: Vec<String> = vec!["A".into(), "D".into(), "C".into()];
        assert!(path == a_b_c || path == a_d_c);
        assert_eq!(search.distance(&"C".to_string()), Some(2));
    }

    #[test]
    fn test_unreachable_destination_exhausts() {
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![("B".to_string(), 1)]);
        graph.insert("B".to_string(), vec![]);
        graph.insert("Z".to_string(), vec![]); // Z is not connected

        let neighbors = create_neighbor_fn(&graph);
        let mut search = Search::new("A".to_string(), neighbors, "Z".to_string());

        let events: Vec<_> = search.by_ref().collect();

        // Exactly one terminal Exhausted event, no Found
        assert_eq!(events.last(), Some(&SearchEvent::Exhausted));
        assert_eq!(events.iter().filter(|e| matches!(e, SearchEvent::Exhausted)).count(), 1);
        assert!(!events.iter().any(|e| matches!(e, SearchEvent::Found(_))));

        // The sequence is finished
        assert_eq!(search.next(), None);
    }

    #[test]
    fn test_origin_equals_destination() {
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![("B".to_string(), 1)]);
        graph.insert("B".to_string(), vec![]);

        let neighbors = create_neighbor_fn(&graph);
        let search = Search::new("A".to_string(), neighbors, "A".to_string());
        let events: Vec<_> = search.collect();

        assert_eq!(events, vec![
            SearchEvent::Visited("A".to_string()),
            SearchEvent::Found(vec!["A".to_string()]),
        ]);
    }

    #[test]
    fn test_rerun_replays_identical_events() {
        let graph = diamond_graph();

        let first: Vec<_> = Search::new("A".to_string(), create_neighbor_fn(&graph), "D".to_string()).collect();
        let second: Vec<_> = Search::new("A".to_string(), create_neighbor_fn(&graph), "D".to_string()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_shortest_path_helper() {
        let graph = diamond_graph();
        let neighbors = create_neighbor_fn(&graph);

        let (path, cost) = shortest_path("A".to_string(), neighbors, "D".to_string()).unwrap();
        assert_eq!(path, vec!["A", "C", "D"].into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(cost, 4);
    }

    #[test]
    fn test_shortest_path_helper_no_path() {
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![]);
        graph.insert("Z".to_string(), vec![]);

        let neighbors = create_neighbor_fn(&graph);
        assert!(shortest_path("A".to_string(), neighbors, "Z".to_string()).is_none());
    }

    #[test]
    fn test_distance_is_none_before_settling() {
        let graph = diamond_graph();
        let neighbors = create_neighbor_fn(&graph);

        let mut search = Search::new("A".to_string(), neighbors, "D".to_string());

        // Pull a single event: A is settled, D is not even discovered yet
        assert_eq!(search.next(), Some(SearchEvent::Visited("A".to_string())));
        assert_eq!(search.distance(&"A".to_string()), Some(0));
        assert_eq!(search.distance(&"D".to_string()), None);
    }
}
