//! Routing trait, search strategies, and the shared best-first search.
//!
//! # Strategies
//!
//! [`SearchStrategy::Dijkstra`] expands nodes in order of cost from the
//! source.  [`SearchStrategy::AStar`] adds the great-circle distance from a
//! node to the target (metres) to that priority.
//!
//! # A* heuristic caveat
//!
//! The heuristic lower-bounds the *physical* length still to travel only
//! when every edge is at least as long as the great-circle distance between
//! its endpoints, and it says nothing about how traffic multipliers are
//! spread along the way.  It is therefore not guaranteed to be consistent
//! over effective cost, and a node may be popped before its cheapest `g` is
//! known.  The search re-opens a node whenever a strictly cheaper `g`
//! arrives and stops at the first pop of the target, so the returned path
//! is always valid but not always cost-optimal.
//!
//! Both strategies share one implementation with a pluggable heuristic
//! (`0` for Dijkstra).  Heap ties are broken by push order, so results are
//! deterministic for a given network and endpoints.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use ordered_float::OrderedFloat;

use tr_core::{EdgeId, NodeId};

use crate::cancel::Cancellation;
use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── SearchResult ──────────────────────────────────────────────────────────────

/// One source→target path found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Nodes in order, starting at the source and ending at the target.
    pub nodes: Vec<NodeId>,
    /// Edges in order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of effective cost over `edges`.
    pub total_cost: f64,
    /// Sum of physical length over `edges`, in metres.
    pub total_length_m: f64,
}

impl SearchResult {
    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn target(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }
}

// ── SearchStrategy ────────────────────────────────────────────────────────────

/// Which search algorithm to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// Uninformed shortest path.
    Dijkstra,
    /// Great-circle heuristic towards the target.
    AStar,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 2] = [SearchStrategy::Dijkstra, SearchStrategy::AStar];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchStrategy::Dijkstra => "dijkstra",
            SearchStrategy::AStar    => "astar",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so a single router can serve
/// concurrent requests against a shared network.
pub trait Router: Send + Sync {
    /// Compute a path from `from` to `to`.
    ///
    /// `from == to` yields a single-node path with zero cost.
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        cancel:  &Cancellation,
    ) -> SpatialResult<SearchResult>;
}

/// Dijkstra over effective cost.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        cancel:  &Cancellation,
    ) -> SpatialResult<SearchResult> {
        search(network, SearchStrategy::Dijkstra, from, to, cancel)
    }
}

/// A* over effective cost with the great-circle heuristic.
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        cancel:  &Cancellation,
    ) -> SpatialResult<SearchResult> {
        search(network, SearchStrategy::AStar, from, to, cancel)
    }
}

impl Router for SearchStrategy {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        cancel:  &Cancellation,
    ) -> SpatialResult<SearchResult> {
        search(network, *self, from, to, cancel)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run `strategy` from `from` to `to` over `network.edge_cost`.
///
/// # Errors
///
/// - [`SpatialError::InvalidInput`] for an empty network or unknown node.
/// - [`SpatialError::NoPath`] if `to` is unreachable.
/// - [`SpatialError::Cancelled`] if `cancel` trips mid-search.
pub fn search(
    network:  &RoadNetwork,
    strategy: SearchStrategy,
    from:     NodeId,
    to:       NodeId,
    cancel:   &Cancellation,
) -> SpatialResult<SearchResult> {
    if network.is_empty() {
        return Err(SpatialError::InvalidInput("search on an empty network".into()));
    }
    network.check_node(from)?;
    network.check_node(to)?;

    let result = match strategy {
        SearchStrategy::Dijkstra => best_first(network, from, to, cancel, |_| 0.0),
        SearchStrategy::AStar => {
            let goal = network.position(to);
            best_first(network, from, to, cancel, |n| network.position(n).distance_m(goal))
        }
    };

    match &result {
        Ok(r) => tracing::trace!(
            %strategy, %from, %to,
            nodes = r.nodes.len(),
            cost = r.total_cost,
            "search finished"
        ),
        Err(e) => tracing::trace!(%strategy, %from, %to, error = %e, "search failed"),
    }
    result
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Heap key: (priority, push sequence).  The sequence is unique, so node and
/// `g` never take part in the ordering.
type HeapEntry = Reverse<(OrderedFloat<f64>, u64, NodeId, OrderedFloat<f64>)>;

fn best_first<H>(
    network:   &RoadNetwork,
    from:      NodeId,
    to:        NodeId,
    cancel:    &Cancellation,
    heuristic: H,
) -> SpatialResult<SearchResult>
where
    H: Fn(NodeId) -> f64,
{
    if from == to {
        return Ok(SearchResult {
            nodes:          vec![from],
            edges:          vec![],
            total_cost:     0.0,
            total_length_m: 0.0,
        });
    }

    let n = network.node_count();
    // g[v] = best known effective cost from `from` to v.
    let mut g         = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut seq: u64  = 0;

    g[from.index()] = 0.0;

    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(heuristic(from)), seq, from, OrderedFloat(0.0))));

    while let Some(Reverse((_, _, node, OrderedFloat(cost)))) = heap.pop() {
        if cancel.is_cancelled() {
            return Err(SpatialError::Cancelled);
        }

        // Skip stale heap entries.
        if cost > g[node.index()] {
            continue;
        }

        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to));
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_cost[edge.index()];

            // Strict improvement only: the first-discovered predecessor wins ties.
            if new_cost < g[neighbor.index()] {
                g[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                seq += 1;
                let priority = new_cost + heuristic(neighbor);
                heap.push(Reverse((OrderedFloat(priority), seq, neighbor, OrderedFloat(new_cost))));
            }
        }
    }

    Err(SpatialError::NoPath { from, to })
}

fn reconstruct(
    network:    &RoadNetwork,
    prev_edge:  &[EdgeId],
    from:       NodeId,
    to:         NodeId,
) -> SearchResult {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert!(e.is_valid(), "reached {cur} without a predecessor");
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    // Summed along the final path rather than read from `g`: with an
    // inconsistent heuristic a predecessor's `g` can drop after it was used.
    let total_cost     = edges.iter().map(|e| network.edge_cost[e.index()]).sum();
    let total_length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();

    SearchResult { nodes, edges, total_cost, total_length_m }
}
