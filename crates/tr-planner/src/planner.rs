//! Multi-waypoint route planning.
//!
//! # Request pipeline
//!
//! ```text
//! find_route(start, end, waypoints):
//!   ① Order    : stable-sort waypoints by great-circle distance from start.
//!   ② Resolve  : snap start, each waypoint, end to a node via GraphIndex.
//!   ③ Search   : for each strategy, route every consecutive stop pair
//!               (start→wp1, …, wpN→end) with the same segment routine.
//!   ④ Stitch   : concatenate segment paths (shared stop node kept once),
//!               sum costs and lengths.
//! ```
//!
//! Any segment failure aborts the request for both strategies.

use std::time::Duration;

use tr_core::{GeoPoint, NodeId, PlannerConfig};
use tr_spatial::{search, Cancellation, GraphIndex, RoadNetwork, SearchResult, SearchStrategy};

use crate::{PlanError, PlanResult};

// ── Results ───────────────────────────────────────────────────────────────────

/// The stitched route for one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub strategy: SearchStrategy,
    /// Stitched node path from the start node to the end node.
    pub nodes: Vec<NodeId>,
    /// `nodes` converted to positions, ready for a polyline.
    pub positions: Vec<GeoPoint>,
    /// Per-segment search results, in stop order.
    pub segments: Vec<SearchResult>,
    /// Sum of segment effective costs.
    pub total_cost: f64,
    /// Sum of segment physical lengths, in metres.
    pub total_length_m: f64,
}

impl RouteResult {
    /// `positions` shifted by `delta_deg` on both axes, for drawing two
    /// overlapping routes side by side.
    pub fn offset(&self, delta_deg: f64) -> Vec<GeoPoint> {
        self.positions.iter().map(|p| p.offset(delta_deg)).collect()
    }
}

/// Both strategies' routes for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub dijkstra: RouteResult,
    pub astar:    RouteResult,
    /// Waypoints in the order they were visited, for marker rendering.
    pub waypoints: Vec<GeoPoint>,
    /// Resolved stop nodes: start, waypoints, end.
    pub stops: Vec<NodeId>,
}

impl RoutePlan {
    pub fn get(&self, strategy: SearchStrategy) -> &RouteResult {
        match strategy {
            SearchStrategy::Dijkstra => &self.dijkstra,
            SearchStrategy::AStar    => &self.astar,
        }
    }
}

/// Inputs of one planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start:     GeoPoint,
    pub end:       GeoPoint,
    pub waypoints: Vec<GeoPoint>,
}

// ── Waypoint ordering ─────────────────────────────────────────────────────────

/// Waypoints sorted by ascending great-circle distance from `start`.
///
/// The sort is stable: equidistant waypoints keep their input order.
pub fn order_waypoints(start: GeoPoint, waypoints: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut keyed: Vec<(f64, GeoPoint)> =
        waypoints.iter().map(|&wp| (start.distance_m(wp), wp)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, wp)| wp).collect()
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Plans routes against one network/index pair.
///
/// Holds only shared references and a cancellation token, so it is cheap
/// to create per request and safe to use from several threads.
pub struct RoutePlanner<'a> {
    network:  &'a RoadNetwork,
    index:    &'a GraphIndex,
    cancel:   Cancellation,
    /// Per-call budget; the deadline is set when each call starts.
    deadline: Option<Duration>,
}

impl<'a> RoutePlanner<'a> {
    /// # Errors
    ///
    /// [`PlanError::InvalidInput`] if `index` was not built for a network of
    /// this size.
    pub fn new(network: &'a RoadNetwork, index: &'a GraphIndex) -> PlanResult<Self> {
        if index.len() != network.node_count() {
            return Err(PlanError::InvalidInput(format!(
                "index covers {} nodes but network has {}",
                index.len(),
                network.node_count()
            )));
        }
        Ok(Self::new_unchecked(network, index))
    }

    pub(crate) fn new_unchecked(network: &'a RoadNetwork, index: &'a GraphIndex) -> Self {
        Self { network, index, cancel: Cancellation::new(), deadline: None }
    }

    /// Use `cancel` for every search this planner runs.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Apply the per-request deadline from `config`, if any.  The budget
    /// restarts on every [`find_route`](Self::find_route) and
    /// [`route_segments`](Self::route_segments) call.
    pub fn with_config(mut self, config: &PlannerConfig) -> Self {
        self.deadline = config.deadline();
        self
    }

    /// Token for one call: the shared flag plus this call's deadline.
    fn call_cancellation(&self) -> Cancellation {
        match self.deadline {
            Some(d) => self.cancel.clone().with_timeout(d),
            None    => self.cancel.clone(),
        }
    }

    pub fn network(&self) -> &'a RoadNetwork {
        self.network
    }

    /// Steps ① and ②: order the waypoints and snap every stop to a node.
    ///
    /// Returns `(ordered_waypoints, stops)` with
    /// `stops.len() == ordered_waypoints.len() + 2`.
    pub fn resolve_stops(
        &self,
        start:     GeoPoint,
        end:       GeoPoint,
        waypoints: &[GeoPoint],
    ) -> PlanResult<(Vec<GeoPoint>, Vec<NodeId>)> {
        for p in std::iter::once(&start).chain(waypoints).chain(std::iter::once(&end)) {
            GeoPoint::try_new(p.lat, p.lon)?;
        }

        let ordered = order_waypoints(start, waypoints);

        let mut stops = Vec::with_capacity(ordered.len() + 2);
        for pos in std::iter::once(&start).chain(&ordered).chain(std::iter::once(&end)) {
            stops.push(self.index.nearest_node(*pos).map_err(PlanError::from_lookup)?);
        }
        Ok((ordered, stops))
    }

    /// Steps ③ and ④ for one strategy: route each consecutive pair of
    /// `stops` and stitch the segments.
    ///
    /// # Errors
    ///
    /// The first failing segment aborts the route; [`PlanError::NoPath`]
    /// names its index and endpoints.
    pub fn route_segments(&self, strategy: SearchStrategy, stops: &[NodeId]) -> PlanResult<RouteResult> {
        self.route_segments_with(strategy, stops, &self.call_cancellation())
    }

    fn route_segments_with(
        &self,
        strategy: SearchStrategy,
        stops:    &[NodeId],
        cancel:   &Cancellation,
    ) -> PlanResult<RouteResult> {
        if stops.len() < 2 {
            return Err(PlanError::InvalidInput(format!(
                "need at least 2 stops, got {}",
                stops.len()
            )));
        }

        let mut segments = Vec::with_capacity(stops.len() - 1);
        for (segment, pair) in stops.windows(2).enumerate() {
            let result = search(self.network, strategy, pair[0], pair[1], cancel)
                .map_err(|e| PlanError::in_segment(e, segment, strategy))?;
            tracing::trace!(
                %strategy, segment,
                from = %pair[0], to = %pair[1],
                cost = result.total_cost,
                "segment routed"
            );
            segments.push(result);
        }

        Ok(self.stitch(strategy, segments))
    }

    fn stitch(&self, strategy: SearchStrategy, segments: Vec<SearchResult>) -> RouteResult {
        let mut nodes: Vec<NodeId> = Vec::new();
        let mut total_cost = 0.0;
        let mut total_length_m = 0.0;

        for seg in &segments {
            // Each segment starts where the previous one ended.
            let skip = usize::from(nodes.last() == Some(&seg.source()));
            nodes.extend_from_slice(&seg.nodes[skip..]);
            total_cost += seg.total_cost;
            total_length_m += seg.total_length_m;
        }

        let positions = nodes.iter().map(|&n| self.network.position(n)).collect();
        RouteResult { strategy, nodes, positions, segments, total_cost, total_length_m }
    }

    /// Plan a route through `waypoints` with both strategies.
    ///
    /// # Errors
    ///
    /// - [`PlanError::InvalidInput`] for a malformed coordinate.
    /// - [`PlanError::NotFound`] if the network is empty.
    /// - [`PlanError::NoPath`] if any segment is unreachable.
    /// - [`PlanError::Cancelled`] if the token trips or the deadline passes.
    pub fn find_route(
        &self,
        start:     GeoPoint,
        end:       GeoPoint,
        waypoints: &[GeoPoint],
    ) -> PlanResult<RoutePlan> {
        let cancel = self.call_cancellation();
        let (ordered, stops) = self.resolve_stops(start, end, waypoints)?;

        #[cfg(not(feature = "parallel"))]
        let (dijkstra, astar) = (
            self.route_segments_with(SearchStrategy::Dijkstra, &stops, &cancel),
            self.route_segments_with(SearchStrategy::AStar, &stops, &cancel),
        );

        #[cfg(feature = "parallel")]
        let (dijkstra, astar) = rayon::join(
            || self.route_segments_with(SearchStrategy::Dijkstra, &stops, &cancel),
            || self.route_segments_with(SearchStrategy::AStar, &stops, &cancel),
        );

        // Dijkstra's error wins so the reported failure does not depend on
        // thread timing.
        let (dijkstra, astar) = (dijkstra?, astar?);

        tracing::debug!(
            stops = stops.len(),
            dijkstra_cost = dijkstra.total_cost,
            astar_cost = astar.total_cost,
            dijkstra_nodes = dijkstra.nodes.len(),
            astar_nodes = astar.nodes.len(),
            "route planned"
        );

        Ok(RoutePlan { dijkstra, astar, waypoints: ordered, stops })
    }

    /// Plan several independent requests, each with its own deadline.
    /// Results are in request order.
    pub fn find_routes(&self, requests: &[RouteRequest]) -> Vec<PlanResult<RoutePlan>> {
        let plan = |r: &RouteRequest| self.find_route(r.start, r.end, &r.waypoints);

        #[cfg(not(feature = "parallel"))]
        let out = requests.iter().map(plan).collect();

        #[cfg(feature = "parallel")]
        let out = {
            use rayon::prelude::*;
            requests.par_iter().map(plan).collect()
        };

        out
    }
}

/// Plan a route with a fresh, never-cancelled planner.
pub fn find_route(
    network:   &RoadNetwork,
    index:     &GraphIndex,
    start:     GeoPoint,
    end:       GeoPoint,
    waypoints: &[GeoPoint],
) -> PlanResult<RoutePlan> {
    RoutePlanner::new(network, index)?.find_route(start, end, waypoints)
}
