//! Plain data row types written by output backends.

use tr_planner::{RoutePlan, RouteResult};
use tr_spatial::SearchStrategy;
use tr_traffic::{Incident, TrafficEvent};

/// One vertex of a route polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePointRow {
    pub strategy: SearchStrategy,
    /// Position along the stitched path, from 0.
    pub seq:      u32,
    pub lat:      f64,
    pub lon:      f64,
}

/// Totals for one strategy's route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummaryRow {
    pub strategy: SearchStrategy,
    pub segments: u32,
    pub nodes:    u32,
    pub cost:     f64,
    pub length_m: f64,
}

/// One traffic incident on one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentRow {
    pub edge:      u32,
    pub from:      u32,
    pub to:        u32,
    pub incident:  &'static str,
    /// Sampled speed for jams; `None` for the other incident kinds.
    pub speed_kmh: Option<f64>,
    /// Effective cost of the edge after all of its incidents.
    pub cost:      f64,
}

impl RoutePointRow {
    /// Polyline rows for `route`, with every position shifted by
    /// `offset_deg` (0 for none).
    pub fn from_route(route: &RouteResult, offset_deg: f64) -> Vec<Self> {
        route
            .offset(offset_deg)
            .into_iter()
            .enumerate()
            .map(|(seq, p)| RoutePointRow {
                strategy: route.strategy,
                seq:      seq as u32,
                lat:      p.lat,
                lon:      p.lon,
            })
            .collect()
    }

    /// Rows for both routes of `plan`; the A* polyline is shifted by
    /// `astar_offset_deg` so overlapping routes stay distinguishable.
    pub fn from_plan(plan: &RoutePlan, astar_offset_deg: f64) -> Vec<Self> {
        let mut rows = Self::from_route(&plan.dijkstra, 0.0);
        rows.extend(Self::from_route(&plan.astar, astar_offset_deg));
        rows
    }
}

impl From<&RouteResult> for RouteSummaryRow {
    fn from(route: &RouteResult) -> Self {
        Self {
            strategy: route.strategy,
            segments: route.segments.len() as u32,
            nodes:    route.nodes.len() as u32,
            cost:     route.total_cost,
            length_m: route.total_length_m,
        }
    }
}

impl From<&TrafficEvent> for IncidentRow {
    fn from(ev: &TrafficEvent) -> Self {
        let (incident, speed_kmh) = match ev.incident {
            Incident::Roadblock           => ("roadblock", None),
            Incident::Jam { speed_kmh }   => ("jam", Some(speed_kmh)),
            Incident::Accident            => ("accident", None),
        };
        Self {
            edge: ev.edge.0,
            from: ev.from.0,
            to:   ev.to.0,
            incident,
            speed_kmh,
            cost: ev.cost,
        }
    }
}
