//! `tr-planner`: multi-waypoint route planning over a traffic-weighted
//! road network.
//!
//! Every request is answered twice, once by Dijkstra and once by A*, over
//! the same effective costs, so the two can be compared side by side.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Runs both strategies, and batch requests, on Rayon.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tr_planner::{Snapshot, SnapshotCell};
//! use tr_traffic::{TrafficConfig, TrafficModel};
//!
//! let model = TrafficModel::new(TrafficConfig::default())?;
//! let cell  = SnapshotCell::new(Snapshot::with_traffic(raw, &model, None)?);
//!
//! let plan = cell.load().find_route(start, end, &waypoints)?;
//! println!("dijkstra {:.0} m, A* {:.0} m", plan.dijkstra.total_cost, plan.astar.total_cost);
//! ```

pub mod error;
pub mod planner;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{PlanError, PlanResult};
pub use planner::{find_route, order_waypoints, RoutePlan, RoutePlanner, RouteRequest, RouteResult};
pub use snapshot::{Snapshot, SnapshotCell};
