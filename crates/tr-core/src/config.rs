//! Per-request planner configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and handed to the planner and traffic builder.

use std::time::Duration;

/// Knobs for a route-planning run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Wall-clock budget for one `find_route` call.  `None` = unbounded.
    pub deadline_ms: Option<u64>,

    /// Seed for the traffic simulation.  `None` draws a fresh seed per
    /// network build, so the same place yields different traffic each time.
    pub traffic_seed: Option<u64>,
}

impl PlannerConfig {
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
