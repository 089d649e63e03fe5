//! The `OutputWriter` trait implemented by all backend writers.

use tr_planner::RoutePlan;

use crate::{IncidentRow, OutputResult, RoutePointRow, RouteSummaryRow};

/// Trait implemented by output backends.
pub trait OutputWriter {
    /// Write a batch of polyline vertices.
    fn write_points(&mut self, rows: &[RoutePointRow]) -> OutputResult<()>;

    /// Write one route summary row.
    fn write_summary(&mut self, row: &RouteSummaryRow) -> OutputResult<()>;

    /// Write one traffic incident row.
    fn write_incident(&mut self, row: &IncidentRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write both routes of `plan`: polyline rows then one summary row per
    /// strategy, Dijkstra first.
    fn write_plan(&mut self, plan: &RoutePlan, astar_offset_deg: f64) -> OutputResult<()> {
        self.write_points(&RoutePointRow::from_plan(plan, astar_offset_deg))?;
        self.write_summary(&RouteSummaryRow::from(&plan.dijkstra))?;
        self.write_summary(&RouteSummaryRow::from(&plan.astar))?;
        Ok(())
    }
}
