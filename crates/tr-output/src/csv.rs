//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `route_points.csv`
//! - `route_summary.csv`
//! - `traffic_incidents.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{IncidentRow, OutputResult, RoutePointRow, RouteSummaryRow};

/// Writes route and traffic output to three CSV files.
pub struct CsvWriter {
    points:    Writer<File>,
    summaries: Writer<File>,
    incidents: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` (which must exist) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut points = Writer::from_path(dir.join("route_points.csv"))?;
        points.write_record(["strategy", "seq", "lat", "lon"])?;

        let mut summaries = Writer::from_path(dir.join("route_summary.csv"))?;
        summaries.write_record(["strategy", "segments", "nodes", "cost", "length_m"])?;

        let mut incidents = Writer::from_path(dir.join("traffic_incidents.csv"))?;
        incidents.write_record(["edge", "from", "to", "incident", "speed_kmh", "cost"])?;

        tracing::debug!(dir = %dir.display(), "csv output opened");

        Ok(Self {
            points,
            summaries,
            incidents,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_points(&mut self, rows: &[RoutePointRow]) -> OutputResult<()> {
        for row in rows {
            self.points.write_record(&[
                row.strategy.as_str().to_owned(),
                row.seq.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &RouteSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.strategy.as_str().to_owned(),
            row.segments.to_string(),
            row.nodes.to_string(),
            row.cost.to_string(),
            row.length_m.to_string(),
        ])?;
        Ok(())
    }

    fn write_incident(&mut self, row: &IncidentRow) -> OutputResult<()> {
        self.incidents.write_record(&[
            row.edge.to_string(),
            row.from.to_string(),
            row.to.to_string(),
            row.incident.to_owned(),
            row.speed_kmh.map(|s| s.to_string()).unwrap_or_default(),
            row.cost.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.points.flush()?;
        self.summaries.flush()?;
        self.incidents.flush()?;
        Ok(())
    }
}
