//! `tr-output`: route and traffic export for an external map renderer.
//!
//! | Backend | Files created                                                      |
//! |---------|--------------------------------------------------------------------|
//! | CSV     | `route_points.csv`, `route_summary.csv`, `traffic_incidents.csv`   |
//!
//! Backends implement [`OutputWriter`].  Traffic incidents are captured while
//! the model runs through [`IncidentOutputObserver`], which implements
//! `tr_traffic::TrafficObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tr_output::{CsvWriter, IncidentOutputObserver, OutputWriter};
//!
//! let mut obs = IncidentOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! let snapshot = Snapshot::with_traffic_observed(raw, &model, seed, &mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//!
//! let mut writer = obs.into_writer();
//! writer.write_plan(&snapshot.find_route(start, end, &wps)?, 1e-5)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::IncidentOutputObserver;
pub use row::{IncidentRow, RoutePointRow, RouteSummaryRow};
pub use writer::OutputWriter;
