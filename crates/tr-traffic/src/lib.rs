//! `tr-traffic`: simulated traffic over a road network.
//!
//! Every directed edge gets a sampled speed and three independent incident
//! flags (roadblock, jam, accident).  Each present condition multiplies the
//! edge's base length; the product is the effective cost all searches use.
//! This crate is the only place effective costs are written.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tr_traffic::build_traffic_graph;
//!
//! let raw = builder.build()?;
//! let network = build_traffic_graph(raw, Some(42))?;
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | [`config`]   | `TrafficConfig` and its validation                   |
//! | [`model`]    | `TrafficModel`, `build_traffic_graph`, `effective_cost` |
//! | [`observer`] | `TrafficObserver`, `TrafficEvent`, `EventLog`        |
//! | [`error`]    | `TrafficError`, `TrafficResult<T>`                   |

pub mod config;
pub mod error;
pub mod model;
pub mod observer;


pub use config::TrafficConfig;
pub use error::{TrafficError, TrafficResult};
pub use model::{build_traffic_graph, effective_cost, TrafficModel};
pub use observer::{EventLog, Incident, NoopTrafficObserver, TrafficEvent, TrafficObserver, TrafficSummary};
