//! Observer hooks for traffic sampling.
//!
//! The model reports every incident it places and a summary at the end,
//! instead of printing.  Pass [`NoopTrafficObserver`] when nothing needs
//! collecting, or [`EventLog`] to keep everything.

use tr_core::{EdgeId, NodeId};

/// One condition placed on an edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Incident {
    Roadblock,
    Jam { speed_kmh: f64 },
    Accident,
}

/// An incident together with the edge it was placed on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrafficEvent {
    pub edge:     EdgeId,
    pub from:     NodeId,
    pub to:       NodeId,
    pub incident: Incident,
    /// Effective cost of the edge once all its incidents are applied.
    pub cost:     f64,
}

/// Counts for one traffic pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrafficSummary {
    /// Seed that reproduces this pass.
    pub seed:       u64,
    pub edges:      usize,
    pub clear:      usize,
    pub roadblocks: usize,
    pub jams:       usize,
    pub accidents:  usize,
}

impl TrafficSummary {
    /// Total incidents; an edge with several conditions counts once per
    /// condition.
    pub fn incidents(&self) -> usize {
        self.roadblocks + self.jams + self.accidents
    }
}

/// Callbacks invoked by [`TrafficModel`][crate::TrafficModel] while it
/// samples a network.
///
/// All methods have default no-op implementations.
pub trait TrafficObserver {
    /// Called once per incident, in `EdgeId` order.
    fn on_event(&mut self, _event: &TrafficEvent) {}

    /// Called once after the last edge.
    fn on_complete(&mut self, _summary: &TrafficSummary) {}
}

pub struct NoopTrafficObserver;

impl TrafficObserver for NoopTrafficObserver {}

/// Keeps every event and the final summary.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events:  Vec<TrafficEvent>,
    pub summary: Option<TrafficSummary>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of one kind, e.g. `log.count(|i| matches!(i, Incident::Jam { .. }))`.
    pub fn count(&self, pred: impl Fn(&Incident) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.incident)).count()
    }
}

impl TrafficObserver for EventLog {
    fn on_event(&mut self, event: &TrafficEvent) {
        self.events.push(*event);
    }

    fn on_complete(&mut self, summary: &TrafficSummary) {
        self.summary = Some(*summary);
    }
}
