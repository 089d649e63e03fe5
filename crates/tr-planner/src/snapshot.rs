//! Immutable network/index snapshots and the cell that swaps them.
//!
//! A location change builds a complete new [`Snapshot`] off to the side and
//! then replaces the current one in a single [`SnapshotCell::replace`].
//! Readers clone the `Arc` and keep planning against the snapshot they
//! loaded, even if a replacement lands mid-request.

use std::sync::{Arc, PoisonError, RwLock};

use tr_core::{GeoPoint, SimRng};
use tr_spatial::{build_index, GraphIndex, RoadNetwork};
use tr_traffic::{TrafficModel, TrafficObserver};

use crate::{PlanResult, RoutePlan, RoutePlanner};

/// A traffic-weighted network and its spatial index.
#[derive(Debug)]
pub struct Snapshot {
    network: RoadNetwork,
    index:   GraphIndex,
}

impl Snapshot {
    /// Index `network` as-is (its costs are used unchanged).
    pub fn new(network: RoadNetwork) -> Self {
        let index = build_index(&network);
        Self { network, index }
    }

    /// Apply `model` to a raw network, then index it.
    pub fn with_traffic(raw: RoadNetwork, model: &TrafficModel, seed: Option<u64>) -> PlanResult<Self> {
        let mut rng = SimRng::from_optional_seed(seed);
        Ok(Self::new(model.apply(raw, &mut rng)?))
    }

    /// As [`with_traffic`](Self::with_traffic), reporting incidents to `observer`.
    pub fn with_traffic_observed<O: TrafficObserver>(
        raw:      RoadNetwork,
        model:    &TrafficModel,
        seed:     Option<u64>,
        observer: &mut O,
    ) -> PlanResult<Self> {
        let mut rng = SimRng::from_optional_seed(seed);
        Ok(Self::new(model.apply_with_observer(raw, &mut rng, observer)?))
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    pub fn planner(&self) -> RoutePlanner<'_> {
        RoutePlanner::from_snapshot(self)
    }

    pub fn find_route(&self, start: GeoPoint, end: GeoPoint, waypoints: &[GeoPoint]) -> PlanResult<RoutePlan> {
        self.planner().find_route(start, end, waypoints)
    }
}

impl<'a> RoutePlanner<'a> {
    /// A snapshot's index always matches its network, so this cannot fail.
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        RoutePlanner::new_unchecked(&snapshot.network, &snapshot.index)
    }
}

/// Holder of the current snapshot.
#[derive(Debug)]
pub struct SnapshotCell {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotCell {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)) }
    }

    /// The snapshot current at the time of the call.
    pub fn load(&self) -> Arc<Snapshot> {
        // The lock only guards an `Arc` clone/swap, so a poisoned lock still
        // holds a complete snapshot.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `snapshot` and return the one it replaced.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
