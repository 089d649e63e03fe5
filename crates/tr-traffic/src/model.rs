//! Traffic sampling and effective-cost computation.
//!
//! Edges are visited in `EdgeId` order and each draws, in this order:
//! speed, roadblock, jam, accident.  All four are drawn even when a
//! probability is 0 or 1, so changing one probability does not shift the
//! random stream seen by later edges.

use tr_core::{EdgeId, SimRng};
use tr_spatial::{RoadNetwork, TrafficState};

use crate::observer::{Incident, NoopTrafficObserver, TrafficEvent, TrafficObserver, TrafficSummary};
use crate::{TrafficConfig, TrafficError, TrafficResult};

/// Jam speeds at or below this are treated as standstill.
const STANDSTILL_KMH: f64 = 1e-9;

/// Effective cost of an edge of `length_m` under `state`.
///
/// Multipliers are applied to the running cost one after another
/// (roadblock, then jam, then accident).  Each is `>= 1` for a validated
/// config, so the result is never below `length_m`.
pub fn effective_cost(length_m: f64, state: &TrafficState, config: &TrafficConfig) -> f64 {
    let mut cost = length_m;
    if state.roadblock {
        cost *= config.roadblock_penalty;
    }
    if state.jam {
        cost *= if state.speed_kmh > STANDSTILL_KMH {
            config.baseline_speed_kmh / state.speed_kmh
        } else {
            config.roadblock_penalty
        };
    }
    if state.accident {
        cost *= config.accident_penalty;
    }
    cost
}

/// Assigns simulated traffic to every edge of a network.
#[derive(Clone, Debug)]
pub struct TrafficModel {
    config: TrafficConfig,
}

impl TrafficModel {
    /// # Errors
    ///
    /// [`TrafficError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: TrafficConfig) -> TrafficResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrafficConfig {
        &self.config
    }

    /// Largest multiplier [`effective_cost`] can apply under this config.
    fn worst_case_factor(&self) -> f64 {
        let c = &self.config;
        let jam = c.roadblock_penalty.max(c.baseline_speed_kmh / c.min_speed_kmh.max(STANDSTILL_KMH));
        c.roadblock_penalty * jam * c.accident_penalty
    }

    /// Draw one edge's traffic state.
    pub fn sample(&self, rng: &mut SimRng) -> TrafficState {
        let c = &self.config;
        TrafficState {
            speed_kmh: rng.gen_range(c.min_speed_kmh..=c.max_speed_kmh),
            roadblock: rng.gen_bool(c.roadblock_probability),
            jam:       rng.gen_bool(c.jam_probability),
            accident:  rng.gen_bool(c.accident_probability),
        }
    }

    pub fn apply(&self, network: RoadNetwork, rng: &mut SimRng) -> TrafficResult<RoadNetwork> {
        self.apply_with_observer(network, rng, &mut NoopTrafficObserver)
    }

    /// Sample traffic for every edge and return the network with
    /// `edge_traffic` and `edge_cost` filled in.
    ///
    /// Costs are always derived from `edge_length_m`, so applying a model
    /// to an already-trafficked network replaces the old traffic rather
    /// than compounding it.
    ///
    /// # Errors
    ///
    /// [`TrafficError::InvalidInput`] if the edge arrays disagree in length,
    /// an edge length is not finite and positive, or a length could overflow
    /// to infinity under the worst combination of incidents.
    pub fn apply_with_observer<O: TrafficObserver>(
        &self,
        mut network: RoadNetwork,
        rng:         &mut SimRng,
        observer:    &mut O,
    ) -> TrafficResult<RoadNetwork> {
        check_network(&network, self.worst_case_factor())?;

        let edge_count = network.edge_count();
        let mut summary = TrafficSummary { seed: rng.seed(), edges: edge_count, ..Default::default() };
        let mut traffic = Vec::with_capacity(edge_count);
        let mut costs   = Vec::with_capacity(edge_count);

        for i in 0..edge_count {
            let state = self.sample(rng);
            let cost  = effective_cost(network.edge_length_m[i], &state, &self.config);
            debug_assert!(cost >= network.edge_length_m[i]);

            if state.is_clear() {
                summary.clear += 1;
            } else {
                let edge = EdgeId(i as u32);
                let from = network.edge_from[i];
                let to   = network.edge_to[i];
                let mut emit = |incident: Incident| {
                    tracing::trace!(%edge, %from, %to, ?incident, cost, "traffic incident");
                    observer.on_event(&TrafficEvent { edge, from, to, incident, cost });
                };
                if state.roadblock {
                    summary.roadblocks += 1;
                    emit(Incident::Roadblock);
                }
                if state.jam {
                    summary.jams += 1;
                    emit(Incident::Jam { speed_kmh: state.speed_kmh });
                }
                if state.accident {
                    summary.accidents += 1;
                    emit(Incident::Accident);
                }
            }

            traffic.push(Some(state));
            costs.push(cost);
        }

        network.edge_traffic = traffic;
        network.edge_cost    = costs;

        tracing::debug!(
            seed = summary.seed,
            edges = summary.edges,
            clear = summary.clear,
            roadblocks = summary.roadblocks,
            jams = summary.jams,
            accidents = summary.accidents,
            "traffic applied"
        );
        observer.on_complete(&summary);
        Ok(network)
    }
}

/// Apply the default traffic model to `raw`.
///
/// `seed = None` draws a fresh seed, so rebuilding the same place gives a
/// different traffic instance each time; pass `Some(seed)` to reproduce one.
pub fn build_traffic_graph(raw: RoadNetwork, seed: Option<u64>) -> TrafficResult<RoadNetwork> {
    let model = TrafficModel::new(TrafficConfig::default())?;
    let mut rng = SimRng::from_optional_seed(seed);
    model.apply(raw, &mut rng)
}

fn check_network(network: &RoadNetwork, max_factor: f64) -> TrafficResult<()> {
    let n = network.edge_count();
    if network.edge_from.len() != n || network.edge_length_m.len() != n {
        return Err(TrafficError::InvalidInput(format!(
            "edge arrays disagree: {} targets, {} sources, {} lengths",
            n,
            network.edge_from.len(),
            network.edge_length_m.len()
        )));
    }
    if let Some((i, len)) = network
        .edge_length_m
        .iter()
        .enumerate()
        .find(|(_, l)| !(l.is_finite() && **l > 0.0))
    {
        return Err(TrafficError::InvalidInput(format!("edge {i} has invalid length {len}")));
    }
    if let Some((i, len)) = network
        .edge_length_m
        .iter()
        .enumerate()
        .find(|(_, l)| !(**l * max_factor).is_finite())
    {
        return Err(TrafficError::InvalidInput(format!(
            "edge {i} length {len} overflows under penalty factor {max_factor}"
        )));
    }
    Ok(())
}
