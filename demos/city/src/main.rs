//! city: end-to-end demo for the traffic_router engine.
//!
//! Builds a synthetic grid around Kennesaw, GA, applies simulated traffic,
//! and plans one request with both Dijkstra and A*.  Routes and traffic
//! incidents are written as CSV to `output/city/` for a map renderer.
//!
//! ```text
//! cargo run -p city -- [CONFIG.json] ["lat,lon;lat,lon;…"]
//! RUST_LOG=tr_traffic=trace cargo run -p city
//! ```

mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tr_core::{parse_waypoints, GeoPoint, PlannerConfig};
use tr_output::{CsvWriter, IncidentOutputObserver, OutputWriter};
use tr_planner::{RoutePlan, Snapshot, SnapshotCell};
use tr_traffic::{TrafficConfig, TrafficEvent, TrafficModel, TrafficObserver, TrafficSummary};

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/city";

/// Shift applied to the A* polyline so it stays visible over Dijkstra's.
const ASTAR_OFFSET_DEG: f64 = 1e-5;

/// Used when no waypoints are given on the command line.
const DEFAULT_WAYPOINTS: &str = "34.0300,-84.6250;34.0180,-84.6080";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    planner: PlannerConfig,
    traffic: TrafficConfig,
}

fn load_config(path: Option<&str>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

// ── Observer wrapper to keep the summary ─────────────────────────────────────

struct SummaryObserver<O: TrafficObserver> {
    inner:   O,
    summary: Option<TrafficSummary>,
}

impl<O: TrafficObserver> SummaryObserver<O> {
    fn new(inner: O) -> Self {
        Self { inner, summary: None }
    }
}

impl<O: TrafficObserver> TrafficObserver for SummaryObserver<O> {
    fn on_event(&mut self, event: &TrafficEvent) {
        self.inner.on_event(event);
    }

    fn on_complete(&mut self, summary: &TrafficSummary) {
        self.summary = Some(*summary);
        self.inner.on_complete(summary);
    }
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_plan(plan: &RoutePlan) {
    println!("{:<10} {:>8} {:>8} {:>12} {:>12}", "Strategy", "Segments", "Nodes", "Cost", "Length (m)");
    println!("{}", "-".repeat(54));
    for route in [&plan.dijkstra, &plan.astar] {
        println!(
            "{:<10} {:>8} {:>8} {:>12.1} {:>12.1}",
            route.strategy.as_str(),
            route.segments.len(),
            route.nodes.len(),
            route.total_cost,
            route.total_length_m,
        );
    }
    if plan.astar.total_cost > plan.dijkstra.total_cost {
        println!("(A* cost above Dijkstra: heuristic overestimated on a slow edge)");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("city=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let waypoints = parse_waypoints(args.get(1).map_or(DEFAULT_WAYPOINTS, String::as_str))?;

    println!("=== city: traffic_router demo ===");
    println!("Centre: {}  |  Waypoints: {}", network::CENTRE, waypoints.len());
    println!();

    // 1. Road network.
    let (raw, [south_west, north_east, _centre]) = build_network()?;
    println!("Road network: {} nodes, {} edges", raw.node_count(), raw.edge_count());
    let start: GeoPoint = raw.position(south_west);
    let end:   GeoPoint = raw.position(north_east);

    // 2. Traffic, with incidents streamed to CSV.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let model = TrafficModel::new(config.traffic)?;
    let mut obs = SummaryObserver::new(IncidentOutputObserver::new(writer));
    let snapshot = Snapshot::with_traffic_observed(raw, &model, config.planner.traffic_seed, &mut obs)?;
    if let Some(e) = obs.inner.take_error() {
        return Err(e).context("writing traffic incidents");
    }
    if let Some(s) = obs.summary {
        println!(
            "Traffic (seed {}): {} clear, {} roadblocks, {} jams, {} accidents",
            s.seed, s.clear, s.roadblocks, s.jams, s.accidents
        );
    }
    let cell = SnapshotCell::new(snapshot);

    // 3. Plan.
    let current = cell.load();
    let t0 = Instant::now();
    let plan = current.planner().with_config(&config.planner).find_route(start, end, &waypoints)?;
    tracing::info!(elapsed_ms = t0.elapsed().as_secs_f64() * 1e3, "route planned");
    println!();
    print_plan(&plan);

    let mut writer = obs.inner.into_writer();
    writer.write_plan(&plan, ASTAR_OFFSET_DEG)?;
    writer.finish()?;
    println!();
    println!("Wrote {OUTPUT_DIR}/route_points.csv, route_summary.csv, traffic_incidents.csv");

    // 4. Fresh traffic for the same place; the old snapshot stays readable.
    let (raw, _) = build_network()?;
    let reseeded = config.planner.traffic_seed.map(|s| s.wrapping_add(1));
    let old = cell.replace(Snapshot::with_traffic(raw, &model, reseeded)?);
    let replan = cell.load().planner().with_config(&config.planner).find_route(start, end, &waypoints)?;
    println!();
    println!(
        "After traffic refresh: dijkstra {:.1} (was {:.1}), old snapshot still has {} nodes",
        replan.dijkstra.total_cost,
        plan.dijkstra.total_cost,
        old.network().node_count(),
    );

    Ok(())
}
