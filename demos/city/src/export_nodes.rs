//! Export node coordinates and traffic-weighted edges for the map layer.
//!
//! Writes two JSON files to `output/city/`:
//!   - `node_coords.json`  : `[{node_id, lat, lon}, …]`
//!   - `network_edges.json`: `[{from_node, to_node, length_m, cost, roadblock, jam, accident}, …]`
//!
//! Run with: `cargo run -p city --bin export_nodes [SEED]`

mod network;

use std::fs;

use anyhow::{Context, Result};
use serde_json::json;

use tr_traffic::build_traffic_graph;

use network::build_network;

fn main() -> Result<()> {
    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>().with_context(|| format!("bad seed {s:?}")))
        .transpose()?;

    let (raw, _nodes) = build_network()?;
    let net = build_traffic_graph(raw, seed)?;

    fs::create_dir_all("output/city")?;

    // ── node_coords.json ──────────────────────────────────────────────────────
    let node_coords: Vec<serde_json::Value> = net
        .node_pos
        .iter()
        .enumerate()
        .map(|(i, pos)| json!({ "node_id": i, "lat": pos.lat, "lon": pos.lon }))
        .collect();

    fs::write("output/city/node_coords.json", serde_json::to_string_pretty(&node_coords)?)?;
    println!("Wrote output/city/node_coords.json ({} nodes)", node_coords.len());

    // ── network_edges.json ────────────────────────────────────────────────────
    let edges: Vec<serde_json::Value> = net
        .edges()
        .map(|e| {
            let i = e.index();
            let (roadblock, jam, accident) = net.edge_traffic[i]
                .map_or((false, false, false), |t| (t.roadblock, t.jam, t.accident));
            json!({
                "from_node": net.edge_from[i].0,
                "to_node":   net.edge_to[i].0,
                "length_m":  net.edge_length_m[i],
                "cost":      net.edge_cost[i],
                "roadblock": roadblock,
                "jam":       jam,
                "accident":  accident,
            })
        })
        .collect();

    fs::write("output/city/network_edges.json", serde_json::to_string_pretty(&edges)?)?;
    println!("Wrote output/city/network_edges.json ({} edges)", edges.len());

    Ok(())
}
