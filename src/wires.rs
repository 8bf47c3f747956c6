//! Positional wire bookkeeping, shared by both transform directions.
//!
//! The storage format encodes a node's outgoing connections as an ordered
//! array of target-id lists, one entry per output port index. Array position
//! *is* port identity to the consuming runtime, so the reverse direction must
//! emit dense arrays: a sparse or missing slot silently shifts every port
//! after it.

use itertools::Itertools;
use serde_json::Value;

use crate::graph::VisualEdge;
use crate::record::{Record, field};

/// Decodes a record's positional output adjacency.
///
/// Ports with no entry decode to an empty list, never to a missing slot.
/// Malformed entries (non-array ports, non-string targets) are skipped; the
/// decoder never fails.
pub fn build_adjacency(record: &Record) -> Vec<Vec<String>> {
    match record.get(field::WIRES) {
        Some(Value::Array(ports)) => ports
            .iter()
            .map(|port| match port {
                Value::Array(targets) => targets
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Re-synthesizes a node's output adjacency from the rendered edge set.
///
/// Groups all edges leaving `source_id` by source port and emits a dense
/// array up to `max(port) + 1`; ports without edges become empty arrays.
/// Edge order is preserved within a port. Self-loops pass through like any
/// other edge.
pub fn synthesize_wires(source_id: &str, edges: &[VisualEdge]) -> Vec<Vec<String>> {
    let by_port = edges
        .iter()
        .filter(|e| e.source_id == source_id)
        .map(|e| (e.source_port, e.target_id.clone()))
        .into_group_map();

    let len = by_port.keys().max().map_or(0, |max| max + 1);
    let mut by_port = by_port;
    (0..len)
        .map(|port| by_port.remove(&port).unwrap_or_default())
        .collect()
}

/// Merges wires from a node's prior record that are not represented as a
/// rendered edge but still point at a live id — typically a non-rendered
/// config-only record. Such wires must survive a save; dropping them would
/// corrupt the stored graph for a reference the editor simply does not draw.
///
/// `is_retained` decides which prior targets qualify. The array is extended
/// with empty slots where the prior adjacency is longer than the synthesized
/// one, keeping the density contract intact.
pub fn merge_retained_wires(
    wires: &mut Vec<Vec<String>>,
    prior: &[Vec<String>],
    mut is_retained: impl FnMut(&str) -> bool,
) {
    for (port, targets) in prior.iter().enumerate() {
        for target in targets {
            if !is_retained(target) {
                continue;
            }
            if wires.len() <= port {
                wires.resize_with(port + 1, Vec::new);
            }
            if !wires[port].contains(target) {
                wires[port].push(target.clone());
            }
        }
    }
}

/// Pads an adjacency out to the node's declared output port count. The
/// round trip must reproduce trailing empty ports exactly, and edge
/// synthesis alone only reaches the highest connected port.
pub fn pad_to_port_count(wires: &mut Vec<Vec<String>>, port_count: usize) {
    if wires.len() < port_count {
        wires.resize_with(port_count, Vec::new);
    }
}
