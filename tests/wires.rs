//! Wire index builder tests: positional decode, dense synthesis, and the
//! retained-wire merge.
mod common;
use common::{node, record};
use henkan::prelude::*;
use henkan::wires::{merge_retained_wires, pad_to_port_count};
use serde_json::json;

fn edge(source: &str, source_port: usize, target: &str) -> VisualEdge {
    VisualEdge {
        id: VisualEdge::derive_id(source, source_port, target, 0, 0),
        source_id: source.to_string(),
        source_port,
        target_id: target.to_string(),
        target_port: 0,
    }
}

#[test]
fn adjacency_decodes_positionally() {
    let r = node("a", "f1", json!([["b", "c"], [], ["d"]]));
    assert_eq!(
        build_adjacency(&r),
        vec![
            vec!["b".to_string(), "c".to_string()],
            vec![],
            vec!["d".to_string()],
        ]
    );
}

#[test]
fn adjacency_tolerates_malformed_entries() {
    let r = record(json!({
        "id": "a",
        "wires": [["b", 7, null], "not-a-port", [true]],
    }));
    assert_eq!(
        build_adjacency(&r),
        vec![vec!["b".to_string()], vec![], vec![]]
    );
    assert!(build_adjacency(&record(json!({ "id": "a" }))).is_empty());
    assert!(build_adjacency(&record(json!({ "id": "a", "wires": 3 }))).is_empty());
}

#[test]
fn synthesized_wires_are_dense() {
    // Edges on ports 0 and 2, nothing on port 1: the gap must be an empty
    // array, not a missing slot, or every later port shifts.
    let edges = vec![edge("a", 0, "b"), edge("a", 2, "c")];
    let wires = synthesize_wires("a", &edges);
    assert_eq!(wires.len(), 3);
    assert_eq!(wires[0], vec!["b".to_string()]);
    assert!(wires[1].is_empty());
    assert_eq!(wires[2], vec!["c".to_string()]);
}

#[test]
fn synthesized_wires_preserve_edge_order_within_a_port() {
    let edges = vec![edge("a", 0, "b"), edge("a", 0, "c"), edge("x", 0, "y")];
    assert_eq!(
        synthesize_wires("a", &edges),
        vec![vec!["b".to_string(), "c".to_string()]]
    );
}

#[test]
fn no_edges_synthesizes_an_empty_adjacency() {
    assert!(synthesize_wires("a", &[]).is_empty());
}

#[test]
fn self_loops_pass_through() {
    let edges = vec![edge("a", 0, "a")];
    assert_eq!(synthesize_wires("a", &edges), vec![vec!["a".to_string()]]);
}

#[test]
fn retained_merge_keeps_unrendered_targets_and_extends() {
    let mut wires = vec![vec!["b".to_string()]];
    let prior = vec![
        vec!["b".to_string(), "cfg".to_string()],
        vec![],
        vec!["cfg2".to_string()],
    ];
    merge_retained_wires(&mut wires, &prior, |t| t.starts_with("cfg"));
    assert_eq!(wires[0], vec!["b".to_string(), "cfg".to_string()]);
    assert!(wires[1].is_empty());
    assert_eq!(wires[2], vec!["cfg2".to_string()]);
}

#[test]
fn retained_merge_never_duplicates() {
    let mut wires = vec![vec!["cfg".to_string()]];
    let prior = vec![vec!["cfg".to_string()]];
    merge_retained_wires(&mut wires, &prior, |_| true);
    assert_eq!(wires, vec![vec!["cfg".to_string()]]);
}

#[test]
fn padding_restores_trailing_empty_ports() {
    let mut wires = vec![vec!["b".to_string()]];
    pad_to_port_count(&mut wires, 3);
    assert_eq!(wires.len(), 3);
    assert!(wires[1].is_empty() && wires[2].is_empty());

    // Never truncates.
    pad_to_port_count(&mut wires, 1);
    assert_eq!(wires.len(), 3);
}
