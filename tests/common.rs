//! Common test utilities for building storage records and documents.
use henkan::prelude::*;
use serde_json::{Value, json};

/// Builds a record from a JSON object literal.
#[allow(dead_code)]
pub fn record(value: Value) -> Record {
    Record::from_map(
        value
            .as_object()
            .cloned()
            .expect("record builder needs a JSON object"),
    )
}

/// A flow container record.
#[allow(dead_code)]
pub fn flow(id: &str) -> Record {
    record(json!({ "id": id, "kind": "container", "name": id }))
}

/// An ordinary node with explicit wires.
#[allow(dead_code)]
pub fn node(id: &str, scope: &str, wires: Value) -> Record {
    record(json!({
        "id": id,
        "kind": "worker",
        "scope": scope,
        "x": 100,
        "y": 120,
        "wires": wires,
    }))
}

/// A group record.
#[allow(dead_code)]
pub fn group(id: &str, scope: &str) -> Record {
    record(json!({
        "id": id,
        "kind": "group",
        "scope": scope,
        "name": "a group",
        "x": 10,
        "y": 20,
        "w": 300,
        "h": 150,
    }))
}

/// A subflow template with the given port cardinalities and internal
/// record list.
#[allow(dead_code)]
pub fn template(id: &str, in_ports: usize, out_ports: usize, internals: Value) -> Record {
    let bindings = |n: usize| -> Vec<Value> {
        (0..n).map(|_| json!({ "internalWires": [] })).collect()
    };
    record(json!({
        "id": id,
        "kind": "subflow-template",
        "name": id,
        "portMap": { "in": bindings(in_ports), "out": bindings(out_ports) },
        "records": internals,
    }))
}

/// A subflow instance pointing at `template_id`.
#[allow(dead_code)]
pub fn instance(id: &str, scope: &str, template_id: &str) -> Record {
    record(json!({
        "id": id,
        "kind": format!("template:{template_id}"),
        "scope": scope,
        "x": 40,
        "y": 40,
        "wires": [[]],
    }))
}

/// The canonical three-node flow: `a` fans out to `b` and `c` on port 0 and
/// declares an empty second port.
#[allow(dead_code)]
pub fn simple_flow() -> Vec<Record> {
    vec![
        flow("f1"),
        node("a", "f1", json!([["b", "c"], []])),
        node("b", "f1", json!([[]])),
        node("c", "f1", json!([[]])),
    ]
}

/// A document with a two-node template, its dual top-level copies, an
/// instance placed on flow `f1`, and three upstream nodes feeding the
/// instance.
#[allow(dead_code)]
pub fn template_flow(in_ports: usize) -> Vec<Record> {
    let internals = json!([
        { "id": "i1", "kind": "worker", "x": 50, "y": 60, "wires": [["i2"]] },
        { "id": "i2", "kind": "worker", "x": 150, "y": 60, "wires": [[]] },
    ]);
    vec![
        flow("f1"),
        template("t1", in_ports, 1, internals),
        record(json!({ "id": "i1", "kind": "worker", "scope": "t1", "x": 50, "y": 60, "wires": [["i2"]] })),
        record(json!({ "id": "i2", "kind": "worker", "scope": "t1", "x": 150, "y": 60, "wires": [[]] })),
        instance("s1", "f1", "t1"),
        node("u1", "f1", json!([["s1"]])),
        node("u2", "f1", json!([["s1"]])),
        node("u3", "f1", json!([["s1"]])),
    ]
}

/// Index of the record with `id` in a saved record list.
#[allow(dead_code)]
pub fn position_of(records: &[Record], id: &str) -> usize {
    records
        .iter()
        .position(|r| r.id() == Some(id))
        .unwrap_or_else(|| panic!("record '{id}' missing from output"))
}
