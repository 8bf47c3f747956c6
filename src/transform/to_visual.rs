//! Storage → visual: materializes one scope of the flat record list as an
//! explicit node/edge/group graph.

use ahash::{AHashMap, AHashSet};

use crate::graph::{Position, VisualEdge, VisualGraph, VisualNode};
use crate::groups::extract_groups;
use crate::record::{Record, RecordRole, classify};
use crate::subflow::{PortAssigner, TemplateIndex};
use crate::wires::build_adjacency;

/// Derives the visual graph for one scope (a flow container or a template).
///
/// Deterministic for identical input: nodes, edges, and groups come out in
/// document order with stable derived ids, so repeated calls yield
/// structurally identical graphs and snapshots compare cleanly. Dangling
/// wire references are an expected condition (they point into other scopes
/// or at config-only records); they are filtered and counted, never raised.
pub fn to_visual(records: &[Record], scope_id: &str) -> VisualGraph {
    let templates = TemplateIndex::from_records(records);
    let source = select_scope_records(records, scope_id, &templates);

    let groups = extract_groups(&source);
    let node_records: Vec<&Record> = source
        .iter()
        .filter(|r| classify(r) != RecordRole::Group)
        .collect();

    let mut nodes = Vec::with_capacity(node_records.len());
    for record in &node_records {
        let Some(id) = record.id() else {
            log::debug!("scope '{scope_id}': skipping record without an id");
            continue;
        };
        let port_count = match templates.resolve_instance(record) {
            Some(template) => template.out_port_count(),
            None => build_adjacency(record).len(),
        };
        nodes.push(VisualNode {
            id: id.to_string(),
            kind: record.kind().unwrap_or_default().to_string(),
            position: Position {
                x: record.x().unwrap_or(0.0),
                y: record.y().unwrap_or(0.0),
            },
            port_count,
            container_id: record.group_ref().map(str::to_string),
            payload: (*record).clone(),
        });
    }

    let edges = derive_edges(&node_records, &nodes, &templates, scope_id);

    VisualGraph {
        nodes,
        edges,
        groups,
    }
}

/// Picks the records visually placed inside `scope_id`.
///
/// For a template scope the internal record list is authoritative, plus any
/// top-level groups pointing at the template (groups cannot live inside a
/// template body, see the group resolver). For a flow scope it is every
/// non-template, non-container record whose scope field matches.
fn select_scope_records(
    records: &[Record],
    scope_id: &str,
    templates: &TemplateIndex,
) -> Vec<Record> {
    if let Some(template) = templates.get(scope_id) {
        let mut source = template.internal_records.clone();
        source.extend(
            records
                .iter()
                .filter(|r| classify(r) == RecordRole::Group && r.scope() == Some(scope_id))
                .cloned(),
        );
        return source;
    }
    records
        .iter()
        .filter(|r| !matches!(classify(r), RecordRole::Template | RecordRole::Container))
        .filter(|r| r.scope() == Some(scope_id))
        .cloned()
        .collect()
}

fn derive_edges(
    node_records: &[&Record],
    nodes: &[VisualNode],
    templates: &TemplateIndex,
    scope_id: &str,
) -> Vec<VisualEdge> {
    let node_ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let by_id: AHashMap<&str, &Record> = node_records
        .iter()
        .copied()
        .filter_map(|r| r.id().map(|id| (id, r)))
        .collect();

    // One assigner for the whole pass: edges arriving at the same
    // multi-input instance from different sources share its counter.
    let mut assigner = PortAssigner::new();
    let mut seq: AHashMap<String, usize> = AHashMap::new();
    let mut edges = Vec::new();
    let mut dropped = 0usize;

    for record in node_records {
        let Some(source_id) = record.id() else {
            continue;
        };
        if !node_ids.contains(source_id) {
            continue;
        }
        for (port, targets) in build_adjacency(record).iter().enumerate() {
            for target_id in targets {
                if !node_ids.contains(target_id.as_str()) {
                    dropped += 1;
                    continue;
                }
                let in_ports = by_id
                    .get(target_id.as_str())
                    .and_then(|r| templates.resolve_instance(r))
                    .map_or(1, |t| t.in_port_count());
                let target_port = assigner.next_input(target_id, in_ports);

                let base =
                    VisualEdge::derive_id(source_id, port, target_id, target_port, 0);
                let n = seq.entry(base).or_insert(0);
                let id =
                    VisualEdge::derive_id(source_id, port, target_id, target_port, *n);
                *n += 1;

                edges.push(VisualEdge {
                    id,
                    source_id: source_id.to_string(),
                    source_port: port,
                    target_id: target_id.clone(),
                    target_port,
                });
            }
        }
    }

    if dropped > 0 {
        log::debug!("scope '{scope_id}': filtered {dropped} dangling wire reference(s)");
    }
    edges
}
