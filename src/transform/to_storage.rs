//! Visual → storage: decomposes a rendered graph, together with the
//! original untouched record set, back into the flat, order-constrained
//! record list that fully replaces the stored document.

use ahash::{AHashMap, AHashSet};

use crate::graph::{VisualGraph, VisualNode};
use crate::groups::group_to_record;
use crate::id;
use crate::record::{Record, RecordRole, TEMPLATE_REF_PREFIX, classify, field};
use crate::subflow::{RebuiltTemplate, TemplateIndex, rebuild_template};
use crate::wires::{build_adjacency, merge_retained_wires, pad_to_port_count, synthesize_wires};

/// Produces the complete replacement record list for a save of `scope_id`.
///
/// The store has no per-record patch semantics, so the output covers the
/// whole document: records belonging to other scopes pass through verbatim.
/// Final ordering is a correctness requirement of the consuming runtime's
/// load sequence: containers first, then template-internal records
/// (flattened and scoped), then template bodies, then everything else.
pub fn to_storage(graph: &VisualGraph, scope_id: &str, original: &[Record]) -> Vec<Record> {
    let templates = TemplateIndex::from_records(original);
    let prior: AHashMap<&str, &Record> = original
        .iter()
        .filter_map(|r| r.id().map(|id| (id, r)))
        .collect();

    let rendered: AHashSet<&str> = graph
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .chain(graph.groups.iter().map(|g| g.id.as_str()))
        .collect();

    // Ids that count as live targets when deciding which prior wires to
    // retain: everything the original document places in this scope,
    // rendered or not.
    let mut scope_members: AHashSet<String> = original
        .iter()
        .filter(|r| r.scope() == Some(scope_id))
        .filter_map(|r| r.id().map(str::to_string))
        .collect();
    if let Some(template) = templates.get(scope_id) {
        scope_members.extend(
            template
                .internal_records
                .iter()
                .filter_map(|r| r.id().map(str::to_string)),
        );
    }

    // Partition and reassemble the rendered nodes. A node whose resolved
    // scope names a template belongs to that template's body; everything
    // else is an ordinary top-level record.
    let mut by_template: AHashMap<String, Vec<Record>> = AHashMap::new();
    let mut ordinary: Vec<Record> = Vec::new();
    let mut touched: Vec<String> = Vec::new();
    if templates.contains(scope_id) {
        touched.push(scope_id.to_string());
    }

    for node in &graph.nodes {
        let node_scope = node
            .payload
            .scope()
            .map(str::to_string)
            .unwrap_or_else(|| scope_id.to_string());
        let record = reassemble_node(node, &node_scope, graph, &prior, &scope_members, &rendered);

        // An instance keeps its referenced template alive: the body must be
        // re-validated even when the template itself was not edited.
        if let Some(template_id) = node.kind.strip_prefix(TEMPLATE_REF_PREFIX)
            && !template_id.is_empty()
            && templates.contains(template_id)
            && !touched.iter().any(|t| t == template_id)
        {
            touched.push(template_id.to_string());
        }

        if templates.contains(&node_scope) {
            if !touched.iter().any(|t| t == &node_scope) {
                touched.push(node_scope.clone());
            }
            by_template.entry(node_scope).or_default().push(record);
        } else {
            ordinary.push(record);
        }
    }

    let group_records: Vec<Record> = graph
        .groups
        .iter()
        .map(|g| group_to_record(g, prior.get(g.id.as_str()).copied(), scope_id))
        .collect();

    let mut rebuilt: AHashMap<String, RebuiltTemplate> = AHashMap::new();
    for template_id in &touched {
        let Some(template) = templates.get(template_id) else {
            continue;
        };
        let reassembled = by_template.remove(template_id).unwrap_or_default();
        let internals = final_internals(&template.internal_records, &reassembled);
        rebuilt.insert(template_id.clone(), rebuild_template(template, &internals));
    }

    let mut output: Vec<Record> = Vec::new();

    // 1. Flow containers.
    for record in original {
        if classify(record) == RecordRole::Container {
            output.push(record.clone());
        }
    }

    // 2. Template-internal records, flattened and scoped, in document order.
    for template_id in templates.ids() {
        if let Some(rb) = rebuilt.get(template_id) {
            output.extend(rb.scoped_copies.iter().cloned());
        } else {
            // Untouched template: its existing scoped copies pass through.
            for record in original {
                if record.scope() == Some(template_id)
                    && !matches!(
                        classify(record),
                        RecordRole::Container | RecordRole::Template
                    )
                {
                    output.push(record.clone());
                }
            }
        }
    }

    // 3. Template bodies.
    for template_id in templates.ids() {
        match rebuilt.get(template_id) {
            Some(rb) => output.push(rb.body.clone()),
            None => {
                if let Some(template) = templates.get(template_id) {
                    output.push(template.record.clone());
                }
            }
        }
    }

    // 4. Remaining ordinary records: this scope's groups and nodes, then
    // everything the edit never looked at (other flows, unscoped config
    // records, non-rendered records of this scope).
    output.extend(group_records);
    output.extend(ordinary);

    let emitted: AHashSet<String> = output
        .iter()
        .filter_map(|r| r.id().map(str::to_string))
        .collect();
    for record in original {
        if classify(record) == RecordRole::Container {
            continue;
        }
        // Template bodies were emitted above; one without an id cannot have
        // been indexed, so it falls through here rather than vanishing.
        if classify(record) == RecordRole::Template
            && record.id().is_some_and(|id| templates.contains(id))
        {
            continue;
        }
        // The emitted set covers a rebuilt template's internal copies and an
        // untouched template's passthrough; everything else a template owns
        // at the top level (its groups, config-only records) falls through
        // here. Skipping on scope alone would destroy those.
        if record.id().is_some_and(|id| emitted.contains(id)) {
            continue;
        }
        output.push(record.clone());
    }

    dedup_by_id(&mut output);
    output
}

/// Re-assembles one node's storage record: shallow-copy of its last-known
/// record, overwritten only on the fields the engine owns. Every
/// unrecognized field passes through unchanged.
fn reassemble_node(
    node: &VisualNode,
    node_scope: &str,
    graph: &VisualGraph,
    prior: &AHashMap<&str, &Record>,
    scope_members: &AHashSet<String>,
    rendered: &AHashSet<&str>,
) -> Record {
    let prior_record = prior.get(node.id.as_str()).copied();
    let mut record = prior_record
        .cloned()
        .unwrap_or_else(|| node.payload.clone());

    let node_id = if node.id.is_empty() {
        id::generate_id()
    } else {
        node.id.clone()
    };
    record.set_str(field::ID, &node_id);
    if !node.kind.is_empty() {
        record.set_str(field::KIND, &node.kind);
    }
    record.set_f64(field::X, node.position.x);
    record.set_f64(field::Y, node.position.y);
    record.set_str(field::SCOPE, node_scope);
    match &node.container_id {
        Some(group_id) => record.set_str(field::GROUP, group_id),
        None => {
            record.remove(field::GROUP);
        }
    }

    let mut wires = synthesize_wires(&node_id, &graph.edges);
    if let Some(prior_record) = prior_record {
        let prior_wires = build_adjacency(prior_record);
        // A prior wire whose target is rendered but no longer has an edge
        // was deleted by the user; one whose target is a live, non-rendered
        // record was never drawable and must survive.
        merge_retained_wires(&mut wires, &prior_wires, |target| {
            scope_members.contains(target) && !rendered.contains(target)
        });
    }
    pad_to_port_count(&mut wires, node.port_count);
    record.set_wires(wires);
    record
}

/// The final internal record list of a touched template: the original body
/// order, with reassembled records replacing their originals in place and
/// newly created records appended in graph order.
fn final_internals(original: &[Record], reassembled: &[Record]) -> Vec<Record> {
    let mut updated: AHashMap<&str, &Record> = reassembled
        .iter()
        .filter_map(|r| r.id().map(|id| (id, r)))
        .collect();

    let mut internals = Vec::with_capacity(original.len() + reassembled.len());
    for record in original {
        match record.id().and_then(|id| updated.remove(id)) {
            Some(replacement) => internals.push(replacement.clone()),
            None => internals.push(record.clone()),
        }
    }
    for record in reassembled {
        if record.id().is_none_or(|id| updated.contains_key(id)) {
            internals.push(record.clone());
        }
    }
    internals
}

/// Resolves duplicate ids in the final list. The winner is the candidate
/// carrying a non-empty template body, then the one with more fields.
/// Every resolution is logged: a collision means an upstream invariant
/// was already violated before this engine ran.
fn dedup_by_id(records: &mut Vec<Record>) {
    let mut seen: AHashMap<String, usize> = AHashMap::new();
    let mut result: Vec<Record> = Vec::with_capacity(records.len());
    for record in records.drain(..) {
        let Some(record_id) = record.id().map(str::to_string) else {
            result.push(record);
            continue;
        };
        match seen.get(&record_id) {
            None => {
                seen.insert(record_id, result.len());
                result.push(record);
            }
            Some(&at) => {
                log::warn!("resolving duplicate record id '{record_id}' in save output");
                if record_wins(&record, &result[at]) {
                    result[at] = record;
                }
            }
        }
    }
    *records = result;
}

fn record_wins(candidate: &Record, existing: &Record) -> bool {
    let candidate_body = !candidate.internal_records().is_empty();
    let existing_body = !existing.internal_records().is_empty();
    if candidate_body != existing_body {
        return candidate_body;
    }
    candidate.field_count() > existing.field_count()
}
