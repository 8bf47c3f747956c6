//! Subflow templates and instances.
//!
//! A template is a reusable sub-graph: a record carrying its own embedded
//! internal record list plus a port map that binds each external port to one
//! or more internal endpoints. An instance is an ordinary-looking record
//! whose kind encodes a reference to a template (`template:<id>`); its port
//! cardinality comes from the referenced template, never from itself.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordRole, classify, field};

/// One internal endpoint a template port is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEndpoint {
    #[serde(rename = "targetId")]
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<usize>,
}

/// A template's declared mapping from one external port to internal
/// endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    #[serde(rename = "internalWires", default)]
    pub internal_wires: Vec<PortEndpoint>,
}

/// A template's full external port surface. The *length* of each side is the
/// instance's port cardinality, so bindings are kept even when validation
/// empties them — removing a slot would shift every port after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMap {
    #[serde(rename = "in", default)]
    pub inputs: Vec<PortBinding>,
    #[serde(rename = "out", default)]
    pub outputs: Vec<PortBinding>,
}

impl PortMap {
    fn from_record(record: &Record) -> Self {
        record
            .get(field::PORT_MAP)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Drops every endpoint whose target is not in the final internal id
    /// set. Binding slots survive even when emptied.
    pub fn validate(&mut self, internal_ids: &AHashSet<&str>, template_id: &str) {
        let mut dropped = 0usize;
        for binding in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            binding.internal_wires.retain(|endpoint| {
                let live = internal_ids.contains(endpoint.target_id.as_str());
                if !live {
                    dropped += 1;
                }
                live
            });
        }
        if dropped > 0 {
            log::debug!(
                "template '{template_id}': dropped {dropped} port binding(s) to missing internal records"
            );
        }
    }
}

/// A resolved subflow template.
#[derive(Debug, Clone, PartialEq)]
pub struct SubflowTemplate {
    pub id: String,
    pub port_map: PortMap,
    pub internal_records: Vec<Record>,
    /// The full original template record, kept for opaque-field passthrough.
    pub record: Record,
}

impl SubflowTemplate {
    fn from_record(record: &Record) -> Option<Self> {
        let id = record.id()?;
        Some(SubflowTemplate {
            id: id.to_string(),
            port_map: PortMap::from_record(record),
            internal_records: record.internal_records(),
            record: record.clone(),
        })
    }

    pub fn in_port_count(&self) -> usize {
        self.port_map.inputs.len()
    }

    pub fn out_port_count(&self) -> usize {
        self.port_map.outputs.len()
    }
}

/// Every template in a storage document, indexed by id and kept in document
/// order so derived output stays deterministic.
#[derive(Debug, Default)]
pub struct TemplateIndex {
    templates: AHashMap<String, SubflowTemplate>,
    order: Vec<String>,
}

impl TemplateIndex {
    /// Collects all template records. A duplicate template id is resolved
    /// deterministically in favor of the record carrying a non-empty
    /// internal record list over an empty stub, then the larger record;
    /// this is logged because it means a store invariant broke upstream.
    pub fn from_records(records: &[Record]) -> Self {
        let mut index = TemplateIndex::default();
        for record in records {
            if classify(record) != RecordRole::Template {
                continue;
            }
            let Some(template) = SubflowTemplate::from_record(record) else {
                continue;
            };
            let keep = match index.templates.get(&template.id) {
                None => {
                    index.order.push(template.id.clone());
                    true
                }
                Some(existing) => {
                    log::warn!("duplicate template id '{}' in storage document", template.id);
                    prefers(&template, existing)
                }
            };
            if keep {
                index.templates.insert(template.id.clone(), template);
            }
        }
        index
    }

    pub fn get(&self, id: &str) -> Option<&SubflowTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Resolves an instance record to its template, if the reference is live.
    pub fn resolve_instance(&self, record: &Record) -> Option<&SubflowTemplate> {
        record.template_ref().and_then(|id| self.get(id))
    }

    /// Template ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

fn prefers(candidate: &SubflowTemplate, existing: &SubflowTemplate) -> bool {
    let candidate_body = !candidate.internal_records.is_empty();
    let existing_body = !existing.internal_records.is_empty();
    if candidate_body != existing_body {
        return candidate_body;
    }
    candidate.record.field_count() > existing.record.field_count()
}

/// Assigns input ports to edges arriving at multi-input targets, in
/// first-seen order with a per-target counter.
///
/// The counter is shared across one whole transform pass — it is never reset
/// per source node, otherwise two upstream sources feeding the same instance
/// would both land on port 0. It is threaded through the pass as a value and
/// must not outlive it; a counter leaking into an unrelated pass is the
/// highest-risk bug class in this engine.
///
/// When edges outnumber the available ports the excess collapses onto the
/// last port instead of erroring.
#[derive(Debug, Default)]
pub struct PortAssigner {
    counters: AHashMap<String, usize>,
}

impl PortAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_input(&mut self, target_id: &str, port_count: usize) -> usize {
        let counter = self.counters.entry(target_id.to_string()).or_insert(0);
        let port = (*counter).min(port_count.saturating_sub(1));
        *counter += 1;
        port
    }
}

/// The result of rebuilding one template on save.
pub struct RebuiltTemplate {
    /// The template body record, with the internal list embedded and the
    /// port map re-validated.
    pub body: Record,
    /// Top-level copies of every internal record, re-tagged with the
    /// template id as scope.
    pub scoped_copies: Vec<Record>,
}

/// Rebuilds a template's storage representation from its final internal
/// records.
///
/// Internal records are scope-less by convention, so the embedded copies
/// have their scope field stripped. On top of the body, a duplicate of every
/// internal record is emitted at the top level, scoped to the template id.
/// The consuming runtime indexes nodes primarily by top-level scope lookup
/// and only consults the body as a legacy path; emitting either copy alone
/// produces a structurally valid document that silently fails to execute.
pub fn rebuild_template(template: &SubflowTemplate, internals: &[Record]) -> RebuiltTemplate {
    let mut scoped_copies = Vec::with_capacity(internals.len());
    let mut body_records = Vec::with_capacity(internals.len());
    for internal in internals {
        let mut scoped = internal.clone();
        scoped.set_str(field::SCOPE, &template.id);
        scoped_copies.push(scoped);

        let mut embedded = internal.clone();
        embedded.remove(field::SCOPE);
        body_records.push(embedded);
    }

    let internal_ids: AHashSet<&str> = body_records.iter().filter_map(Record::id).collect();
    let mut port_map = template.port_map.clone();
    port_map.validate(&internal_ids, &template.id);

    let mut body = template.record.clone();
    body.set_internal_records(body_records);
    body.set(
        field::PORT_MAP,
        serde_json::to_value(&port_map).unwrap_or_default(),
    );

    RebuiltTemplate { body, scoped_copies }
}
