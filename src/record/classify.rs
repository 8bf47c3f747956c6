use super::{GROUP_ID_PREFIX, KIND_CONTAINER, KIND_GROUP, KIND_TEMPLATE, Record, field};

/// The role a record plays in the storage document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRole {
    /// A plain node, or anything that could not be classified more precisely.
    Ordinary,
    /// A flow container (the top-level tab a flow's nodes are scoped to).
    Container,
    /// A visual group of nodes.
    Group,
    /// A reusable subflow template carrying its own internal record list.
    Template,
    /// A placed reference to a template, wired like an ordinary node.
    Instance,
}

/// Classifies a record. Pure and total: exactly one role for every record,
/// never panics, never refuses. A record nothing matches is an ordinary node,
/// since an under-classified graph is still editable while a rejection would
/// block the whole load.
///
/// Precedence, first match wins:
///
/// 1. explicit `container` kind,
/// 2. explicit `subflow-template` kind,
/// 3. instance kind (`template:<id>`) — checked before any group tier because
///    an instance can coincidentally carry geometry fields,
/// 4. embedded internal-record list (a template stored without its kind tag),
/// 5. group tier 1: explicit `group` kind,
/// 6. group tier 2: the reserved `group-` id prefix this editor assigns,
/// 7. group tier 3: both `w` and `h` present and no `wires` field (ordinary
///    nodes always declare `wires`, even when empty).
///
/// The group fallback tiers exist because the upstream store never settled on
/// a single canonical discriminator. The precedence is a compatibility
/// contract; keep it stable even where a future kind would misclassify.
pub fn classify(record: &Record) -> RecordRole {
    if let Some(kind) = record.kind() {
        if kind == KIND_CONTAINER {
            return RecordRole::Container;
        }
        if kind == KIND_TEMPLATE {
            return RecordRole::Template;
        }
        if record.template_ref().is_some() {
            return RecordRole::Instance;
        }
        if kind == KIND_GROUP {
            return RecordRole::Group;
        }
    }
    if record.has_internal_records() {
        return RecordRole::Template;
    }
    if record.id().is_some_and(|id| id.starts_with(GROUP_ID_PREFIX)) {
        return RecordRole::Group;
    }
    if record.has(field::W) && record.has(field::H) && !record.has(field::WIRES) {
        return RecordRole::Group;
    }
    RecordRole::Ordinary
}
