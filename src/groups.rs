//! Group extraction and the reverse record assembly.

use crate::graph::{Geometry, Group};
use crate::id;
use crate::record::{KIND_GROUP, Record, RecordRole, classify, field};

/// Fallback size for group records stored without geometry.
pub const DEFAULT_GROUP_SIZE: f64 = 200.0;

/// Extracts every group from a record set and computes its membership.
///
/// Membership comes exclusively from each non-group record's `group` field.
/// Geometric overlap is deliberately not consulted: once nodes have been
/// repositioned by hand, overlap is no longer a reliable containment signal.
pub fn extract_groups(records: &[Record]) -> Vec<Group> {
    records
        .iter()
        .filter(|r| classify(r) == RecordRole::Group)
        .filter_map(|r| {
            let id = r.id()?;
            let member_ids = records
                .iter()
                .filter(|m| classify(m) != RecordRole::Group)
                .filter(|m| m.group_ref() == Some(id))
                .filter_map(|m| m.id().map(str::to_string))
                .collect();
            Some(Group {
                id: id.to_string(),
                name: r.name().map(str::to_string),
                geometry: Geometry {
                    x: r.x().unwrap_or(0.0),
                    y: r.y().unwrap_or(0.0),
                    w: r.w().unwrap_or(DEFAULT_GROUP_SIZE),
                    h: r.h().unwrap_or(DEFAULT_GROUP_SIZE),
                },
                member_ids,
            })
        })
        .collect()
}

/// Re-assembles a group's storage record from its visual form.
///
/// Starts from the prior record so opaque fields pass through, then
/// overwrites only the fields the engine owns. Membership is not written
/// here: it lives on each member's own `group` field.
///
/// `scope` may name a subflow template. The consuming runtime does not
/// recognize groups nested inside a template body, so a template-scoped
/// group is always emitted as a top-level record pointing at the template —
/// the caller must never place it into the template's internal record list.
pub fn group_to_record(group: &Group, prior: Option<&Record>, scope: &str) -> Record {
    let mut record = prior.cloned().unwrap_or_default();
    if group.id.is_empty() {
        record.set_str(field::ID, &id::generate_group_id());
    } else {
        record.set_str(field::ID, &group.id);
    }
    record.set_str(field::KIND, KIND_GROUP);
    if let Some(name) = &group.name {
        record.set_str(field::NAME, name);
    }
    record.set_f64(field::X, group.geometry.x);
    record.set_f64(field::Y, group.geometry.y);
    record.set_f64(field::W, group.geometry.w);
    record.set_f64(field::H, group.geometry.h);
    record.set_str(field::SCOPE, scope);
    record
}
