//! The visual-side data model: explicit node, edge, and group collections.
//!
//! These are plain data structures with no coupling to any rendering
//! library's runtime types; the canvas layer consumes and produces them
//! as-is. They are derived on every flow switch and discarded, never
//! persisted — the storage document is the single source of truth.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Bounding box of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// One rendered node.
///
/// `id` always equals the underlying record's id; the engine never renumbers
/// an entity that already has an identity. `payload` carries the full
/// original record for transparent passthrough on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub kind: String,
    pub position: Position,
    /// Number of output ports. For subflow instances this is derived from
    /// the referenced template's port map, not self-declared.
    pub port_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    pub payload: Record,
}

/// One rendered edge. The id is deterministically derived from the endpoint
/// tuple plus a disambiguator; it exists for rendering-library bookkeeping
/// only and carries no meaning in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEdge {
    pub id: String,
    pub source_id: String,
    pub source_port: usize,
    pub target_id: String,
    pub target_port: usize,
}

impl VisualEdge {
    /// Derives the deterministic edge id. `seq` disambiguates duplicate
    /// endpoint tuples within one transform pass. Separator characters
    /// inside a record id are escaped so two distinct endpoint tuples can
    /// never derive the same id (`"b:1"` port 0 vs `"b"` port 1).
    pub fn derive_id(
        source_id: &str,
        source_port: usize,
        target_id: &str,
        target_port: usize,
        seq: usize,
    ) -> String {
        let source = escape_id(source_id);
        let target = escape_id(target_id);
        if seq == 0 {
            format!("{source}:{source_port}:{target}:{target_port}")
        } else {
            format!("{source}:{source_port}:{target}:{target_port}:{seq}")
        }
    }
}

fn escape_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace(':', "\\:")
}

/// A visual group of nodes. Containment comes from each member's explicit
/// group reference, never from geometric overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub geometry: Geometry,
    pub member_ids: Vec<String>,
}

/// One derived snapshot of a scope: everything the canvas needs to render it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub groups: Vec<Group>,
}
