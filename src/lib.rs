//! # Henkan - Flow-Storage ⇄ Visual-Graph Conversion Engine
//!
//! **Henkan** is a lossless, idempotent converter between two representations
//! of the same directed graph: the *flow-storage format* (a flat,
//! order-dependent list of tagged records using positional output-port
//! adjacency arrays) and the *visual-editor graph format* (explicit
//! node/edge collections with named ports, group containment, and nested
//! subflow templates).
//!
//! ## Core Workflow
//!
//! 1. **Load**: parse the store's flat JSON array into a [`document::StorageDocument`].
//! 2. **Materialize**: call [`transform::to_visual`] for the scope (flow or
//!    template) being edited to get a [`graph::VisualGraph`] for the canvas.
//! 3. **Edit**: the rendering layer mutates plain nodes, edges, and groups —
//!    no engine types leak into it.
//! 4. **Save**: call [`transform::to_storage`] with the edited graph and the
//!    original record set to produce the complete replacement document.
//!
//! Round-tripping storage → visual → storage reproduces every field the
//! engine does not itself own, byte for byte. The transforms never fail:
//! dangling references are filtered and logged, duplicate ids are resolved
//! deterministically, and a record that defies classification is treated as
//! an ordinary node rather than rejected.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use henkan::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("flows.json")?;
//!     let document = StorageDocument::from_json(&json)?;
//!
//!     // Materialize one flow for the canvas.
//!     let graph = to_visual(document.records(), "flow-1");
//!     println!(
//!         "{} nodes, {} edges, {} groups",
//!         graph.nodes.len(),
//!         graph.edges.len(),
//!         graph.groups.len()
//!     );
//!
//!     // ... the editor mutates `graph` ...
//!
//!     // Produce the full replacement document for the save request.
//!     let records = to_storage(&graph, "flow-1", document.records());
//!     let body = StorageDocument::new(records).to_json()?;
//!     println!("{} bytes to save", body.len());
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod graph;
pub mod groups;
pub mod id;
pub mod prelude;
pub mod record;
pub mod subflow;
pub mod transform;
pub mod wires;
