//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions from the henkan
//! crate. Import this module to get access to the core surface without
//! having to import each item individually.

// Transform directions
pub use crate::transform::{to_storage, to_visual};

// Storage-side model
pub use crate::document::StorageDocument;
pub use crate::record::{Record, RecordRole, classify};

// Visual-side model
pub use crate::graph::{Geometry, Group, Position, VisualEdge, VisualGraph, VisualNode};

// Subflow machinery
pub use crate::subflow::{PortBinding, PortEndpoint, PortMap, SubflowTemplate, TemplateIndex};

// Wire bookkeeping
pub use crate::wires::{build_adjacency, synthesize_wires};

// Error types
pub use crate::error::DocumentError;
