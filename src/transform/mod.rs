//! The two transform directions.
//!
//! Both are synchronous pure functions over in-memory structures: no I/O, no
//! shared state, nothing to suspend or retry. Callers must serialize
//! [`to_storage`] invocations for a given scope, since the collision
//! resolution step is not safe against a node set being concurrently
//! mutated by the UI.

mod to_storage;
mod to_visual;

pub use to_storage::to_storage;
pub use to_visual::to_visual;
