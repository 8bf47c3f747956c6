//! Id generation for entities the engine itself creates.
//!
//! Existing ids are immutable: the engine never renumbers a record that
//! already carries one. New ids combine a millisecond timestamp with a
//! random suffix so that two editors creating entities in the same
//! millisecond still cannot collide within one document.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::record::GROUP_ID_PREFIX;

/// Generates a fresh record id.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: u32 = rand::rng().random();
    format!("{millis:x}.{suffix:08x}")
}

/// Generates a fresh group id carrying the reserved prefix the classifier's
/// second tier keys on.
pub fn generate_group_id() -> String {
    format!("{}{}", GROUP_ID_PREFIX, generate_id())
}
