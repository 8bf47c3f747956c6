use thiserror::Error;

/// Errors at the storage-document JSON boundary.
///
/// This is the engine's only fallible surface. The transforms themselves
/// never fail: structural inconsistencies (dangling references, id
/// collisions, unclassifiable records) are repaired locally and logged,
/// because a degraded-but-renderable graph is recoverable in the editor
/// while a refused load blocks everything.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("Failed to parse storage document JSON: {0}")]
    JsonParseError(String),

    #[error("Storage document root must be a JSON array of records")]
    NotAnArray,

    #[error("Record at index {index} is not a JSON object")]
    RecordNotAnObject { index: usize },

    #[error("Failed to serialize storage document: {0}")]
    JsonSerializeError(String),
}
