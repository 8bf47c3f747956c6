//! The storage document: the flat JSON array exchanged with the store.

use serde_json::Value;

use crate::error::DocumentError;
use crate::record::Record;

/// One storage document, as loaded from the store's "get flows" response
/// and produced for its "save flows" request body.
///
/// The store replaces the whole document atomically on save; there is no
/// per-record patch path. The optimistic-concurrency token that accompanies
/// a save belongs to the transport collaborator and never passes through
/// this engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageDocument {
    records: Vec<Record>,
}

impl StorageDocument {
    pub fn new(records: Vec<Record>) -> Self {
        StorageDocument { records }
    }

    /// Parses a document from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DocumentError::JsonParseError(e.to_string()))?;
        let Value::Array(items) = value else {
            return Err(DocumentError::NotAnArray);
        };
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => records.push(Record::from_map(map)),
                _ => return Err(DocumentError::RecordNotAnObject { index }),
            }
        }
        Ok(StorageDocument { records })
    }

    /// Serializes the document back to its JSON wire form.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(&self.records)
            .map_err(|e| DocumentError::JsonSerializeError(e.to_string()))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
