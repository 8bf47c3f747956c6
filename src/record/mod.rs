//! The storage-side data model: flat, tagged records.
//!
//! A [`Record`] is one entry in the storage document — an untyped JSON object
//! with a small set of fields the engine understands and owns, and an open set
//! of opaque fields that must survive a round trip byte-for-byte. The typed
//! accessors here never panic: a malformed field reads as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod classify;

pub use classify::{RecordRole, classify};

/// Field names of the storage wire format. These are an external contract
/// shared with the store and the runtime, not an internal naming choice.
pub mod field {
    pub const ID: &str = "id";
    pub const KIND: &str = "kind";
    pub const SCOPE: &str = "scope";
    pub const GROUP: &str = "group";
    pub const WIRES: &str = "wires";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const W: &str = "w";
    pub const H: &str = "h";
    pub const NAME: &str = "name";
    pub const RECORDS: &str = "records";
    pub const PORT_MAP: &str = "portMap";
}

/// `kind` value of a flow container record.
pub const KIND_CONTAINER: &str = "container";
/// `kind` value of a group record (first classification tier).
pub const KIND_GROUP: &str = "group";
/// `kind` value of a subflow template record.
pub const KIND_TEMPLATE: &str = "subflow-template";
/// Prefix marking a subflow instance: `"template:<templateId>"`.
pub const TEMPLATE_REF_PREFIX: &str = "template:";
/// Id prefix this editor uses for groups it creates itself (second
/// classification tier).
pub const GROUP_ID_PREFIX: &str = "group-";

/// One flat entry of the storage document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record. Callers are expected to assign an id before
    /// the record reaches a storage document.
    pub fn new() -> Self {
        Record(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Record(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    fn num_field(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field(field::ID)
    }

    pub fn kind(&self) -> Option<&str> {
        self.str_field(field::KIND)
    }

    pub fn scope(&self) -> Option<&str> {
        self.str_field(field::SCOPE)
    }

    /// Id of the group record this node belongs to, if any.
    pub fn group_ref(&self) -> Option<&str> {
        self.str_field(field::GROUP)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field(field::NAME)
    }

    pub fn x(&self) -> Option<f64> {
        self.num_field(field::X)
    }

    pub fn y(&self) -> Option<f64> {
        self.num_field(field::Y)
    }

    pub fn w(&self) -> Option<f64> {
        self.num_field(field::W)
    }

    pub fn h(&self) -> Option<f64> {
        self.num_field(field::H)
    }

    /// The template id a subflow instance points at, decoded from its
    /// `"template:<id>"` kind string.
    pub fn template_ref(&self) -> Option<&str> {
        self.kind()
            .and_then(|k| k.strip_prefix(TEMPLATE_REF_PREFIX))
            .filter(|id| !id.is_empty())
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_string(), value);
    }

    pub fn set_str(&mut self, name: &str, value: &str) {
        self.set(name, Value::String(value.to_string()));
    }

    /// Writes a numeric field, preserving integer representation where the
    /// value has no fractional part. Storage documents carry positions as
    /// integers and must not come back as `100.0` after a round trip.
    pub fn set_f64(&mut self, name: &str, value: f64) {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            self.set(name, Value::from(value as i64));
        } else {
            self.set(name, serde_json::json!(value));
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Number of top-level fields. Used as the tie-breaker when resolving an
    /// id collision: the record carrying more information wins.
    pub fn field_count(&self) -> usize {
        self.0.len()
    }

    /// True when the record embeds a template body, i.e. carries an
    /// internal-record list.
    pub fn has_internal_records(&self) -> bool {
        matches!(self.0.get(field::RECORDS), Some(Value::Array(_)))
    }

    /// The embedded internal-record list of a template body. Non-object
    /// entries are skipped rather than rejected.
    pub fn internal_records(&self) -> Vec<Record> {
        match self.0.get(field::RECORDS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_object().cloned().map(Record))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set_internal_records(&mut self, records: Vec<Record>) {
        let items: Vec<Value> = records.into_iter().map(|r| Value::Object(r.0)).collect();
        self.set(field::RECORDS, Value::Array(items));
    }

    pub fn set_wires(&mut self, wires: Vec<Vec<String>>) {
        self.set(field::WIRES, serde_json::json!(wires));
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}
