//! Searchable records and dot-separated field paths

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading a collection from JSON
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to parse records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}

/// One searchable item of the collection
///
/// Records are open-ended JSON values. Cloning a record shares the underlying
/// value, so two clones are the *same* record for deduplication purposes
/// (see [`Record::ptr_eq`]). Equality via `==` compares values.
#[derive(Clone)]
pub struct Record(Arc<Value>);

impl Record {
    /// Wrap a JSON value as a record
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the underlying JSON value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Resolve a (possibly nested) field of this record
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.resolve(&self.0)
    }

    /// Identity comparison: true only for clones of the same record
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity key, valid while the record is alive
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({})", self.0)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Record::new)
    }
}

/// Parse a JSON document holding an array of records
pub fn records_from_json(json: &str) -> Result<Vec<Record>, RecordError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => Ok(items.into_iter().map(Record::new).collect()),
        Value::Object(_) => Err(RecordError::NotAnArray("object")),
        Value::String(_) => Err(RecordError::NotAnArray("string")),
        Value::Number(_) => Err(RecordError::NotAnArray("number")),
        Value::Bool(_) => Err(RecordError::NotAnArray("boolean")),
        Value::Null => Err(RecordError::NotAnArray("null")),
    }
}

/// Dot-separated address of a value inside a record (e.g. `"address.city"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_string).collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the path against `value`
    ///
    /// Objects are indexed by key, arrays by numeric segment. Any other
    /// intermediate (or a missing key) yields `None`.
    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            })
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Text shown for a record in the input box and the result rows
///
/// Strings are shown verbatim, numbers and booleans in their textual form.
/// Missing fields, nulls, objects and arrays display as empty.
pub fn display_value(record: &Record, path: &FieldPath) -> String {
    match record.get(path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
