//! Event payload types
//!
//! A reporting tick flattens the registry into a [`FlatFieldMap`], wraps it
//! together with static metadata into an [`OutboundEvent`], and hands the
//! event to a telemetry client. Neither type outlives the tick.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scalar event field value
///
/// Serializes untagged, so `Float(5.0)` becomes the JSON number `5.0` and
/// `Text("api")` becomes the JSON string `"api"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    UInt(u64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Returns the value as `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::UInt(v) => Some(*v as f64),
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Bool(_) | FieldValue::Text(_) => None,
        }
    }

    /// Returns the value as `&str` when it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::UInt(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Derived metric field name to numeric value, rebuilt every tick
pub type FlatFieldMap = HashMap<String, FieldValue>;

/// One event handed to a telemetry client for transmission
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    fields: HashMap<String, FieldValue>,
    timestamp: DateTime<Utc>,
}

impl OutboundEvent {
    /// Creates an empty event stamped with the current time.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Creates an event pre-populated with `fields`.
    pub fn with_fields(fields: HashMap<String, FieldValue>) -> Self {
        Self {
            fields,
            timestamp: Utc::now(),
        }
    }

    /// Sets a single field, replacing any previous value for `key`.
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Merges every entry of `fields` into the event.
    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = (String, FieldValue)>) {
        self.fields.extend(fields);
    }

    /// Returns the value of a field, if set.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// All fields of the event.
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    /// Consumes the event and returns its fields.
    pub fn into_fields(self) -> HashMap<String, FieldValue> {
        self.fields
    }

    /// Number of fields on the event.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the event carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Time at which the event was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Default for OutboundEvent {
    fn default() -> Self {
        Self::new()
    }
}
