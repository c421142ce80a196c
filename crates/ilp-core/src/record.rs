//! Transaction record types.
//!
//! `RawTransaction` is what a terminal sends: every field is optional and
//! unknown keys are kept as metadata. `TransactionRecord` is the typed form,
//! and `ValidRecord` is a record that has passed `TransactionValidator`.

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound wire record (JSON object). `null` fields deserialize as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub agent_id: Option<Value>,
    /// Number or decimal text.
    #[serde(default)]
    pub value_ghs: Option<Value>,
    /// Every other key, kept opaque.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

impl RawTransaction {
    /// Build a raw record from optional parts (test and embedding helper).
    ///
    /// JSON numbers cannot hold NaN or infinities, so those are kept as their
    /// text form ("NaN", "inf") and still fail validation as invalid values.
    pub fn from_parts(agent_id: Option<&str>, value_ghs: Option<f64>) -> Self {
        Self {
            agent_id: agent_id.map(|a| Value::String(a.to_string())),
            value_ghs: value_ghs.map(|v| match serde_json::Number::from_f64(v) {
                Some(n) => Value::Number(n),
                None => Value::String(v.to_string()),
            }),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Typed transaction. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    agent_id: String,
    value_ghs: f64,
    metadata: BTreeMap<String, Value>,
}

impl TransactionRecord {
    pub fn new(agent_id: impl Into<String>, value_ghs: f64) -> Self {
        Self::with_metadata(agent_id, value_ghs, BTreeMap::new())
    }

    pub fn with_metadata(
        agent_id: impl Into<String>,
        value_ghs: f64,
        metadata: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            value_ghs,
            metadata,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }
    pub fn value_ghs(&self) -> f64 {
        self.value_ghs
    }
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }
}

/// A record that passed validation. Only `TransactionValidator` constructs one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord(TransactionRecord);

impl ValidRecord {
    pub(crate) fn new(record: TransactionRecord) -> Self {
        Self(record)
    }

    pub fn into_inner(self) -> TransactionRecord {
        self.0
    }
}

impl Deref for ValidRecord {
    type Target = TransactionRecord;

    fn deref(&self) -> &TransactionRecord {
        &self.0
    }
}
